//! STAGE 1: GEO-ENRICHER
//!
//! Attaches a county name to every feature of the six element collections.
//!
//! Each feature is tested against the boundary layer in layer order and takes
//! the name of the *first* boundary it intersects. A feature spanning several
//! counties therefore appears once, carrying the first county found. No
//! area/overlap tie-break is applied.
//!
//! Attributes are reduced to the element whitelist before the county is
//! attached, so boundary attributes never leak into the records.

use anyhow::{Context, Result};
use geo::Intersects;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::config::ReportConfig;
use crate::data::{Attributes, CountyBoundary, FeatureSource, SourceFeature};

pub const COUNTY: &str = "county";

/// One input collection after the spatial join
#[derive(Debug, Clone)]
pub struct EnrichedCollection {
    /// Logical name of the collection (e.g. "element_point")
    pub name: String,
    pub features: Vec<SourceFeature>,
}

/// Name of the first boundary the geometry intersects
pub fn county_for(
    geometry: Option<&geo::Geometry<f64>>,
    counties: &[CountyBoundary],
) -> Option<String> {
    let geometry = geometry?;
    counties
        .iter()
        .find(|county| county.geometry.intersects(geometry))
        .and_then(|county| county.name.clone())
}

/// Join one feature against the boundary layer
pub fn enrich_feature(
    feature: SourceFeature,
    counties: &[CountyBoundary],
    whitelist: &FxHashSet<&str>,
) -> SourceFeature {
    let county = county_for(feature.geometry.as_ref(), counties);

    let mut attributes: Attributes = feature
        .attributes
        .into_iter()
        .filter(|(name, _)| whitelist.contains(name.as_str()) && name != COUNTY)
        .collect();
    attributes.insert(COUNTY.to_string(), county);

    SourceFeature {
        attributes,
        geometry: feature.geometry,
    }
}

/// Spatially join every configured collection against the county layer.
///
/// Output cardinality equals input cardinality per collection.
pub fn enrich(
    source: &dyn FeatureSource,
    counties: &[CountyBoundary],
    config: &ReportConfig,
) -> Result<Vec<EnrichedCollection>> {
    let whitelist: FxHashSet<&str> = config.element_fields.iter().map(|f| f.as_str()).collect();

    config
        .collections
        .iter()
        .map(|spec| {
            let features = source
                .collection(&spec.source)
                .with_context(|| format!("Failed to load collection {}", spec.source))?;

            let enriched: Vec<SourceFeature> = features
                .into_iter()
                .map(|feature| enrich_feature(feature, counties, &whitelist))
                .collect();

            let unmatched = enriched
                .iter()
                .filter(|f| f.attribute(COUNTY).is_none())
                .count();
            if unmatched > 0 {
                warn!("{}: {} features outside every county boundary", spec.element_type, unmatched);
            }
            debug!("{}: {} features joined to counties", spec.element_type, enriched.len());

            Ok(EnrichedCollection {
                name: spec.element_type.clone(),
                features: enriched,
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(|collections| {
            let total: usize = collections.iter().map(|c| c.features.len()).sum();
            info!("County info attached to {} features in {} collections", total, collections.len());
            collections
        })
}
