//! Data Loading
//!
//! Reads the record store (one GeoJSON FeatureCollection per collection),
//! the county boundary layer and the taxonomy lookup spreadsheet.

use polars::prelude::*;
use rustc_hash::FxHashMap;
use anyhow::{Context, Result};
use geojson::GeoJson;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::ReportError;

/// Attribute row of a feature: field name → optional text value
pub type Attributes = FxHashMap<String, Option<String>>;

/// One raw feature from the record store
#[derive(Debug, Clone)]
pub struct SourceFeature {
    pub attributes: Attributes,
    pub geometry: Option<geo::Geometry<f64>>,
}

impl SourceFeature {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).and_then(|v| v.as_deref())
    }
}

/// Record store seam: anything that can hand out named feature collections
pub trait FeatureSource {
    fn collection(&self, name: &str) -> Result<Vec<SourceFeature>>;
}

/// Record store backed by a directory of `<name>.geojson` files
pub struct GeoJsonDirectory {
    root: PathBuf,
}

impl GeoJsonDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FeatureSource for GeoJsonDirectory {
    fn collection(&self, name: &str) -> Result<Vec<SourceFeature>> {
        let path = self.root.join(format!("{}.geojson", name));
        if !path.exists() {
            return Err(ReportError::MissingCollection {
                name: name.to_string(),
                path: path.display().to_string(),
            }
            .into());
        }

        let features = read_features(&path)?;
        debug!("Loaded collection {} ({} features)", name, features.len());
        Ok(features)
    }
}

/// Render a JSON property as the text stored in attribute columns
fn property_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Parse a GeoJSON file into features with text attributes
pub fn read_features(path: &Path) -> Result<Vec<SourceFeature>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read GeoJSON: {:?}", path))?;

    let geo_json: GeoJson = contents
        .parse()
        .with_context(|| format!("Failed to parse GeoJSON: {:?}", path))?;

    let features = match geo_json {
        GeoJson::FeatureCollection(collection) => collection.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => {
            anyhow::bail!("{:?} holds a bare geometry, expected a FeatureCollection", path)
        }
    };

    features
        .into_iter()
        .map(|feature| -> Result<SourceFeature> {
            let attributes = feature
                .properties
                .unwrap_or_default()
                .iter()
                .map(|(key, value)| (key.clone(), property_text(value)))
                .collect();

            let geometry = match feature.geometry {
                Some(geometry) => Some(
                    geo::Geometry::<f64>::try_from(geometry.value)
                        .with_context(|| format!("Unsupported geometry in {:?}", path))?,
                ),
                None => None,
            };

            Ok(SourceFeature { attributes, geometry })
        })
        .collect()
}

// ============================================================================
// County boundaries
// ============================================================================

/// One polygon of the boundary layer
#[derive(Debug, Clone)]
pub struct CountyBoundary {
    pub name: Option<String>,
    pub geometry: geo::Geometry<f64>,
}

/// Load the county boundary layer, preserving layer order
pub fn load_counties(path: &Path, name_field: &str) -> Result<Vec<CountyBoundary>> {
    let features = read_features(path)?;

    let counties: Vec<CountyBoundary> = features
        .into_iter()
        .filter_map(|feature| {
            let name = feature.attribute(name_field).map(|s| s.to_string());
            feature.geometry.map(|geometry| CountyBoundary { name, geometry })
        })
        .collect();

    if counties.is_empty() {
        anyhow::bail!("County layer {:?} has no polygons", path);
    }

    debug!("Loaded {} county boundaries", counties.len());
    Ok(counties)
}

// ============================================================================
// Taxonomy lookup
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TaxonomyEntry {
    pub element_code: Option<String>,
    pub scientific_name: Option<String>,
}

/// Subnational element id → taxonomy entry
pub type TaxonomyLookup = FxHashMap<String, TaxonomyEntry>;

pub const TAXONOMY_KEY: &str = "ELEMENT_SUBNATIONAL_ID";
pub const ELEMENT_CODE: &str = "ELEMENT_CODE";
pub const SCIENTIFIC_NAME: &str = "SCIENTIFIC_NAME";

/// Load the taxonomy spreadsheet (CSV). All columns are read as text so
/// identifiers keep leading zeros; the first row per key wins.
pub fn load_taxonomy(path: &Path) -> Result<TaxonomyLookup> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.into()))
        .with_context(|| format!("Failed to create CSV reader: {:?}", path))?
        .finish()
        .with_context(|| format!("Failed to load taxonomy table: {:?}", path))?;

    taxonomy_from_frame(&df)
}

pub fn taxonomy_from_frame(df: &DataFrame) -> Result<TaxonomyLookup> {
    let column = |name: &str| -> Result<Column> {
        let col = df.column(name).map_err(|_| ReportError::MissingColumn {
            context: "taxonomy".into(),
            column: name.into(),
        })?;
        Ok(col.cast(&DataType::String)?)
    };

    let keys = column(TAXONOMY_KEY)?;
    let codes = column(ELEMENT_CODE)?;
    let names = column(SCIENTIFIC_NAME)?;
    let (keys, codes, names) = (keys.str()?, codes.str()?, names.str()?);

    let mut lookup = TaxonomyLookup::default();
    for idx in 0..df.height() {
        if let Some(key) = keys.get(idx) {
            lookup.entry(key.to_string()).or_insert_with(|| TaxonomyEntry {
                element_code: codes.get(idx).map(|s| s.to_string()),
                scientific_name: names.get(idx).map(|s| s.to_string()),
            });
        }
    }

    debug!("Loaded {} taxonomy entries", lookup.len());
    Ok(lookup)
}
