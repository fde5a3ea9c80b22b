//! STAGE 3: TABLE MERGER
//!
//! Drops geometry and concatenates all tagged collections into one element
//! table. Columns are exactly the element whitelist; attributes a collection
//! lacks become nulls. No deduplication: a refcode appears once per element.

use polars::prelude::*;
use anyhow::Result;
use rustc_hash::FxHashSet;
use tracing::info;

use super::geo_enricher::EnrichedCollection;
use crate::data::SourceFeature;

/// Build a text-column frame from feature attributes.
///
/// `columns` pairs the attribute name with the output column name.
pub fn attribute_frame<'a, I>(features: I, columns: &[(&str, &str)]) -> Result<DataFrame>
where
    I: IntoIterator<Item = &'a SourceFeature>,
{
    let features: Vec<&SourceFeature> = features.into_iter().collect();

    let columns: Vec<Column> = columns
        .iter()
        .map(|(attribute, output)| {
            let values: Vec<Option<&str>> = features.iter().map(|f| f.attribute(attribute)).collect();
            Column::new((*output).into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Concatenate all collections into the unified element table
pub fn merge(collections: &[EnrichedCollection], fields: &[String]) -> Result<DataFrame> {
    let mut seen = FxHashSet::default();
    let columns: Vec<(&str, &str)> = fields
        .iter()
        .map(|f| f.as_str())
        .filter(|f| seen.insert(*f))
        .map(|f| (f, f))
        .collect();

    let features = collections.iter().flat_map(|c| c.features.iter());
    let merged = attribute_frame(features, &columns)?;

    info!("Merged {} collections into {} element records", collections.len(), merged.height());
    Ok(merged)
}
