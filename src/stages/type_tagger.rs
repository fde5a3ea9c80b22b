//! STAGE 2: TYPE TAGGER
//!
//! Stamps every feature with the logical name of the collection it came from.

use tracing::debug;

use super::geo_enricher::EnrichedCollection;

pub const ELEMENT_TYPE: &str = "element_type";

pub fn tag(collections: Vec<EnrichedCollection>) -> Vec<EnrichedCollection> {
    collections
        .into_iter()
        .map(|mut collection| {
            for feature in &mut collection.features {
                feature
                    .attributes
                    .insert(ELEMENT_TYPE.to_string(), Some(collection.name.clone()));
            }
            debug!("Tagged {} features as {}", collection.features.len(), collection.name);
            collection
        })
        .collect()
}
