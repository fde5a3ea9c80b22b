//! Pipeline stages shared by every report
//!
//! - `geo_enricher`: county attached by spatial join
//! - `type_tagger`: `element_type` stamped from the source collection
//! - `table_merger`: all collections merged into one element table
//! - `survey_site`: reduced survey-site status table
//! - `pivot`: per-refcode status counts
//! - `table_enricher`: totals, joins and region flag on the pivot

pub mod geo_enricher;
pub mod type_tagger;
pub mod table_merger;
pub mod survey_site;
pub mod pivot;
pub mod region;
pub mod table_enricher;

pub use geo_enricher::EnrichedCollection;
pub use region::{region_for, with_east_west, EAST_WEST};
pub use table_enricher::TOTAL_RECORDS;
