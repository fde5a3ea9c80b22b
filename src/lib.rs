//! FIND Data Management Reports
//!
//! Builds status reports from the FIND element database:
//! - `data`: record store, county boundaries and taxonomy loading
//! - `stages`: county join, type tagging, merge, survey sites, pivot, enrichment
//! - `reports`: the five report classifiers
//! - `export`: dated report files
//! - `pipeline`: runs the stages for a selected report

pub mod config;
pub mod error;
pub mod report_type;
pub mod utils;
pub mod data;
pub mod stages;
pub mod reports;
pub mod export;
pub mod pipeline;

// Re-export commonly used types
pub use config::{ReportConfig, Region};
pub use data::{FeatureSource, GeoJsonDirectory};
pub use error::ReportError;
pub use export::Exporter;
pub use report_type::ReportType;
pub use reports::ReportOutput;
