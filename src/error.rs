//! Named failure classes
//!
//! Most failures propagate as `anyhow::Error` with context attached at the
//! boundary where they happened. These variants are the few the pipeline
//! needs to recognise by type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("unknown report type '{0}' (expected DM Pending, DM Ready, DM Biologist, DM Reviewer, DM Total or DM All)")]
    UnknownReportType(String),

    #[error("input collection '{name}' not found at {path}")]
    MissingCollection { name: String, path: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{context}: missing required column '{column}'")]
    MissingColumn { context: String, column: String },
}
