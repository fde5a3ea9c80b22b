//! Report classifiers
//!
//! Each report filters or reshapes the enriched pivot (or, for DM Reviewer,
//! the merged element records) according to its own rules:
//! - `dm_ready`: sites where every element is ready
//! - `dm_pending`: sites pending data management
//! - `dm_total`: everything except fully processed sites
//! - `dm_biologist`: per-owner tables with placeholder owners corrected
//! - `dm_reviewer`: per-reviewer tables of records awaiting ID review

pub mod dm_ready;
pub mod dm_pending;
pub mod dm_total;
pub mod dm_biologist;
pub mod dm_reviewer;

use polars::prelude::*;
use anyhow::Result;

use crate::config::ReportConfig;
use crate::report_type::ReportType;

/// Result of one report: a single table or one table per person
#[derive(Debug, Clone)]
pub enum ReportOutput {
    Single(DataFrame),
    PerPerson(Vec<(String, DataFrame)>),
}

impl ReportOutput {
    /// Total rows across all tables
    pub fn row_count(&self) -> usize {
        match self {
            ReportOutput::Single(df) => df.height(),
            ReportOutput::PerPerson(tables) => tables.iter().map(|(_, df)| df.height()).sum(),
        }
    }
}

/// Run one of the pivot-based reports
pub fn classify_pivot(report: ReportType, pivot: &DataFrame, config: &ReportConfig) -> Result<ReportOutput> {
    let output = match report {
        ReportType::DmReady => ReportOutput::Single(dm_ready::build(pivot)?),
        ReportType::DmPending => ReportOutput::Single(dm_pending::build(pivot)?),
        ReportType::DmTotal => ReportOutput::Single(dm_total::build(pivot)?),
        ReportType::DmBiologist => ReportOutput::PerPerson(dm_biologist::build(pivot, config)?),
        ReportType::DmReviewer | ReportType::DmAll => {
            anyhow::bail!("{} is not built from the pivot table", report)
        }
    };
    Ok(output)
}
