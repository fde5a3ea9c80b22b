//! Report pipeline
//!
//! Runs the stages in order for a chosen report:
//!   geo-enrich → tag → merge → survey sites → (pivot → enrich) → classify → export
//!
//! Everything is held in memory for one run and discarded afterwards. The
//! pivot is built only when a pivot-based report is requested, and once for
//! DM All.

use polars::prelude::*;
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use crate::config::ReportConfig;
use crate::data::{load_counties, load_taxonomy, CountyBoundary, FeatureSource};
use crate::export::Exporter;
use crate::report_type::ReportType;
use crate::reports::{self, dm_reviewer, ReportOutput};
use crate::stages::{geo_enricher, pivot, survey_site, table_enricher, table_merger, type_tagger};

/// Tables every report starts from
#[derive(Debug, Clone)]
pub struct PreparedTables {
    /// Unified element records (stages 1-3)
    pub elements: DataFrame,
    /// Survey-site status table (stage 4)
    pub survey: DataFrame,
}

/// Stages 1-4
pub fn prepare(
    source: &dyn FeatureSource,
    counties: &[CountyBoundary],
    config: &ReportConfig,
) -> Result<PreparedTables> {
    info!("Getting county info...");
    let enriched = geo_enricher::enrich(source, counties, config)?;
    let tagged = type_tagger::tag(enriched);

    info!("Merging tables...");
    let elements = table_merger::merge(&tagged, &config.element_fields)?;

    let survey_features = source
        .collection(&config.survey_collection)
        .with_context(|| format!("Failed to load survey sites from {}", config.survey_collection))?;
    let survey = survey_site::extract(&survey_features)?;

    Ok(PreparedTables { elements, survey })
}

/// Stages 5-6
pub fn enriched_pivot(tables: &PreparedTables, config: &ReportConfig) -> Result<DataFrame> {
    info!("Creating pivot table...");
    let pivoted = pivot::build(&tables.elements, &config.total_status_codes)?;
    table_enricher::enrich(&pivoted, &tables.survey, &tables.elements, config)
}

/// Stage 7 for every report the selection covers
pub fn build_reports(
    report: ReportType,
    tables: &PreparedTables,
    config: &ReportConfig,
) -> Result<Vec<(ReportType, ReportOutput)>> {
    let selected: Vec<ReportType> = match report {
        ReportType::DmAll => ReportType::INDIVIDUAL.to_vec(),
        single => vec![single],
    };

    let pivot = if selected.iter().any(|r| r.needs_pivot()) {
        Some(enriched_pivot(tables, config)?)
    } else {
        None
    };

    selected
        .into_iter()
        .map(|report| -> Result<(ReportType, ReportOutput)> {
            info!("Creating {} report ({})", report, report.description());
            let output = match (&pivot, report) {
                (_, ReportType::DmReviewer) => {
                    let taxonomy = load_taxonomy(&config.taxonomy_path)?;
                    ReportOutput::PerPerson(dm_reviewer::build(&tables.elements, &taxonomy, config)?)
                }
                (Some(pivot), report) => reports::classify_pivot(report, pivot, config)?,
                (None, report) => anyhow::bail!("no pivot table built for {}", report),
            };
            info!("{} report created: {} rows", report, output.row_count());
            Ok((report, output))
        })
        .collect()
}

/// Full run: load inputs, build the selected report(s) and export them
pub fn run(
    report: ReportType,
    source: &dyn FeatureSource,
    config: &ReportConfig,
    exporter: &Exporter,
) -> Result<Vec<PathBuf>> {
    let counties = load_counties(&config.counties_path, &config.county_name_field)?;
    let tables = prepare(source, &counties, config)?;

    let mut written = Vec::new();
    for (report, output) in build_reports(report, &tables, config)? {
        written.extend(exporter.export(report, &output)?);
    }

    info!("Done: {} file(s) written", written.len());
    Ok(written)
}
