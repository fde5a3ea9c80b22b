//! DM REVIEWER
//!
//! Works on the merged element records, not the pivot:
//!   1. Keep records with `dm_stat == "idrev"`.
//!   2. Attach ELEMENT_CODE / SCIENTIFIC_NAME from the taxonomy by `elem_name`.
//!   3. Derive EastWest from the county.
//!   4. Drop records the taxonomy does not know.
//!   5. Assign a reviewer from the ordered decision table (first match wins).
//!   6. Split by reviewer; records no rule matches are not exported.

use polars::prelude::*;
use anyhow::Result;
use tracing::info;

use crate::config::{Region, ReportConfig, ReviewerRule};
use crate::data::{TaxonomyLookup, ELEMENT_CODE, SCIENTIFIC_NAME};
use crate::stages::pivot::DM_STAT;
use crate::stages::{with_east_west, EAST_WEST};
use crate::utils::{filter_by_text, partition_by_text, require_columns, retain_columns};

pub const REVIEWER: &str = "Reviewer";
pub const ELEMENT_NAME: &str = "elem_name";

/// Reviewer for an element code, or None when no rule matches
pub fn assign_reviewer<'a>(
    element_code: &str,
    region: Option<Region>,
    rules: &'a [ReviewerRule],
) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| rule.matches(element_code, region))
        .map(|rule| rule.reviewer.as_str())
}

/// Attach taxonomy columns by element name
pub fn join_taxonomy(records: &DataFrame, taxonomy: &TaxonomyLookup) -> Result<DataFrame> {
    let names = records.column(ELEMENT_NAME)?.str()?;

    let (codes, scientific): (Vec<Option<String>>, Vec<Option<String>>) = names
        .into_iter()
        .map(|name| match name.and_then(|n| taxonomy.get(n)) {
            Some(entry) => (entry.element_code.clone(), entry.scientific_name.clone()),
            None => (None, None),
        })
        .unzip();

    let mut joined = records.clone();
    joined.with_column(Series::new(ELEMENT_CODE.into(), codes))?;
    joined.with_column(Series::new(SCIENTIFIC_NAME.into(), scientific))?;
    Ok(joined)
}

/// Add the Reviewer column from ELEMENT_CODE and EastWest
pub fn assign_reviewers(records: &DataFrame, rules: &[ReviewerRule]) -> Result<DataFrame> {
    let codes = records.column(ELEMENT_CODE)?.str()?;
    let regions = records.column(EAST_WEST)?.str()?;

    let reviewers: Vec<Option<&str>> = codes
        .into_iter()
        .zip(regions.into_iter())
        .map(|(code, region)| {
            code.and_then(|code| assign_reviewer(code, region.and_then(Region::parse), rules))
        })
        .collect();

    let mut assigned = records.clone();
    assigned.with_column(Series::new(REVIEWER.into(), reviewers))?;
    Ok(assigned)
}

pub fn build(
    elements: &DataFrame,
    taxonomy: &TaxonomyLookup,
    config: &ReportConfig,
) -> Result<Vec<(String, DataFrame)>> {
    require_columns(elements, &[DM_STAT, ELEMENT_NAME, "county"], "DM Reviewer")?;

    let in_review = filter_by_text(elements, DM_STAT, |status| status == Some("idrev"))?;
    let joined = join_taxonomy(&in_review, taxonomy)?;
    let regioned = with_east_west(joined, "county", &config.west_counties)?;
    let coded = filter_by_text(&regioned, ELEMENT_CODE, |code| code.is_some())?;
    let assigned = assign_reviewers(&coded, &config.reviewer_rules)?;
    let report = retain_columns(&assigned, &config.reviewer_fields)?;

    let per_reviewer = partition_by_text(&report, REVIEWER)?;
    info!(
        "DM Reviewer: {} records in review, {} with taxonomy, {} reviewers",
        in_review.height(),
        coded.height(),
        per_reviewer.len()
    );
    Ok(per_reviewer)
}
