//! STAGE 6: TABLE ENRICHER
//!
//! Turns the raw pivot into the table every pivot-based report filters:
//!   1. `total_records` = sum of the configured core status columns. Status
//!      codes outside that set are not counted.
//!   2. Left join of `survey_site_dmstat` and `dm_stat_comm` by refcode.
//!   3. Left join of county/owner/timestamp/element_type by refcode, taking
//!      the last element row per refcode in merged order.
//!   4. `EastWest` from the county.
//!   5. Columns reduced to the pivot whitelist.

use polars::prelude::*;
use anyhow::Result;
use tracing::info;

use super::pivot::REFCODE;
use super::region::with_east_west;
use super::survey_site::SURVEY_SITE_DMSTAT;
use crate::config::ReportConfig;
use crate::utils::{require_columns, retain_columns};

pub const TOTAL_RECORDS: &str = "total_records";

/// Element attributes copied onto each pivot row
pub const ELEMENT_METADATA: [&str; 6] = [
    "county",
    "created_by",
    "created_on",
    "last_up_by",
    "last_up_on",
    "element_type",
];

/// Sum expression over the given status columns
fn total_expr(codes: &[String]) -> Expr {
    codes
        .iter()
        .fold(lit(0i64), |acc, code| acc + col(code.as_str()))
        .alias(TOTAL_RECORDS)
}

pub fn enrich(
    pivot: &DataFrame,
    survey: &DataFrame,
    elements: &DataFrame,
    config: &ReportConfig,
) -> Result<DataFrame> {
    let core: Vec<&str> = config.total_status_codes.iter().map(|c| c.as_str()).collect();
    require_columns(pivot, &core, "table enricher (pivot)")?;
    require_columns(survey, &[REFCODE, SURVEY_SITE_DMSTAT, "dm_stat_comm"], "table enricher (survey sites)")?;

    let mut metadata_columns = vec![REFCODE];
    metadata_columns.extend(ELEMENT_METADATA);
    require_columns(elements, &metadata_columns, "table enricher (elements)")?;

    let survey_lazy = survey
        .clone()
        .lazy()
        .select([col(REFCODE), col(SURVEY_SITE_DMSTAT), col("dm_stat_comm")]);

    let metadata_lazy = elements
        .clone()
        .lazy()
        .group_by_stable([col(REFCODE)])
        .agg(ELEMENT_METADATA.iter().map(|c| col(*c).last()).collect::<Vec<_>>());

    let joined = pivot
        .clone()
        .lazy()
        .with_column(total_expr(&config.total_status_codes))
        .left_join(survey_lazy, col(REFCODE), col(REFCODE))
        .left_join(metadata_lazy, col(REFCODE), col(REFCODE))
        .sort([REFCODE], Default::default())
        .collect()?;

    let with_region = with_east_west(joined, "county", &config.west_counties)?;
    let enriched = retain_columns(&with_region, &config.pivot_fields)?;

    info!("Enriched pivot: {} rows, {} columns", enriched.height(), enriched.width());
    Ok(enriched)
}
