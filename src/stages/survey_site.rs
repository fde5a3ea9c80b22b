//! STAGE 4: SURVEY-SITE EXTRACTOR
//!
//! Reduces the survey-site collection to {refcode, survey_site_dmstat,
//! dm_stat_comm}. The site status is renamed so it cannot collide with the
//! element-level `dm_stat` after joins.
//!
//! Refcode is assumed unique here; duplicates are not rejected.

use polars::prelude::*;
use anyhow::Result;
use tracing::info;

use super::table_merger::attribute_frame;
use crate::data::SourceFeature;

pub const SURVEY_SITE_DMSTAT: &str = "survey_site_dmstat";

pub fn extract(features: &[SourceFeature]) -> Result<DataFrame> {
    let survey = attribute_frame(
        features,
        &[
            ("refcode", "refcode"),
            ("dm_stat", SURVEY_SITE_DMSTAT),
            ("dm_stat_comm", "dm_stat_comm"),
        ],
    )?;

    info!("Extracted {} survey sites", survey.height());
    Ok(survey)
}
