//! DM PENDING
//!
//! Sites whose survey-site status is `dmpend`. Null status is dropped.

use polars::prelude::*;
use anyhow::Result;

use crate::stages::survey_site::SURVEY_SITE_DMSTAT;
use crate::utils::{drop_optional, filter_by_text};

pub fn build(pivot: &DataFrame) -> Result<DataFrame> {
    let pending = filter_by_text(pivot, SURVEY_SITE_DMSTAT, |status| status == Some("dmpend"))?;
    drop_optional(&pending, &["F"])
}
