//! DM BIOLOGIST
//!
//! One table per biologist:
//!   1. Fully processed sites are dropped (same rule as DM Total).
//!   2. Owner names are lowercased.
//!   3. Rows owned by a placeholder account are reassigned to a specialist
//!      when the refcode contains one of the specialist's fragments. The
//!      correction table is scanned in order and the first fragment found wins.
//!   4. Rows are split by owner; rows with no owner are not exported.

use polars::prelude::*;
use anyhow::Result;
use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::dm_total::drop_fully_processed;
use crate::config::{OwnerCorrection, ReportConfig};
use crate::stages::pivot::REFCODE;
use crate::utils::{drop_optional, partition_by_text, require_columns};

pub const OWNER: &str = "created_by";

/// Placeholder-account correction over the ordered fragment table
pub struct OwnerCorrector<'a> {
    placeholders: FxHashSet<String>,
    corrections: &'a [OwnerCorrection],
}

impl<'a> OwnerCorrector<'a> {
    pub fn new(config: &'a ReportConfig) -> Self {
        Self {
            placeholders: config.placeholder_owners.iter().map(|p| p.to_lowercase()).collect(),
            corrections: &config.owner_corrections,
        }
    }

    pub fn is_placeholder(&self, owner: &str) -> bool {
        self.placeholders.contains(&owner.to_lowercase())
    }

    /// Owner after correction; owners that are not placeholders pass through
    pub fn correct(&self, owner: Option<&str>, refcode: Option<&str>) -> Option<String> {
        let owner = owner?;
        let refcode = match refcode {
            Some(refcode) if self.is_placeholder(owner) => refcode.to_lowercase(),
            _ => return Some(owner.to_string()),
        };

        let specialist = self
            .corrections
            .iter()
            .find(|c| refcode.contains(&c.refcode_fragment.to_lowercase()))
            .map(|c| c.owner.clone());

        Some(specialist.unwrap_or_else(|| owner.to_string()))
    }
}

/// Lowercase and correct the owner column
pub fn assign_owners(pivot: &DataFrame, config: &ReportConfig) -> Result<DataFrame> {
    require_columns(pivot, &[REFCODE, OWNER], "DM Biologist")?;

    let corrector = OwnerCorrector::new(config);
    let owners = pivot.column(OWNER)?.str()?;
    let refcodes = pivot.column(REFCODE)?.str()?;

    let mut reassigned = 0usize;
    let corrected: Vec<Option<String>> = owners
        .into_iter()
        .zip(refcodes.into_iter())
        .map(|(owner, refcode)| {
            let lowered = owner.map(|o| o.to_lowercase());
            let corrected = corrector.correct(lowered.as_deref(), refcode);
            if corrected != lowered {
                reassigned += 1;
            }
            corrected
        })
        .collect();
    debug!("Reassigned {} placeholder-owned rows", reassigned);

    let mut assigned = pivot.clone();
    assigned.with_column(Series::new(OWNER.into(), corrected))?;
    Ok(assigned)
}

pub fn build(pivot: &DataFrame, config: &ReportConfig) -> Result<Vec<(String, DataFrame)>> {
    let active = drop_fully_processed(pivot)?;
    let assigned = assign_owners(&active, config)?;
    let assigned = drop_optional(&assigned, &["F"])?;

    let per_owner = partition_by_text(&assigned, OWNER)?;
    info!("DM Biologist: {} rows across {} biologists", assigned.height(), per_owner.len());
    Ok(per_owner)
}
