//! DataFrame helpers for whitelisting and row filtering
//!
//! Provides the column-validation patterns the stages share, so a missing
//! required column fails with a message naming the stage.

use polars::prelude::*;
use anyhow::Result;
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::error::ReportError;

/// Fail unless every required column is present
pub fn require_columns(df: &DataFrame, columns: &[&str], context: &str) -> Result<()> {
    let actual: HashSet<&str> = df.get_column_names().into_iter().map(|s| s.as_str()).collect();

    for &expected in columns {
        if !actual.contains(expected) {
            return Err(ReportError::MissingColumn {
                context: context.to_string(),
                column: expected.to_string(),
            }
            .into());
        }
    }

    Ok(())
}

/// Keep only whitelisted columns, in the frame's existing order.
///
/// Whitelist entries the frame does not carry are ignored.
pub fn retain_columns<S: AsRef<str>>(df: &DataFrame, whitelist: &[S]) -> Result<DataFrame> {
    let keep: HashSet<&str> = whitelist.iter().map(|s| s.as_ref()).collect();
    let names: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| keep.contains(name.as_str()))
        .cloned()
        .collect();

    Ok(df.select(names)?)
}

/// Drop the named columns, tolerating ones that are already absent
pub fn drop_optional(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let drop: HashSet<&str> = columns.iter().copied().collect();
    let present: HashSet<&str> = df.get_column_names().into_iter().map(|s| s.as_str()).collect();

    for missing in columns.iter().filter(|c| !present.contains(**c)) {
        debug!("Field '{}' not present, nothing to drop", missing);
    }

    let names: Vec<PlSmallStr> = df
        .get_column_names()
        .into_iter()
        .filter(|name| !drop.contains(name.as_str()))
        .cloned()
        .collect();

    Ok(df.select(names)?)
}

/// Filter rows with a per-row predicate over one text column
pub fn filter_by_text<F>(df: &DataFrame, column: &str, keep: F) -> Result<DataFrame>
where
    F: Fn(Option<&str>) -> bool,
{
    let values = df.column(column)?.str()?;
    let mask: BooleanChunked = values.into_iter().map(|v| keep(v)).collect();
    Ok(df.filter(&mask)?)
}

/// Split a frame into one sub-frame per distinct non-null value of `column`,
/// sorted by value. Rows with a null value are left out.
pub fn partition_by_text(df: &DataFrame, column: &str) -> Result<Vec<(String, DataFrame)>> {
    let values = df.column(column)?.str()?;
    let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();

    distinct
        .into_iter()
        .map(|value| {
            let mask: BooleanChunked = values.into_iter().map(|v| v == Some(value)).collect();
            Ok((value.to_string(), df.filter(&mask)?))
        })
        .collect()
}
