//! STAGE 5: PIVOT BUILDER
//!
//! Counts element records per (refcode, dm_stat) and pivots the status codes
//! into columns, giving one row per refcode:
//!
//! | refcode | dmpend | dmproc | dmready | dr | idrev | ... |
//!
//! Every configured core status code gets a column even when unobserved, plus
//! one column per additional status code seen in the data. Missing
//! combinations are zero. Records with a null `dm_stat` still give their
//! refcode a row but count towards no column. Rows with a null refcode are
//! dropped.

use polars::prelude::*;
use anyhow::Result;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::utils::require_columns;

pub const REFCODE: &str = "refcode";
pub const DM_STAT: &str = "dm_stat";
pub const FREQUENCY: &str = "FREQUENCY";

/// Status codes that become pivot columns: core codes plus every observed code, sorted
pub fn status_codes(elements: &DataFrame, core: &[String]) -> Result<Vec<String>> {
    let observed = elements.column(DM_STAT)?.str()?;

    let mut codes: BTreeSet<String> = core.iter().cloned().collect();
    codes.extend(
        observed
            .into_iter()
            .flatten()
            .filter(|code| !code.is_empty() && *code != REFCODE)
            .map(|code| code.to_string()),
    );

    Ok(codes.into_iter().collect())
}

/// Per-(refcode, dm_stat) record counts
pub fn status_counts(elements: &DataFrame) -> Result<DataFrame> {
    require_columns(elements, &[REFCODE, DM_STAT], "status counts")?;

    let counts = elements
        .clone()
        .lazy()
        .group_by_stable([col(REFCODE), col(DM_STAT)])
        .agg([len().cast(DataType::Int64).alias(FREQUENCY)])
        .collect()?;

    Ok(counts)
}

/// Pivot status counts into one column per status code
pub fn pivot(counts: &DataFrame, codes: &[String]) -> Result<DataFrame> {
    let columns: Vec<Expr> = codes
        .iter()
        .map(|code| {
            when(col(DM_STAT).eq(lit(code.as_str())))
                .then(col(FREQUENCY))
                .otherwise(lit(0i64))
                .sum()
                .alias(code.as_str())
        })
        .collect();

    let pivoted = counts
        .clone()
        .lazy()
        .group_by_stable([col(REFCODE)])
        .agg(columns)
        .filter(col(REFCODE).is_not_null())
        .sort([REFCODE], Default::default())
        .collect()?;

    Ok(pivoted)
}

/// Build the pivot table from the merged element records
pub fn build(elements: &DataFrame, core_codes: &[String]) -> Result<DataFrame> {
    let codes = status_codes(elements, core_codes)?;
    debug!("Pivoting on status codes {:?}", codes);

    let counts = status_counts(elements)?;
    let pivoted = pivot(&counts, &codes)?;

    info!("Pivot table: {} refcodes x {} status codes", pivoted.height(), codes.len());
    Ok(pivoted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Vec<String> {
        ["dmpend", "dmproc", "dmready", "dr", "idrev"].iter().map(|s| s.to_string()).collect()
    }

    fn elements() -> DataFrame {
        df![
            REFCODE => &[Some("R2"), Some("R1"), Some("R1"), Some("R1"), None, Some("R3")],
            DM_STAT => &[Some("dmpend"), Some("dmready"), Some("dmready"), Some("idrev"), Some("dmready"), None],
        ]
        .unwrap()
    }

    fn count(df: &DataFrame, refcode: &str, code: &str) -> Option<i64> {
        let refcodes = df.column(REFCODE).unwrap().str().unwrap();
        let idx = refcodes.into_iter().position(|r| r == Some(refcode))?;
        df.column(code).unwrap().i64().unwrap().get(idx)
    }

    #[test]
    fn test_one_row_per_refcode_with_counts() {
        let pivoted = build(&elements(), &core()).unwrap();

        assert_eq!(pivoted.height(), 3);
        assert_eq!(count(&pivoted, "R1", "dmready"), Some(2));
        assert_eq!(count(&pivoted, "R1", "idrev"), Some(1));
        assert_eq!(count(&pivoted, "R1", "dmpend"), Some(0));
        assert_eq!(count(&pivoted, "R2", "dmpend"), Some(1));
    }

    #[test]
    fn test_null_refcode_dropped_null_status_counts_nowhere() {
        let pivoted = build(&elements(), &core()).unwrap();

        assert_eq!(pivoted.column(REFCODE).unwrap().null_count(), 0);
        for code in core() {
            assert_eq!(count(&pivoted, "R3", &code), Some(0));
        }
    }

    #[test]
    fn test_unobserved_core_and_extra_codes_become_columns() {
        let df = df![
            REFCODE => &["R1", "R1"],
            DM_STAT => &["dmready", "fc"],
        ]
        .unwrap();

        let pivoted = build(&df, &core()).unwrap();
        assert_eq!(count(&pivoted, "R1", "dr"), Some(0));
        assert_eq!(count(&pivoted, "R1", "fc"), Some(1));
        assert_eq!(pivoted.width(), 1 + core().len() + 1);
    }

    #[test]
    fn test_missing_status_column_fails() {
        let df = df![REFCODE => &["R1"]].unwrap();
        assert!(build(&df, &core()).is_err());
    }
}
