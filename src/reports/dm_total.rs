//! DM TOTAL
//!
//! Every site except the fully processed ones. A site is fully processed
//! when all of its elements are `dmproc` and its own status is `dmproc` or
//! unknown (null).

use polars::prelude::*;
use anyhow::Result;

use crate::stages::survey_site::SURVEY_SITE_DMSTAT;
use crate::stages::TOTAL_RECORDS;
use crate::utils::require_columns;

pub fn is_fully_processed(dmproc: Option<i64>, total: Option<i64>, site_status: Option<&str>) -> bool {
    dmproc == total && matches!(site_status, Some("dmproc") | None)
}

/// Drop fully processed sites; shared with the biologist report
pub fn drop_fully_processed(pivot: &DataFrame) -> Result<DataFrame> {
    require_columns(pivot, &["dmproc", TOTAL_RECORDS, SURVEY_SITE_DMSTAT], "fully processed filter")?;

    let dmproc = pivot.column("dmproc")?.i64()?;
    let total = pivot.column(TOTAL_RECORDS)?.i64()?;
    let status = pivot.column(SURVEY_SITE_DMSTAT)?.str()?;

    let mask: BooleanChunked = dmproc
        .into_iter()
        .zip(total.into_iter())
        .zip(status.into_iter())
        .map(|((dmproc, total), status)| !is_fully_processed(dmproc, total, status))
        .collect();

    Ok(pivot.filter(&mask)?)
}

pub fn build(pivot: &DataFrame) -> Result<DataFrame> {
    drop_fully_processed(pivot)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_processed_rule() {
        assert!(is_fully_processed(Some(3), Some(3), Some("dmproc")));
        assert!(is_fully_processed(Some(3), Some(3), None));
        assert!(!is_fully_processed(Some(2), Some(3), Some("dmproc")));
        assert!(!is_fully_processed(Some(3), Some(3), Some("dmready")));
        assert!(!is_fully_processed(Some(0), Some(2), None));
    }

    #[test]
    fn test_build_keeps_everything_else() {
        let pivot = df![
            "refcode" => &["A", "B", "C", "D"],
            "dmproc" => &[3i64, 3, 1, 2],
            TOTAL_RECORDS => &[3i64, 3, 3, 2],
            SURVEY_SITE_DMSTAT => &[Some("dmproc"), None, Some("dmproc"), Some("dmpend")],
        ]
        .unwrap();

        let kept = build(&pivot).unwrap();
        let refcodes: Vec<Option<&str>> = kept.column("refcode").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(refcodes, vec![Some("C"), Some("D")]);
    }
}
