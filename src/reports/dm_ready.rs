//! DM READY
//!
//! Sites whose own status is `dmready` and whose elements are all `dmready`
//! (the dmready count equals `total_records`). Kept rows are flagged
//! `ALLREADY = "Y"` and the remaining helper count columns are removed.

use polars::prelude::*;
use anyhow::Result;

use crate::stages::survey_site::SURVEY_SITE_DMSTAT;
use crate::stages::TOTAL_RECORDS;
use crate::utils::{drop_optional, require_columns};

pub const ALL_READY: &str = "ALLREADY";

/// Count columns not needed once every row is known to be all-ready.
/// `fc` and `F` only exist on some data and may be absent.
const HELPER_COLUMNS: [&str; 6] = ["dr", "idrev", "dmpend", "dmproc", "fc", "F"];

pub fn is_all_ready(dmready: Option<i64>, total: Option<i64>, site_status: Option<&str>) -> bool {
    dmready.is_some() && dmready == total && site_status == Some("dmready")
}

pub fn build(pivot: &DataFrame) -> Result<DataFrame> {
    require_columns(pivot, &["dmready", TOTAL_RECORDS, SURVEY_SITE_DMSTAT], "DM Ready")?;

    let ready = pivot.column("dmready")?.i64()?;
    let total = pivot.column(TOTAL_RECORDS)?.i64()?;
    let status = pivot.column(SURVEY_SITE_DMSTAT)?.str()?;

    let mask: BooleanChunked = ready
        .into_iter()
        .zip(total.into_iter())
        .zip(status.into_iter())
        .map(|((ready, total), status)| is_all_ready(ready, total, status))
        .collect();

    let mut kept = pivot.filter(&mask)?;
    let flags = vec!["Y"; kept.height()];
    kept.with_column(Series::new(ALL_READY.into(), flags))?;

    drop_optional(&kept, &HELPER_COLUMNS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_ready_rule() {
        assert!(is_all_ready(Some(3), Some(3), Some("dmready")));
        assert!(!is_all_ready(Some(2), Some(3), Some("dmready")));
        assert!(!is_all_ready(Some(3), Some(3), Some("dmpend")));
        assert!(!is_all_ready(Some(3), Some(3), None));
    }

    #[test]
    fn test_build_filters_and_flags() {
        let pivot = df![
            "refcode" => &["A", "B", "C"],
            "dmpend" => &[0i64, 1, 0],
            "dmproc" => &[0i64, 0, 0],
            "dmready" => &[3i64, 2, 3],
            "dr" => &[0i64, 0, 0],
            "idrev" => &[0i64, 0, 0],
            TOTAL_RECORDS => &[3i64, 3, 3],
            SURVEY_SITE_DMSTAT => &["dmready", "dmready", "dmpend"],
        ]
        .unwrap();

        let report = build(&pivot).unwrap();
        assert_eq!(report.height(), 1);
        assert_eq!(report.column("refcode").unwrap().str().unwrap().get(0), Some("A"));
        assert_eq!(report.column(ALL_READY).unwrap().str().unwrap().get(0), Some("Y"));

        let names: Vec<&str> = report.get_column_names().into_iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["refcode", "dmready", TOTAL_RECORDS, SURVEY_SITE_DMSTAT, ALL_READY]);
    }
}
