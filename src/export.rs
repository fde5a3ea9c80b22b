//! STAGE 8: EXPORTER
//!
//! Writes report tables to dated files:
//!   `<ReportLabel> <DDMonYYYY>.<ext>` in the output root, or
//!   `<Person> - <Label> Status Report <DDMonYYYY>.<ext>` in the
//!   report's per-person directory.
//! Existing files with the same name are overwritten.

use polars::prelude::*;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::OutputConfig;
use crate::report_type::ReportType;
use crate::reports::ReportOutput;

pub struct Exporter {
    output: OutputConfig,
    date: NaiveDate,
}

impl Exporter {
    pub fn new(output: OutputConfig, date: NaiveDate) -> Self {
        Self { output, date }
    }

    pub fn date_stamp(&self) -> String {
        self.date.format(&self.output.date_format).to_string()
    }

    pub fn report_filename(&self, report: ReportType) -> String {
        format!("{} {}.{}", report.label(), self.date_stamp(), self.output.extension)
    }

    pub fn person_filename(&self, report: ReportType, person: &str) -> String {
        let label = report.person_label().unwrap_or_else(|| report.label());
        // Person names come from data; keep them from escaping the directory
        let person = person.replace(['/', '\\'], "_");
        format!("{} - {} Status Report {}.{}", person, label, self.date_stamp(), self.output.extension)
    }

    /// Directory a report's files go to
    pub fn directory(&self, report: ReportType) -> PathBuf {
        match report {
            ReportType::DmBiologist => self.output.root.join(&self.output.biologist_dir),
            ReportType::DmReviewer => self.output.root.join(&self.output.reviewer_dir),
            _ => self.output.root.clone(),
        }
    }

    /// Write every table of a report, returning the paths written
    pub fn export(&self, report: ReportType, output: &ReportOutput) -> Result<Vec<PathBuf>> {
        let dir = self.directory(report);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create output directory {:?}", dir))?;

        let written = match output {
            ReportOutput::Single(df) => {
                let path = dir.join(self.report_filename(report));
                write_table(df, &path)?;
                vec![path]
            }
            ReportOutput::PerPerson(tables) => tables
                .iter()
                .map(|(person, df)| {
                    let path = dir.join(self.person_filename(report, person));
                    write_table(df, &path)?;
                    Ok(path)
                })
                .collect::<Result<Vec<_>>>()?,
        };

        info!("{} written: {} file(s) in {:?}", report, written.len(), dir);
        Ok(written)
    }
}

fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create {:?}", path))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df.clone())
        .with_context(|| format!("Failed to write {:?}", path))?;

    debug!("Wrote {} rows to {:?}", df.height(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exporter(root: &Path) -> Exporter {
        let output = OutputConfig {
            root: root.to_path_buf(),
            extension: "xls".into(),
            ..OutputConfig::default()
        };
        Exporter::new(output, NaiveDate::from_ymd_opt(2016, 9, 6).unwrap())
    }

    #[test]
    fn test_filenames_follow_dated_patterns() {
        let exporter = exporter(Path::new("out"));
        assert_eq!(exporter.report_filename(ReportType::DmPending), "DM Pending 06Sep2016.xls");
        assert_eq!(exporter.report_filename(ReportType::DmTotal), "DM Total 06Sep2016.xls");
        assert_eq!(
            exporter.person_filename(ReportType::DmBiologist, "jkunsman"),
            "jkunsman - FIND Status Report 06Sep2016.xls"
        );
        assert_eq!(
            exporter.person_filename(ReportType::DmReviewer, "Need Reviewer"),
            "Need Reviewer - ID Reviewers Status Report 06Sep2016.xls"
        );
    }

    #[test]
    fn test_per_person_files_land_in_report_directory() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());

        let a = df!["refcode" => &["R1"], "Reviewer" => &["cbier"]].unwrap();
        let b = df!["refcode" => &["R2", "R3"], "Reviewer" => &["pwoods", "pwoods"]].unwrap();
        let output = ReportOutput::PerPerson(vec![("cbier".into(), a), ("pwoods".into(), b)]);

        let written = exporter.export(ReportType::DmReviewer, &output).unwrap();
        assert_eq!(written.len(), 2);
        for path in &written {
            assert!(path.starts_with(dir.path().join("ID Reviewers Status Reports")));
            assert!(path.exists());
        }

        let contents = fs::read_to_string(&written[1]).unwrap();
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.starts_with("refcode,Reviewer"));
    }

    #[test]
    fn test_single_report_written_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());

        let df = df!["refcode" => &["R1"]].unwrap();
        let written = exporter.export(ReportType::DmReady, &ReportOutput::Single(df)).unwrap();
        assert_eq!(written, vec![dir.path().join("DM Ready 06Sep2016.xls")]);
    }
}
