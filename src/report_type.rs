//! Report selection

use std::fmt;
use std::str::FromStr;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportType {
    DmPending,
    DmReady,
    DmBiologist,
    DmReviewer,
    DmTotal,
    /// Every report above from a single pipeline pass
    DmAll,
}

impl ReportType {
    /// The five individual reports, in the order `DmAll` runs them
    pub const INDIVIDUAL: [ReportType; 5] = [
        ReportType::DmTotal,
        ReportType::DmReady,
        ReportType::DmPending,
        ReportType::DmBiologist,
        ReportType::DmReviewer,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReportType::DmPending => "DM Pending",
            ReportType::DmReady => "DM Ready",
            ReportType::DmBiologist => "DM Biologist",
            ReportType::DmReviewer => "DM Reviewer",
            ReportType::DmTotal => "DM Total",
            ReportType::DmAll => "DM All",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportType::DmTotal => "summary of all records currently in the FIND database",
            ReportType::DmReady => "all records ready to be processed by the data management team",
            ReportType::DmPending => "all records listed as DM Pending",
            ReportType::DmBiologist => "one report per biologist with the status of all records belonging to them",
            ReportType::DmReviewer => "one report per ID reviewer with the records ready for them to review",
            ReportType::DmAll => "all of the above reports",
        }
    }

    /// Reports that export one file per owner or reviewer
    pub fn is_per_person(&self) -> bool {
        matches!(self, ReportType::DmBiologist | ReportType::DmReviewer)
    }

    /// Reports built from the pivot rather than the raw element records
    pub fn needs_pivot(&self) -> bool {
        !matches!(self, ReportType::DmReviewer)
    }

    /// Label used inside per-person filenames
    pub fn person_label(&self) -> Option<&'static str> {
        match self {
            ReportType::DmBiologist => Some("FIND"),
            ReportType::DmReviewer => Some("ID Reviewers"),
            _ => None,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "dm pending" => Ok(ReportType::DmPending),
            "dm ready" => Ok(ReportType::DmReady),
            "dm biologist" => Ok(ReportType::DmBiologist),
            "dm reviewer" => Ok(ReportType::DmReviewer),
            "dm total" => Ok(ReportType::DmTotal),
            "dm all" => Ok(ReportType::DmAll),
            _ => Err(ReportError::UnknownReportType(s.to_string())),
        }
    }
}
