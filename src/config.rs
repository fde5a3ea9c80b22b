//! Report Configuration
//!
//! All organisational constants live here: input collection names, field
//! whitelists, the western county list, owner rosters and the reviewer
//! decision table. `Default` carries the values the reports are run with;
//! a JSON file can override any subset of them.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

use crate::error::ReportError;

// ============================================================================
// Input collections
// ============================================================================

/// One source feature collection and the logical name it is tagged with
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CollectionSpec {
    /// Name of the collection in the record store (e.g. "el_pt")
    pub source: String,
    /// Logical name written into `element_type` (e.g. "element_point")
    pub element_type: String,
}

impl CollectionSpec {
    fn new(source: &str, element_type: &str) -> Self {
        Self {
            source: source.to_string(),
            element_type: element_type.to_string(),
        }
    }
}

// ============================================================================
// Decision tables
// ============================================================================

/// Region flag derived from the county a record falls in
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub enum Region {
    #[serde(rename = "E")]
    East,
    #[serde(rename = "W")]
    West,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::East => "E",
            Region::West => "W",
        }
    }

    pub fn parse(flag: &str) -> Option<Self> {
        match flag {
            "E" => Some(Region::East),
            "W" => Some(Region::West),
            _ => None,
        }
    }
}

/// Refcode substring → specialist who owns records created under a placeholder account
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct OwnerCorrection {
    pub refcode_fragment: String,
    pub owner: String,
}

/// One row of the reviewer decision table.
///
/// Matches when the element code starts with any of `prefixes` and, if
/// `region` is set, the record's region equals it.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ReviewerRule {
    pub prefixes: Vec<String>,
    pub region: Option<Region>,
    pub reviewer: String,
}

impl ReviewerRule {
    fn new(prefixes: &[&str], region: Option<Region>, reviewer: &str) -> Self {
        Self {
            prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            region,
            reviewer: reviewer.to_string(),
        }
    }

    pub fn matches(&self, element_code: &str, region: Option<Region>) -> bool {
        let prefix_hit = self.prefixes.iter().any(|p| element_code.starts_with(p.as_str()));
        match self.region {
            Some(required) => prefix_hit && region == Some(required),
            None => prefix_hit,
        }
    }
}

// ============================================================================
// Output locations
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the single-file reports (DM Pending, DM Ready, DM Total)
    pub root: PathBuf,
    /// Sub-directory of `root` for per-biologist files
    pub biologist_dir: String,
    /// Sub-directory of `root` for per-reviewer files
    pub reviewer_dir: String,
    /// File extension, without the dot
    pub extension: String,
    /// chrono format for the date stamp in filenames
    pub date_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("Reports"),
            biologist_dir: "Biologist Status Reports".to_string(),
            reviewer_dir: "ID Reviewers Status Reports".to_string(),
            extension: "csv".to_string(),
            date_format: "%d%b%Y".to_string(),
        }
    }
}

// ============================================================================
// Top-level configuration
// ============================================================================

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory holding `<collection>.geojson` files
    pub data_dir: PathBuf,
    /// County boundary layer (GeoJSON)
    pub counties_path: PathBuf,
    /// Attribute on the boundary layer carrying the county name
    pub county_name_field: String,
    /// Taxonomy lookup spreadsheet (CSV)
    pub taxonomy_path: PathBuf,

    pub collections: Vec<CollectionSpec>,
    pub survey_collection: String,

    /// Attributes kept through the spatial join and the merge
    pub element_fields: Vec<String>,
    /// Attributes kept on the enriched pivot
    pub pivot_fields: Vec<String>,
    /// Attributes kept on the reviewer report
    pub reviewer_fields: Vec<String>,
    /// Status codes summed into `total_records`
    pub total_status_codes: Vec<String>,

    pub west_counties: Vec<String>,

    pub placeholder_owners: Vec<String>,
    pub owner_corrections: Vec<OwnerCorrection>,
    pub reviewer_rules: Vec<ReviewerRule>,

    pub output: OutputConfig,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for ReportConfig {
    fn default() -> Self {
        let collections = vec![
            CollectionSpec::new("el_pt", "element_point"),
            CollectionSpec::new("el_line", "element_line"),
            CollectionSpec::new("comm_poly", "community_poly"),
            CollectionSpec::new("comm_pt", "community_point"),
            CollectionSpec::new("el_poly", "element_poly"),
            CollectionSpec::new("survey_poly", "survey_site"),
        ];

        let element_fields = strings(&[
            "county", "refcode", "created_by", "created_on", "dm_stat", "dm_stat_comm",
            "last_up_by", "last_up_on", "element_type", "elem_name", "id_prob",
            "id_prob_comm", "specimen_taken", "specimen_count", "specimen_desc",
            "curatorial_meth", "specimen_repo", "voucher_photo",
        ]);

        let pivot_fields = strings(&[
            "refcode", "dmpend", "dmproc", "dmready", "dr", "idrev", "total_records",
            "survey_site_dmstat", "dm_stat", "dm_stat_comm", "county", "created_by",
            "created_on", "last_up_by", "last_up_on", "element_type", "EastWest",
        ]);

        let reviewer_fields = strings(&[
            "county", "refcode", "created_by", "created_on", "dm_stat", "Reviewer",
            "dm_stat_comm", "last_up_by", "last_up_on", "element_type", "id_prob",
            "id_prob_comm", "specimen_taken", "specimen_count", "specimen_desc",
            "curatorial_meth", "specimen_repo", "voucher_photo", "SCIENTIFIC_NAME",
            "ELEMENT_CODE",
        ]);

        let west_counties = strings(&[
            "ERIE", "CRAWFORD", "MERCER", "LAWRENCE", "BEAVER", "WASHINGTON",
            "GREENE", "VENANGO", "BUTLER", "ALLEGHENY", "FAYETTE", "WESTMORELAND",
            "ARMSTORNG", "INDIANA", "CLARION", "JEFFERSON", "FOREST", "WARREN",
            "MCKEAN", "ELK", "CLEARFIELD", "CAMBRIA", "SOMERSET", "BEDFORD", "BLAIR",
            "CENTRE", "CLINTON", "POTTER", "CAMERON", "HUNTINGDON", "FULTON",
            "FRANKLIN",
        ]);

        let owner_corrections = [
            ("hna", "ahnatkovich"), ("geo", "bgeorgic"), ("lep", "bleppo"),
            ("eic", "ceichelberger"), ("tra", "ctracey"), ("dwa", "dwatts"),
            ("yea", "dyeany"), ("zim", "ezimmerman"), ("eaz", "ezimmerman"),
            ("alb", "jalbert"), ("kun", "jkunsman"), ("mcp", "jmcpherson"),
            ("mil", "rmiller"), ("wis", "jwisgo"), ("gip", "kgipe"),
            ("fur", "mfuredi"), ("wal", "mwalsh"), ("wat", "dwatts"),
            ("woo", "pwoods"), ("gle", "rgleason"), ("gru", "sgrund"),
            ("sch", "sschuette"), ("shc", "sschuette"), ("dav", "ezimmerman"),
        ]
        .iter()
        .map(|(fragment, owner)| OwnerCorrection {
            refcode_fragment: fragment.to_string(),
            owner: owner.to_string(),
        })
        .collect();

        use Region::{East, West};
        // Order is load-bearing: longer prefixes precede the shorter ones they extend.
        let reviewer_rules = vec![
            ReviewerRule::new(&["P"], Some(East), "jkunsman"),
            ReviewerRule::new(&["P"], Some(West), "sgrund"),
            ReviewerRule::new(&["N"], None, "sschuette"),
            ReviewerRule::new(&["C", "H", "G"], None, "ezimmerman"),
            ReviewerRule::new(&["AB"], Some(East), "dwatts"),
            ReviewerRule::new(&["AB"], Some(West), "dyeany"),
            ReviewerRule::new(&["AM"], None, "ceichelberger"),
            ReviewerRule::new(&["AR", "AA"], Some(East), "ceichelberger"),
            ReviewerRule::new(&["AR", "AA"], Some(West), "rmiller"),
            ReviewerRule::new(&["AF"], Some(East), "Need Reviewer"),
            ReviewerRule::new(&["AF"], Some(West), "Need Reviewer"),
            ReviewerRule::new(&["IMBIV", "IMGAS"], None, "mwalsh"),
            ReviewerRule::new(&["IILE", "IIODO"], Some(East), "bleppo"),
            ReviewerRule::new(&["IILE", "IIODO"], Some(West), "pwoods"),
            ReviewerRule::new(&["IILAR"], None, "cbier"),
            ReviewerRule::new(&["II"], Some(East), "bleppo"),
            ReviewerRule::new(&["II"], Some(West), "pwoods"),
            ReviewerRule::new(&["I"], Some(East), "bleppo"),
            ReviewerRule::new(&["I"], Some(West), "pwoods"),
        ];

        Self {
            data_dir: PathBuf::from("data"),
            counties_path: PathBuf::from("data/counties.geojson"),
            county_name_field: "COUNTY_NAM".to_string(),
            taxonomy_path: PathBuf::from("data/element_taxonomy.csv"),
            collections,
            survey_collection: "survey_poly".to_string(),
            element_fields,
            pivot_fields,
            reviewer_fields,
            total_status_codes: strings(&["dmpend", "dmproc", "dmready", "dr", "idrev"]),
            west_counties,
            placeholder_owners: strings(&["arcgis", "tjadmin", "administrator", "bgeorgic", "jalbert"]),
            owner_corrections,
            reviewer_rules,
            output: OutputConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a JSON file; fields not present keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: ReportConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config JSON: {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.collections.is_empty() {
            return Err(ReportError::InvalidConfig("no input collections".into()));
        }
        if !self.element_fields.iter().any(|f| f == "refcode") {
            return Err(ReportError::InvalidConfig(
                "element_fields must include refcode".into(),
            ));
        }
        if self.total_status_codes.is_empty() {
            return Err(ReportError::InvalidConfig("total_status_codes is empty".into()));
        }
        if let Some(rule) = self.reviewer_rules.iter().find(|r| r.prefixes.is_empty()) {
            return Err(ReportError::InvalidConfig(format!(
                "reviewer rule for '{}' has no prefixes",
                rule.reviewer
            )));
        }
        Ok(())
    }

    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.geojson", name))
    }
}
