//! Pipeline Integration Tests
//!
//! Runs the full pipeline over a small GeoJSON record store written to a
//! temp directory: two counties (ERIE in the west, BUCKS in the east), the
//! six element collections and a taxonomy table.

use chrono::NaiveDate;
use find_dm_reports::data::load_counties;
use find_dm_reports::pipeline::{self, PreparedTables};
use find_dm_reports::stages::{EAST_WEST, TOTAL_RECORDS};
use find_dm_reports::{Exporter, GeoJsonDirectory, ReportConfig, ReportOutput, ReportType};
use polars::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

fn square(x0: f64, y0: f64, size: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x0, y0], [x0 + size, y0], [x0 + size, y0 + size], [x0, y0 + size], [x0, y0]]]
    })
}

fn point(x: f64, y: f64) -> Value {
    json!({ "type": "Point", "coordinates": [x, y] })
}

fn feature(geometry: Value, refcode: &str, dm_stat: &str, owner: &str, elem_name: &str) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "refcode": refcode,
            "dm_stat": dm_stat,
            "created_by": owner,
            "created_on": "2016-09-06",
            "elem_name": elem_name,
            "Shape_Area": 1.0
        }
    })
}

fn write_collection(dir: &Path, name: &str, features: Vec<Value>) {
    let collection = json!({ "type": "FeatureCollection", "features": features });
    fs::write(dir.join(format!("{}.geojson", name)), collection.to_string()).unwrap();
}

/// Record store with four survey sites:
/// - PAHNA001 (ERIE): all ready, created under a placeholder account
/// - PAJS0002 (BUCKS): pending, one element awaiting ID review
/// - PABL0003 (BUCKS): fully processed
/// - PAGRU004 (ERIE): pending, one element awaiting ID review
fn write_fixture(dir: &Path) -> ReportConfig {
    let counties = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": square(0.0, 0.0, 10.0), "properties": { "COUNTY_NAM": "ERIE" } },
            { "type": "Feature", "geometry": square(10.0, 0.0, 10.0), "properties": { "COUNTY_NAM": "BUCKS" } }
        ]
    });
    fs::write(dir.join("counties.geojson"), counties.to_string()).unwrap();

    write_collection(dir, "el_pt", vec![
        feature(point(1.0, 1.0), "PAHNA001", "dmready", "ArcGIS", "1"),
        feature(point(2.0, 2.0), "PAHNA001", "dmready", "ArcGIS", "1"),
        feature(point(15.0, 5.0), "PAJS0002", "idrev", "jsmith", "2"),
    ]);
    write_collection(dir, "el_line", vec![feature(
        json!({ "type": "LineString", "coordinates": [[12.0, 1.0], [14.0, 1.0]] }),
        "PAJS0002", "dmpend", "jsmith", "2",
    )]);
    write_collection(dir, "comm_poly", vec![
        feature(square(11.0, 1.0, 2.0), "PABL0003", "dmproc", "bleppo", "3"),
    ]);
    write_collection(dir, "comm_pt", vec![]);
    write_collection(dir, "el_poly", vec![
        feature(point(5.0, 5.0), "PAGRU004", "idrev", "tjadmin", "1"),
    ]);
    write_collection(dir, "survey_poly", vec![
        feature(square(1.0, 1.0, 2.0), "PAHNA001", "dmready", "ArcGIS", ""),
        feature(square(14.0, 4.0, 2.0), "PAJS0002", "dmpend", "JSmith", ""),
        feature(square(11.0, 1.0, 2.0), "PABL0003", "dmproc", "bleppo", ""),
        feature(square(4.0, 4.0, 2.0), "PAGRU004", "dmpend", "tjadmin", ""),
    ]);

    fs::write(
        dir.join("taxonomy.csv"),
        "ELEMENT_SUBNATIONAL_ID,ELEMENT_CODE,SCIENTIFIC_NAME\n1,PDAST0001,Aster one\n2,IILAR0002,Larva two\n",
    )
    .unwrap();

    let mut config = ReportConfig::default();
    config.data_dir = dir.to_path_buf();
    config.counties_path = dir.join("counties.geojson");
    config.taxonomy_path = dir.join("taxonomy.csv");
    config.output.root = dir.join("Reports");
    config
}

fn prepared(dir: &Path) -> (ReportConfig, PreparedTables) {
    let config = write_fixture(dir);
    let source = GeoJsonDirectory::new(dir);
    let counties = load_counties(&config.counties_path, &config.county_name_field).unwrap();
    let tables = pipeline::prepare(&source, &counties, &config).unwrap();
    (config, tables)
}

fn refcodes(df: &DataFrame) -> Vec<String> {
    df.column("refcode")
        .unwrap()
        .str()
        .unwrap()
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect()
}

#[test]
fn merged_elements_keep_every_feature_with_county_and_type() {
    let dir = tempfile::tempdir().unwrap();
    let (_, tables) = prepared(dir.path());

    assert_eq!(tables.elements.height(), 10);
    assert!(tables.elements.column("Shape_Area").is_err());
    assert_eq!(tables.elements.column("county").unwrap().null_count(), 0);
    assert_eq!(tables.elements.column("element_type").unwrap().null_count(), 0);
    assert_eq!(tables.survey.height(), 4);
}

#[test]
fn enriched_pivot_totals_and_regions() {
    let dir = tempfile::tempdir().unwrap();
    let (config, tables) = prepared(dir.path());
    let pivot = pipeline::enriched_pivot(&tables, &config).unwrap();

    assert_eq!(refcodes(&pivot), vec!["PABL0003", "PAGRU004", "PAHNA001", "PAJS0002"]);

    let total = pivot.column(TOTAL_RECORDS).unwrap().i64().unwrap();
    for idx in 0..pivot.height() {
        let sum: i64 = config
            .total_status_codes
            .iter()
            .map(|c| pivot.column(c).unwrap().i64().unwrap().get(idx).unwrap())
            .sum();
        assert_eq!(total.get(idx), Some(sum));
    }
    assert_eq!(total.get(2), Some(3));

    let flags: Vec<Option<&str>> = pivot.column(EAST_WEST).unwrap().str().unwrap().into_iter().collect();
    assert_eq!(flags, vec![Some("E"), Some("W"), Some("W"), Some("E")]);
}

#[test]
fn single_table_reports_filter_sites() {
    let dir = tempfile::tempdir().unwrap();
    let (config, tables) = prepared(dir.path());

    let single = |report| match pipeline::build_reports(report, &tables, &config).unwrap().remove(0).1 {
        ReportOutput::Single(df) => df,
        ReportOutput::PerPerson(_) => panic!("expected a single table"),
    };

    assert_eq!(refcodes(&single(ReportType::DmReady)), vec!["PAHNA001"]);
    assert_eq!(refcodes(&single(ReportType::DmPending)), vec!["PAGRU004", "PAJS0002"]);
    assert_eq!(refcodes(&single(ReportType::DmTotal)), vec!["PAGRU004", "PAHNA001", "PAJS0002"]);
}

#[test]
fn dm_all_exports_every_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let source = GeoJsonDirectory::new(dir.path());
    let exporter = Exporter::new(config.output.clone(), NaiveDate::from_ymd_opt(2016, 9, 6).unwrap());

    let written = pipeline::run(ReportType::DmAll, &source, &config, &exporter).unwrap();
    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();

    assert_eq!(written.len(), 8);
    for expected in [
        "DM Total 06Sep2016.csv",
        "DM Ready 06Sep2016.csv",
        "DM Pending 06Sep2016.csv",
        "ahnatkovich - FIND Status Report 06Sep2016.csv",
        "jsmith - FIND Status Report 06Sep2016.csv",
        "sgrund - FIND Status Report 06Sep2016.csv",
        "cbier - ID Reviewers Status Report 06Sep2016.csv",
        "sgrund - ID Reviewers Status Report 06Sep2016.csv",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {}", expected);
    }

    let reviewer_dir = config.output.root.join("ID Reviewers Status Reports");
    let cbier = fs::read_to_string(reviewer_dir.join("cbier - ID Reviewers Status Report 06Sep2016.csv")).unwrap();
    assert!(cbier.contains("PAJS0002"));
    assert!(cbier.contains("Larva two"));
}

#[test]
fn missing_collection_aborts_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    fs::remove_file(dir.path().join("el_line.geojson")).unwrap();

    let source = GeoJsonDirectory::new(dir.path());
    let exporter = Exporter::new(config.output.clone(), NaiveDate::from_ymd_opt(2016, 9, 6).unwrap());

    let err = pipeline::run(ReportType::DmTotal, &source, &config, &exporter).unwrap_err();
    assert!(format!("{:#}", err).contains("el_line"));
}
