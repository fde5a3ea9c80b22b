//! EastWest region flag
//!
//! A county in the western list is 'W'; anything else, null included, is 'E'.

use polars::prelude::*;
use anyhow::Result;
use rustc_hash::FxHashSet;

use crate::config::Region;

pub const EAST_WEST: &str = "EastWest";

pub fn region_for(county: Option<&str>, west: &FxHashSet<&str>) -> Region {
    match county {
        Some(name) if west.contains(name) => Region::West,
        _ => Region::East,
    }
}

/// Add (or replace) the `EastWest` column derived from `county_column`
pub fn with_east_west(mut df: DataFrame, county_column: &str, west_counties: &[String]) -> Result<DataFrame> {
    let west: FxHashSet<&str> = west_counties.iter().map(|c| c.as_str()).collect();

    let flags: Vec<&str> = df
        .column(county_column)?
        .str()?
        .into_iter()
        .map(|county| region_for(county, &west).as_str())
        .collect();

    df.with_column(Series::new(EAST_WEST.into(), flags))?;
    Ok(df)
}
