//! Utility modules shared across stages and reports

pub mod frame_helpers;

pub use frame_helpers::{drop_optional, filter_by_text, partition_by_text, require_columns, retain_columns};
