//! Readers for raw, uncleaned star tables.

pub mod raw;

pub use raw::{read_raw_rows, read_raw_rows_from_file, RawStarRow};
