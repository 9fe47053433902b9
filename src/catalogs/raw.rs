//! Raw star rows as delivered by the stars API export.
//!
//! Every column is kept as optional text: coordinates arrive as sexagesimal
//! strings (`"14h 41m 19s"`, `"+19° 10′ 56″"`), magnitudes sometimes carry a
//! unicode minus sign, and any column may be blank. Turning these rows into
//! [`StarRecord`](crate::StarRecord)s is the job of [`crate::normalize`].

use std::path::Path;

use serde::Deserialize;

/// A single uncleaned row. Extra CSV columns (such as a leading index) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawStarRow {
    pub name: Option<String>,
    pub constellation: Option<String>,
    pub right_ascension: Option<String>,
    pub declination: Option<String>,
    pub apparent_magnitude: Option<String>,
    pub absolute_magnitude: Option<String>,
    pub distance_light_year: Option<String>,
    pub spectral_class: Option<String>,
}

/// Read raw rows from any CSV source with a header line.
pub fn read_raw_rows<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<RawStarRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    rdr.deserialize::<RawStarRow>()
        .collect::<Result<Vec<RawStarRow>, csv::Error>>()
        .map_err(|e| e.into())
}

/// Read raw rows from a CSV file.
pub fn read_raw_rows_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<RawStarRow>> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| {
        anyhow::anyhow!("failed to open raw star file {}: {}", path.as_ref().display(), e)
    })?;
    read_raw_rows(file)
}
