//! The clean star table.
//!
//! `StarTable` owns the cleaned [`StarRecord`]s and handles reading and
//! writing them as CSV. It is loaded once at start-up and only ever read
//! afterwards; every query in [`crate::query`] borrows the rows and returns
//! fresh results.

use std::path::Path;

use tracing::info;

use crate::catalogs::read_raw_rows_from_file;
use crate::normalize::{normalize_rows, NormalizeReport};
use crate::StarRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarTable {
    stars: Vec<StarRecord>,
}

impl StarTable {
    /// Build a table from already-clean records.
    pub fn new(stars: Vec<StarRecord>) -> Self {
        Self { stars }
    }

    /// Return the total number of stars in the table.
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Return `true` when the table contains no stars.
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Return all stars as an immutable slice.
    pub fn stars(&self) -> &[StarRecord] {
        &self.stars
    }

    /// Distinct constellation labels in first-seen order.
    pub fn constellations(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for star in &self.stars {
            if !seen.contains(&star.constellation.as_str()) {
                seen.push(&star.constellation);
            }
        }
        seen
    }

    /// All stars belonging to `constellation`, in table order.
    pub fn in_constellation(&self, constellation: &str) -> Vec<&StarRecord> {
        self.stars
            .iter()
            .filter(|s| s.constellation == constellation)
            .collect()
    }

    /// Read a clean table from CSV.
    pub fn read_csv<R: std::io::Read>(reader: R) -> anyhow::Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let stars = rdr
            .deserialize::<StarRecord>()
            .collect::<Result<Vec<StarRecord>, csv::Error>>()?;
        Ok(Self::new(stars))
    }

    /// Write the table as CSV with a header line.
    pub fn write_csv<W: std::io::Write>(&self, writer: W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for star in &self.stars {
            wtr.serialize(star)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Load a clean table from a CSV file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| anyhow::anyhow!("failed to open star table {}: {}", path.display(), e))?;
        let table = Self::read_csv(file)?;
        info!("Loaded {} stars from {}", table.len(), path.display());
        Ok(table)
    }

    /// Save the table to a CSV file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))?;
        info!("Saved {} stars to {}", self.len(), path.display());
        Ok(())
    }

    /// Read a raw CSV export, clean it, and return the resulting table
    /// together with the per-row report.
    pub fn clean_raw_file<P: AsRef<Path>>(path: P) -> anyhow::Result<(Self, NormalizeReport)> {
        let path = path.as_ref();
        info!("Loading raw star rows from {}", path.display());
        let rows = read_raw_rows_from_file(path)?;
        info!("Loaded {} raw rows", rows.len());
        let report = normalize_rows(&rows);
        let table = Self::new(report.records().cloned().collect());
        Ok((table, report))
    }
}
