//! Process-scoped explorer state.
//!
//! An [`Explorer`] owns the clean star table and the model artifact pair.
//! Both are loaded once at start-up and only borrowed afterwards; every
//! derived value is recomputed from an input snapshot on demand.

use std::path::PathBuf;

use tracing::info;

use crate::classifier::{ModelArtifacts, PredictConfig, PredictionReport, Submission};
use crate::query::{
    constellation_counts, sorted_by_constellation_size, ConstellationCount, ConstellationProfile,
    FilterSummary, RangeFilter, SliderSpec,
};
use crate::{StarRecord, StarTable};

/// Where the explorer finds its inputs.
#[derive(Debug, Clone)]
pub struct ExplorerPaths {
    /// Clean star table. Default `data/cleaned_data.csv`.
    pub data: PathBuf,
    /// Directory holding the model artifact pair. Default `models`.
    pub models: PathBuf,
}

impl Default for ExplorerPaths {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data/cleaned_data.csv"),
            models: PathBuf::from("models"),
        }
    }
}

/// Everything derived from one range selection.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    pub summary: FilterSummary,
    /// Stars per constellation, largest first.
    pub counts: Vec<ConstellationCount>,
    /// Matching rows, largest constellation first.
    pub rows: Vec<&'a StarRecord>,
}

impl<'a> Selection<'a> {
    /// Apply a range selection to `stars` and derive its summary, counts
    /// and rows.
    pub fn from_filter(stars: &'a [StarRecord], filter: &RangeFilter) -> Self {
        let rows = filter.apply(stars);
        Self {
            summary: FilterSummary::from_selection(&rows),
            counts: constellation_counts(rows.iter().copied()),
            rows: sorted_by_constellation_size(&rows),
        }
    }
}

pub struct Explorer {
    table: StarTable,
    model: ModelArtifacts,
    predict_config: PredictConfig,
}

impl Explorer {
    pub fn new(table: StarTable, model: ModelArtifacts) -> Self {
        Self {
            table,
            model,
            predict_config: PredictConfig::default(),
        }
    }

    /// Load the table and the model artifacts from disk.
    pub fn load(paths: &ExplorerPaths) -> anyhow::Result<Self> {
        let table = StarTable::load_from_file(&paths.data)?;
        let model = ModelArtifacts::load_from_dir(&paths.models)?;
        info!(
            "Explorer ready: {} stars, {} constellations",
            table.len(),
            table.constellations().len()
        );
        Ok(Self::new(table, model))
    }

    pub fn with_predict_config(mut self, config: PredictConfig) -> Self {
        self.predict_config = config;
        self
    }

    pub fn table(&self) -> &StarTable {
        &self.table
    }

    pub fn model(&self) -> &ModelArtifacts {
        &self.model
    }

    /// Slider bounds for the five range inputs.
    pub fn sliders(&self) -> Vec<SliderSpec> {
        SliderSpec::all_for(self.table.stars()).unwrap_or_default()
    }

    /// Initial range selection: interquartile range of every field, or
    /// unbounded ranges for an empty table.
    pub fn default_filter(&self) -> RangeFilter {
        RangeFilter::defaults_for(self.table.stars()).unwrap_or_default()
    }

    pub fn select(&self, filter: &RangeFilter) -> Selection<'_> {
        Selection::from_filter(self.table.stars(), filter)
    }

    /// Per-field distributions of one constellation.
    pub fn profile(&self, constellation: &str) -> Option<ConstellationProfile> {
        ConstellationProfile::build(self.table.stars(), constellation)
    }

    /// Predict for a submission; `None` on incomplete input.
    pub fn predict(&self, submission: &Submission) -> Option<PredictionReport> {
        self.model.predict_submission(submission, &self.predict_config)
    }
}
