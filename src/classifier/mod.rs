//! Constellation prediction from sky coordinates.
//!
//! The classifier maps a `(right_ascension, declination)` pair to the
//! constellation it most likely belongs to:
//!
//! 1. **Training** (offline): fit a z-score [`StandardScaler`] over the
//!    coordinates of the full clean table, split the scaled vectors 80/20 with
//!    a fixed seed, fit a [`KNearestNeighbors`] classifier (k = 15) on the
//!    training part and measure accuracy on the held-out part.
//! 2. **Persistence**: the scaler and the classifier are written as two rkyv
//!    files and loaded once per process.
//! 3. **Prediction** (online): scale the query with the fitted scaler, vote
//!    among the k nearest training vectors, and keep classes whose vote share
//!    exceeds 5%.

pub mod knn;
pub mod predict;
pub mod scaler;
pub mod train;

use std::path::{Path, PathBuf};

use rkyv::{Archive, Deserialize, Serialize};
use tracing::info;

use crate::query::Range;

pub use knn::KNearestNeighbors;
pub use predict::{ClassProbability, Prediction, PredictionReport, Submission};
pub use scaler::StandardScaler;

/// Number of classifier features: right ascension and declination.
pub const NUM_FEATURES: usize = 2;

/// A feature vector `[right_ascension, declination]`, raw or scaled.
pub type Features = [f64; NUM_FEATURES];

/// File name of the serialized scaler inside the model directory.
pub const SCALER_FILE: &str = "scaler.rkyv";
/// File name of the serialized classifier inside the model directory.
pub const CLASSIFIER_FILE: &str = "knn_model.rkyv";

// ── Model properties ────────────────────────────────────────────────────────

/// Metadata describing how a model was trained.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct ModelProperties {
    /// Number of voting neighbors.
    pub k: u32,
    /// Seed of the train/test shuffle.
    pub seed: u64,
    /// Fraction of rows held out for testing.
    pub test_fraction: f64,
    /// Rows in the clean table the model was built from.
    pub num_records: u32,
    /// Rows in the training partition.
    pub train_size: u32,
    /// Rows in the held-out partition.
    pub test_size: u32,
    /// Accuracy on the held-out partition. None if it was empty.
    pub test_accuracy: Option<f64>,
    /// Number of distinct constellations seen in training.
    pub num_classes: u32,
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Parameters controlling training.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of neighbors that vote. Default 15.
    pub k: usize,
    /// Fraction of rows held out for the accuracy check. Default 0.2.
    pub test_fraction: f64,
    /// Seed for the train/test shuffle. Default 42.
    pub seed: u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            k: 15,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

/// Parameters controlling prediction.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    /// Classes at or below this vote share are left out of the breakdown.
    /// Default 0.05.
    pub min_probability: f64,
    /// Accepted right ascension range in hours; inputs are clamped. Default [0, 24].
    pub ra_bounds: Range,
    /// Accepted declination range in degrees; inputs are clamped. Default [-90, 90].
    pub dec_bounds: Range,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            min_probability: 0.05,
            ra_bounds: Range::new(0.0, 24.0),
            dec_bounds: Range::new(-90.0, 90.0),
        }
    }
}

// ── The model artifact pair ─────────────────────────────────────────────────

/// Fitted scaler and classifier, immutable once trained or loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelArtifacts {
    pub scaler: StandardScaler,
    pub classifier: KNearestNeighbors,
    pub props: ModelProperties,
}

/// On-disk layout of the classifier file.
///
/// A copy of the scaler the classifier was trained against ties the two
/// files together; a classifier file is only valid next to that scaler.
#[derive(Archive, Serialize, Deserialize)]
struct ClassifierFile {
    classifier: KNearestNeighbors,
    props: ModelProperties,
    scaler: StandardScaler,
}

impl ModelArtifacts {
    /// Save both artifacts into `dir`, creating it if needed.
    ///
    /// Each file is written to a temporary sibling first and renamed into
    /// place, so readers never observe a partially written artifact. The
    /// classifier file records the scaler it belongs to, and
    /// [`load_from_dir`](Self::load_from_dir) rejects a pair left mixed by
    /// an interrupted save.
    pub fn save_to_dir<P: AsRef<Path>>(&self, dir: P) -> anyhow::Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let scaler_bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&self.scaler)
            .map_err(|e| anyhow::anyhow!("rkyv serialization of scaler failed: {}", e))?;
        let classifier_file = ClassifierFile {
            classifier: self.classifier.clone(),
            props: self.props.clone(),
            scaler: self.scaler.clone(),
        };
        let classifier_bytes = rkyv::to_bytes::<rkyv::rancor::Error>(&classifier_file)
            .map_err(|e| anyhow::anyhow!("rkyv serialization of classifier failed: {}", e))?;

        let scaler_path = dir.join(SCALER_FILE);
        let classifier_path = dir.join(CLASSIFIER_FILE);
        let scaler_tmp = staged_path(&scaler_path);
        let classifier_tmp = staged_path(&classifier_path);

        let staged = std::fs::write(&scaler_tmp, &scaler_bytes)
            .and_then(|_| std::fs::write(&classifier_tmp, &classifier_bytes));
        if let Err(e) = staged {
            let _ = std::fs::remove_file(&scaler_tmp);
            let _ = std::fs::remove_file(&classifier_tmp);
            return Err(anyhow::anyhow!(
                "failed to stage model files in {}: {}",
                dir.display(),
                e
            ));
        }
        std::fs::rename(&scaler_tmp, &scaler_path)?;
        std::fs::rename(&classifier_tmp, &classifier_path)?;

        info!(
            "Saved model to {} (scaler {} bytes, classifier {} bytes)",
            dir.display(),
            scaler_bytes.len(),
            classifier_bytes.len()
        );
        Ok(())
    }

    /// Load both artifacts from `dir`.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> anyhow::Result<Self> {
        let dir = dir.as_ref();

        let bytes = read_aligned(&dir.join(SCALER_FILE))?;
        let scaler = rkyv::from_bytes::<StandardScaler, rkyv::rancor::Error>(&bytes)
            .map_err(|e| anyhow::anyhow!("rkyv deserialization of scaler failed: {}", e))?;

        let bytes = read_aligned(&dir.join(CLASSIFIER_FILE))?;
        let ClassifierFile {
            classifier,
            props,
            scaler: trained_with,
        } = rkyv::from_bytes::<ClassifierFile, rkyv::rancor::Error>(&bytes)
            .map_err(|e| anyhow::anyhow!("rkyv deserialization of classifier failed: {}", e))?;
        classifier.validate()?;
        if trained_with != scaler {
            anyhow::bail!(
                "{} and {} in {} are from different trainings",
                SCALER_FILE,
                CLASSIFIER_FILE,
                dir.display()
            );
        }

        info!(
            "Loaded model: k={}, {} training vectors, {} classes",
            classifier.k,
            classifier.len(),
            classifier.classes().len()
        );
        Ok(Self {
            scaler,
            classifier,
            props,
        })
    }
}

fn staged_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn read_aligned(path: &Path) -> anyhow::Result<rkyv::util::AlignedVec> {
    let raw = std::fs::read(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
    let mut bytes = rkyv::util::AlignedVec::<16>::with_capacity(raw.len());
    bytes.extend_from_slice(&raw);
    Ok(bytes)
}
