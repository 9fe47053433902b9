//! Offline training of the constellation classifier.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

use crate::StarRecord;

use super::{
    Features, KNearestNeighbors, ModelArtifacts, ModelProperties, StandardScaler, TrainConfig,
};

/// Shuffle `0..n` with a seeded RNG and split it into `(train, test)` index
/// lists. The test part holds `ceil(test_fraction * n)` indices.
pub fn train_test_split(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let n_test = ((test_fraction.clamp(0.0, 1.0) * n as f64).ceil() as usize).min(n);
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let train = indices.split_off(n_test);
    (train, indices)
}

impl ModelArtifacts {
    /// Fit the scaler and classifier on a clean star table.
    ///
    /// The scaler is fitted over every row; the classifier only over the
    /// training partition. Held-out accuracy is recorded in
    /// [`ModelProperties`] but never gates the result.
    pub fn train(stars: &[StarRecord], config: &TrainConfig) -> anyhow::Result<Self> {
        if stars.is_empty() {
            anyhow::bail!("cannot train on an empty star table");
        }
        info!(
            "Training k-NN classifier on {} stars (k={}, test fraction {}, seed {})",
            stars.len(),
            config.k,
            config.test_fraction,
            config.seed
        );

        let features: Vec<Features> = stars.iter().map(|s| s.coordinates()).collect();
        let scaler = StandardScaler::fit(&features)?;
        info!("Scaler: mean {:?}, scale {:?}", scaler.mean, scaler.scale);
        let scaled = scaler.transform_all(&features);

        let (train_idx, test_idx) =
            train_test_split(stars.len(), config.test_fraction, config.seed);
        info!(
            "Split into {} training and {} test rows",
            train_idx.len(),
            test_idx.len()
        );

        let train_points: Vec<Features> = train_idx.iter().map(|&i| scaled[i]).collect();
        let train_labels: Vec<&str> = train_idx
            .iter()
            .map(|&i| stars[i].constellation.as_str())
            .collect();
        let classifier = KNearestNeighbors::fit(config.k, train_points, &train_labels)?;

        let test_accuracy = if test_idx.is_empty() {
            None
        } else {
            let correct = test_idx
                .iter()
                .filter(|&&i| {
                    classifier.predict(scaled[i]) == Some(stars[i].constellation.as_str())
                })
                .count();
            Some(correct as f64 / test_idx.len() as f64)
        };
        match test_accuracy {
            Some(acc) => info!("Held-out accuracy: {:.2}%", acc * 100.0),
            None => info!("No held-out rows; accuracy not measured"),
        }

        let props = ModelProperties {
            k: config.k as u32,
            seed: config.seed,
            test_fraction: config.test_fraction,
            num_records: stars.len() as u32,
            train_size: train_idx.len() as u32,
            test_size: test_idx.len() as u32,
            test_accuracy,
            num_classes: classifier.classes().len() as u32,
        };

        Ok(Self {
            scaler,
            classifier,
            props,
        })
    }
}
