//! Brute-force k-nearest-neighbor classifier over 2-D feature vectors.
//!
//! Training simply stores the (already scaled) feature vectors together with
//! their label indices. Prediction ranks every training point by Euclidean
//! distance and takes an unweighted vote among the `k` closest. Points at
//! equal distance keep training order, so results are deterministic.

use nalgebra::Vector2;
use rkyv::{Archive, Deserialize, Serialize};

use super::Features;

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct KNearestNeighbors {
    /// Number of neighbors that vote.
    pub k: u32,
    /// Class labels, sorted. Probability vectors follow this order.
    pub classes: Vec<String>,
    /// Training feature vectors.
    pub points: Vec<Features>,
    /// Class index of each training vector.
    pub labels: Vec<u32>,
}

impl KNearestNeighbors {
    /// Store training vectors and their labels.
    ///
    /// Fails when the inputs differ in length or there are fewer than `k`
    /// training points.
    pub fn fit<S: AsRef<str>>(
        k: usize,
        points: Vec<Features>,
        labels: &[S],
    ) -> anyhow::Result<Self> {
        if k == 0 {
            anyhow::bail!("k must be at least 1");
        }
        if points.len() != labels.len() {
            anyhow::bail!(
                "got {} training vectors but {} labels",
                points.len(),
                labels.len()
            );
        }
        if points.len() < k {
            anyhow::bail!(
                "need at least k = {} training samples, got {}",
                k,
                points.len()
            );
        }

        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();

        let labels = labels
            .iter()
            .map(|l| {
                classes
                    .binary_search_by(|c| c.as_str().cmp(l.as_ref()))
                    .map(|idx| idx as u32)
                    .map_err(|_| anyhow::anyhow!("label {:?} missing from classes", l.as_ref()))
            })
            .collect::<anyhow::Result<Vec<u32>>>()?;

        Ok(Self {
            k: k as u32,
            classes,
            points,
            labels,
        })
    }

    /// Return the class labels in probability order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Number of stored training vectors.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check internal consistency, e.g. after loading from disk.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.points.len() != self.labels.len() {
            anyhow::bail!(
                "classifier has {} vectors but {} labels",
                self.points.len(),
                self.labels.len()
            );
        }
        if self.k == 0 || (self.k as usize) > self.points.len() {
            anyhow::bail!(
                "classifier k = {} is invalid for {} training vectors",
                self.k,
                self.points.len()
            );
        }
        if let Some(bad) = self.labels.iter().find(|&&l| l as usize >= self.classes.len()) {
            anyhow::bail!(
                "label index {} out of range for {} classes",
                bad,
                self.classes.len()
            );
        }
        Ok(())
    }

    /// The `k` nearest training points as `(index, distance)`, closest first.
    pub fn neighbors(&self, query: Features) -> Vec<(usize, f64)> {
        let q = Vector2::from(query);
        let mut dists: Vec<(usize, f64)> = self
            .points
            .iter()
            .enumerate()
            .map(|(idx, p)| (idx, (Vector2::from(*p) - q).norm()))
            .collect();
        // stable: equal distances keep training order
        dists.sort_by(|a, b| a.1.total_cmp(&b.1));
        dists.truncate(self.k as usize);
        dists
    }

    /// Vote share of each class among the `k` nearest neighbors, in
    /// [`classes`](Self::classes) order.
    pub fn predict_proba(&self, query: Features) -> Vec<f64> {
        let mut votes = vec![0u32; self.classes.len()];
        let neighbors = self.neighbors(query);
        for &(idx, _) in &neighbors {
            votes[self.labels[idx] as usize] += 1;
        }
        let total = neighbors.len().max(1) as f64;
        votes.into_iter().map(|v| v as f64 / total).collect()
    }

    /// Index of the winning class; ties go to the class listed first.
    pub fn predict_index(&self, query: Features) -> Option<usize> {
        argmax(&self.predict_proba(query))
    }

    /// Label of the winning class.
    pub fn predict(&self, query: Features) -> Option<&str> {
        self.predict_index(query).map(|idx| self.classes[idx].as_str())
    }
}

/// First index holding the maximum value.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((idx, v)),
        }
    }
    best.map(|(idx, _)| idx)
}
