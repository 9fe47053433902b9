use rkyv::{Archive, Deserialize, Serialize};

use super::{Features, NUM_FEATURES};

/// Z-score feature scaler: `(x - mean) / scale` per feature.
///
/// `scale` is the population standard deviation of the fitted data; a
/// feature with zero variance gets a scale of 1 so it passes through
/// centered but unscaled.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Features,
    pub scale: Features,
}

impl StandardScaler {
    /// Fit mean and standard deviation over all samples.
    pub fn fit(samples: &[Features]) -> anyhow::Result<Self> {
        if samples.is_empty() {
            anyhow::bail!("cannot fit a scaler on zero samples");
        }
        let n = samples.len() as f64;

        let mut mean = [0.0; NUM_FEATURES];
        for s in samples {
            for (m, v) in mean.iter_mut().zip(s) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = [0.0; NUM_FEATURES];
        for s in samples {
            for ((acc, v), m) in var.iter_mut().zip(s).zip(&mean) {
                *acc += (v - m) * (v - m);
            }
        }
        let scale = var.map(|v| {
            let std = (v / n).sqrt();
            if std > 0.0 {
                std
            } else {
                1.0
            }
        });

        Ok(Self { mean, scale })
    }

    /// Transform one sample with the fitted parameters.
    pub fn transform(&self, sample: Features) -> Features {
        let mut out = sample;
        for ((o, m), s) in out.iter_mut().zip(&self.mean).zip(&self.scale) {
            *o = (*o - m) / s;
        }
        out
    }

    pub fn transform_all(&self, samples: &[Features]) -> Vec<Features> {
        samples.iter().map(|&s| self.transform(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_population_statistics() {
        let samples = [[1.0, 10.0], [3.0, 10.0], [5.0, 10.0], [7.0, 10.0]];
        let scaler = StandardScaler::fit(&samples).unwrap();
        assert_eq!(scaler.mean, [4.0, 10.0]);
        assert!((scaler.scale[0] - 5.0_f64.sqrt()).abs() < 1e-12);
        // constant feature keeps unit scale
        assert_eq!(scaler.scale[1], 1.0);
    }

    #[test]
    fn transformed_data_is_standardized() {
        let samples = [[2.0, -30.0], [14.0, 45.0], [8.0, 0.0], [20.0, 60.0], [5.5, -80.0]];
        let scaler = StandardScaler::fit(&samples).unwrap();
        let scaled = scaler.transform_all(&samples);
        for j in 0..NUM_FEATURES {
            let n = scaled.len() as f64;
            let mean: f64 = scaled.iter().map(|s| s[j]).sum::<f64>() / n;
            let var: f64 = scaled.iter().map(|s| (s[j] - mean).powi(2)).sum::<f64>() / n;
            assert!(mean.abs() < 1e-12);
            assert!((var - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn fit_rejects_empty() {
        assert!(StandardScaler::fit(&[]).is_err());
    }
}
