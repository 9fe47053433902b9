//! Online prediction against a loaded model.

use std::fmt;

use super::{ModelArtifacts, PredictConfig};

/// Vote share of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassProbability {
    pub constellation: String,
    pub probability: f64,
}

/// Predicted constellation and the classes above the probability threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub constellation: String,
    /// Classes with a vote share above the threshold, in class order.
    pub probabilities: Vec<ClassProbability>,
}

impl ModelArtifacts {
    /// Full per-class vote distribution for a coordinate pair, in class order.
    pub fn predict_proba(&self, right_ascension: f64, declination: f64) -> Vec<f64> {
        let scaled = self.scaler.transform([right_ascension, declination]);
        self.classifier.predict_proba(scaled)
    }

    /// Predict the constellation for a coordinate pair.
    ///
    /// Right ascension is in hours, declination in degrees; both are
    /// clamped into the configured bounds first.
    pub fn predict(
        &self,
        right_ascension: f64,
        declination: f64,
        config: &PredictConfig,
    ) -> Prediction {
        let ra = config.ra_bounds.clamp(right_ascension);
        let dec = config.dec_bounds.clamp(declination);
        let proba = self.predict_proba(ra, dec);
        let classes = self.classifier.classes();

        let top = super::knn::argmax(&proba).unwrap_or(0);
        let probabilities = classes
            .iter()
            .zip(&proba)
            .filter(|&(_, &p)| p > config.min_probability)
            .map(|(c, &p)| ClassProbability {
                constellation: c.clone(),
                probability: p,
            })
            .collect();

        Prediction {
            constellation: classes.get(top).cloned().unwrap_or_default(),
            probabilities,
        }
    }

    /// Predict for a user submission.
    ///
    /// Returns `None` when the star name is empty or either coordinate is
    /// missing; no prediction is made on incomplete input.
    pub fn predict_submission(
        &self,
        submission: &Submission,
        config: &PredictConfig,
    ) -> Option<PredictionReport> {
        let star_name = submission.star_name.as_deref().map(str::trim)?;
        if star_name.is_empty() {
            return None;
        }
        let ra = config.ra_bounds.clamp(submission.right_ascension?);
        let dec = config.dec_bounds.clamp(submission.declination?);

        Some(PredictionReport {
            star_name: star_name.to_string(),
            right_ascension: ra,
            declination: dec,
            prediction: self.predict(ra, dec, config),
            num_records: self.props.num_records,
            test_accuracy: self.props.test_accuracy,
        })
    }
}

/// Inputs of the prediction form. Any field may be unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Submission {
    pub star_name: Option<String>,
    pub right_ascension: Option<f64>,
    pub declination: Option<f64>,
}

/// A prediction together with the inputs it was made for.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub star_name: String,
    pub right_ascension: f64,
    pub declination: f64,
    pub prediction: Prediction,
    pub num_records: u32,
    pub test_accuracy: Option<f64>,
}

impl fmt::Display for PredictionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Your star's name is: {}", self.star_name)?;
        writeln!(f, "Right ascension: {}", self.right_ascension)?;
        writeln!(f, "Declination: {}", self.declination)?;
        writeln!(f, "Predicted Constellation: {}", self.prediction.constellation)?;
        writeln!(f, "Probabilities of Predictions Constellation Breakdown:")?;
        for p in &self.prediction.probabilities {
            writeln!(f, "  - {}: {:.2}%", p.constellation, p.probability * 100.0)?;
        }
        write!(
            f,
            "Note: This model was trained using the K-Nearest Neighbors (KNN) algorithm \
             on a dataset consisting of {} records.",
            self.num_records
        )?;
        if let Some(acc) = self.test_accuracy {
            write!(f, " It achieved an accuracy of {:.0}% on the test set.", acc * 100.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::classifier::{KNearestNeighbors, ModelProperties, StandardScaler};
    use super::*;

    fn model() -> ModelArtifacts {
        // Identity scaler so the raw coordinates are the feature space.
        let scaler = StandardScaler {
            mean: [0.0, 0.0],
            scale: [1.0, 1.0],
        };
        let points = vec![
            [1.0, 1.0],
            [1.2, 1.0],
            [1.0, 1.2],
            [1.1, 1.1],
            [10.0, 40.0],
        ];
        let labels = ["Pisces", "Pisces", "Cetus", "Pisces", "Lyra"];
        let classifier = KNearestNeighbors::fit(4, points, &labels).unwrap();
        ModelArtifacts {
            scaler,
            classifier,
            props: ModelProperties {
                k: 4,
                seed: 42,
                test_fraction: 0.2,
                num_records: 6,
                train_size: 5,
                test_size: 1,
                test_accuracy: Some(1.0),
                num_classes: 3,
            },
        }
    }

    #[test]
    fn prediction_filters_and_keeps_class_order() {
        let m = model();
        let p = m.predict(1.05, 1.05, &PredictConfig::default());
        assert_eq!(p.constellation, "Pisces");
        let names: Vec<&str> = p
            .probabilities
            .iter()
            .map(|c| c.constellation.as_str())
            .collect();
        // classes sorted: Cetus, Lyra, Pisces; Lyra has no votes
        assert_eq!(names, vec!["Cetus", "Pisces"]);
        assert!((p.probabilities[0].probability - 0.25).abs() < 1e-12);
        assert!((p.probabilities[1].probability - 0.75).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_strict() {
        let m = model();
        let config = PredictConfig {
            min_probability: 0.25,
            ..Default::default()
        };
        let p = m.predict(1.05, 1.05, &config);
        assert_eq!(p.probabilities.len(), 1);
        assert_eq!(p.probabilities[0].constellation, "Pisces");
    }

    #[test]
    fn coordinates_are_clamped() {
        let m = model();
        let report = m
            .predict_submission(
                &Submission {
                    star_name: Some("Test".into()),
                    right_ascension: Some(30.0),
                    declination: Some(-120.0),
                },
                &PredictConfig::default(),
            )
            .unwrap();
        assert_eq!(report.right_ascension, 24.0);
        assert_eq!(report.declination, -90.0);
    }

    #[test]
    fn incomplete_submission_gives_nothing() {
        let m = model();
        let config = PredictConfig::default();
        let full = Submission {
            star_name: Some("Alrescha".into()),
            right_ascension: Some(1.05),
            declination: Some(1.05),
        };
        assert!(m.predict_submission(&full, &config).is_some());

        let no_name = Submission {
            star_name: None,
            ..full.clone()
        };
        let blank_name = Submission {
            star_name: Some("   ".into()),
            ..full.clone()
        };
        let empty_name = Submission {
            star_name: Some(String::new()),
            ..full.clone()
        };
        let no_ra = Submission {
            right_ascension: None,
            ..full.clone()
        };
        let no_dec = Submission {
            declination: None,
            ..full.clone()
        };
        for s in [no_name, blank_name, empty_name, no_ra, no_dec] {
            assert!(m.predict_submission(&s, &config).is_none());
        }
    }

    #[test]
    fn report_rendering() {
        let m = model();
        let report = m
            .predict_submission(
                &Submission {
                    star_name: Some("Alrescha".into()),
                    right_ascension: Some(1.05),
                    declination: Some(1.05),
                },
                &PredictConfig::default(),
            )
            .unwrap();
        let text = report.to_string();
        assert!(text.contains("Your star's name is: Alrescha"));
        assert!(text.contains("Predicted Constellation: Pisces"));
        assert!(text.contains("  - Cetus: 25.00%"));
        assert!(text.contains("  - Pisces: 75.00%"));
        assert!(text.contains("consisting of 6 records"));
        assert!(text.contains("accuracy of 100%"));
    }
}
