//! # constellation-explorer
//!
//! Explore a catalog of named stars and predict the constellation of a sky
//! position.
//!
//! The crate covers three stages:
//!
//! - **Cleaning**: parse a raw star export whose coordinates are written as
//!   `"14h 15m 39.7s"` / `"+19° 10′ 56″"` and whose magnitudes may use the
//!   Unicode minus sign, and keep only rows where every field parses
//! - **Exploration**: filter the clean table by five numeric ranges and
//!   derive summaries, per-constellation counts and constellation profiles
//! - **Classification**: a z-score scaler plus a k-nearest-neighbor
//!   classifier over `(right_ascension, declination)`, trained offline and
//!   serialized with [rkyv](https://docs.rs/rkyv) for fast loading
//!
//! ## Example
//!
//! ```no_run
//! use constellation_explorer::{ModelArtifacts, PredictConfig, StarTable, TrainConfig};
//!
//! // Clean a raw export and store the result
//! let (table, report) = StarTable::clean_raw_file("data/stars.csv").unwrap();
//! println!("kept {} of {} rows", report.num_kept(), report.num_rows());
//! table.save_to_file("data/cleaned_data.csv").unwrap();
//!
//! // Train and persist the model pair
//! let model = ModelArtifacts::train(table.stars(), &TrainConfig::default()).unwrap();
//! model.save_to_dir("models").unwrap();
//!
//! // Predict (right ascension in hours, declination in degrees)
//! let model = ModelArtifacts::load_from_dir("models").unwrap();
//! let prediction = model.predict(5.92, 7.4, &PredictConfig::default());
//! println!("{}", prediction.constellation);
//! ```

/// Raw star exports
pub mod catalogs;
pub mod classifier;
pub mod controller;
pub mod explorer;
pub mod normalize;
pub mod query;
pub mod render;
pub mod star;
pub mod startable;

pub use classifier::{
    ClassProbability, ModelArtifacts, ModelProperties, PredictConfig, Prediction,
    PredictionReport, Submission, TrainConfig,
};
pub use controller::{Controller, Event, InputState, View};
pub use explorer::{Explorer, ExplorerPaths, Selection};
pub use normalize::{NormalizeReport, RecordOutcome};
pub use query::{FilterSummary, Range, RangeFilter};
pub use star::*;
pub use startable::*;
