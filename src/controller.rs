//! Event-driven controller for the explorer.
//!
//! The controller keeps a snapshot of the user inputs and, for every event,
//! returns the views that depend on the input that changed:
//!
//! | event                 | recomputed views            |
//! |-----------------------|-----------------------------|
//! | `SetRange`            | selection (summary, table)  |
//! | `SelectConstellation` | constellation profile       |
//! | `Submit`              | prediction                  |
//!
//! Editing the star name or the prediction coordinates only updates the
//! snapshot; the prediction runs on explicit submission.

use std::str::FromStr;

use tracing::debug;

use crate::classifier::{PredictionReport, Submission};
use crate::explorer::{Explorer, Selection};
use crate::query::{ConstellationProfile, Range, RangeFilter};
use crate::star::NumericField;

/// Snapshot of every user input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    pub filter: RangeFilter,
    pub constellation: Option<String>,
    pub submission: Submission,
}

/// A single user interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SetRange(NumericField, Range),
    SelectConstellation(Option<String>),
    SetStarName(String),
    SetCoordinates { right_ascension: f64, declination: f64 },
    Submit,
}

impl FromStr for Event {
    type Err = anyhow::Error;

    /// Parse one line of the interactive protocol:
    ///
    /// ```text
    /// ra 6 16            (also dec, appmag, absmag, dist)
    /// select Ursa Major  (bare "select" clears the selection)
    /// name Vega
    /// coords 18.6 38.8
    /// submit
    /// ```
    fn from_str(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        if let Some(field) = NumericField::from_key(cmd) {
            let [lo, hi] = two_numbers(rest)?;
            if lo > hi {
                anyhow::bail!("range {} {} is reversed", lo, hi);
            }
            return Ok(Event::SetRange(field, Range::new(lo, hi)));
        }

        match cmd {
            "select" => Ok(Event::SelectConstellation(
                Some(rest.to_string()).filter(|s| !s.is_empty()),
            )),
            "name" => Ok(Event::SetStarName(rest.to_string())),
            "coords" => {
                let [right_ascension, declination] = two_numbers(rest)?;
                Ok(Event::SetCoordinates {
                    right_ascension,
                    declination,
                })
            }
            "submit" => Ok(Event::Submit),
            "" => anyhow::bail!("empty event"),
            other => anyhow::bail!("unknown event {:?}", other),
        }
    }
}

fn two_numbers(text: &str) -> anyhow::Result<[f64; 2]> {
    let values = text
        .split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|e| anyhow::anyhow!("bad number {:?}: {}", t, e))
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;
    match values.as_slice() {
        [a, b] => Ok([*a, *b]),
        _ => anyhow::bail!("expected two numbers, got {:?}", text),
    }
}

/// A derived output ready to be rendered.
#[derive(Debug, Clone)]
pub enum View<'a> {
    Selection(Selection<'a>),
    Profile(ConstellationProfile),
    /// The selected constellation has no stars in the table.
    NoStarData(String),
    Prediction(PredictionReport),
}

pub struct Controller<'a> {
    explorer: &'a Explorer,
    state: InputState,
}

impl<'a> Controller<'a> {
    /// Start with the explorer's default range selection.
    pub fn new(explorer: &'a Explorer) -> Self {
        let state = InputState {
            filter: explorer.default_filter(),
            ..Default::default()
        };
        Self { explorer, state }
    }

    pub fn with_state(explorer: &'a Explorer, state: InputState) -> Self {
        Self { explorer, state }
    }

    pub fn state(&self) -> &InputState {
        &self.state
    }

    /// Views for the current range selection; used for the first render.
    pub fn initial_views(&self) -> Vec<View<'a>> {
        vec![View::Selection(self.explorer.select(&self.state.filter))]
    }

    /// Apply an event and return the views that depend on it.
    pub fn handle(&mut self, event: Event) -> Vec<View<'a>> {
        match event {
            Event::SetRange(field, range) => {
                self.state.filter.set_range(field, range);
                vec![View::Selection(self.explorer.select(&self.state.filter))]
            }
            Event::SelectConstellation(name) => {
                self.state.constellation = name;
                match &self.state.constellation {
                    Some(name) => match self.explorer.profile(name) {
                        Some(profile) => vec![View::Profile(profile)],
                        None => vec![View::NoStarData(name.clone())],
                    },
                    None => Vec::new(),
                }
            }
            Event::SetStarName(name) => {
                self.state.submission.star_name = Some(name).filter(|n| !n.is_empty());
                Vec::new()
            }
            Event::SetCoordinates {
                right_ascension,
                declination,
            } => {
                self.state.submission.right_ascension = Some(right_ascension);
                self.state.submission.declination = Some(declination);
                Vec::new()
            }
            Event::Submit => match self.explorer.predict(&self.state.submission) {
                Some(report) => vec![View::Prediction(report)],
                None => {
                    debug!("Submission incomplete; nothing to predict");
                    Vec::new()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_events() {
        assert_eq!(
            "ra 6 16".parse::<Event>().unwrap(),
            Event::SetRange(NumericField::RightAscension, Range::new(6.0, 16.0))
        );
        assert_eq!(
            "  appmag -1.46   2.0 ".parse::<Event>().unwrap(),
            Event::SetRange(NumericField::ApparentMagnitude, Range::new(-1.46, 2.0))
        );
        assert!("dist 10".parse::<Event>().is_err());
        assert!("dec 10 -10".parse::<Event>().is_err());
        assert!("dec a b".parse::<Event>().is_err());
    }

    #[test]
    fn parse_other_events() {
        assert_eq!(
            "select Ursa Major".parse::<Event>().unwrap(),
            Event::SelectConstellation(Some("Ursa Major".into()))
        );
        assert_eq!(
            "select".parse::<Event>().unwrap(),
            Event::SelectConstellation(None)
        );
        assert_eq!(
            "name Alpha Lyrae".parse::<Event>().unwrap(),
            Event::SetStarName("Alpha Lyrae".into())
        );
        assert_eq!(
            "coords 12 0".parse::<Event>().unwrap(),
            Event::SetCoordinates {
                right_ascension: 12.0,
                declination: 0.0
            }
        );
        assert_eq!("submit".parse::<Event>().unwrap(), Event::Submit);
        assert!("".parse::<Event>().is_err());
        assert!("plot".parse::<Event>().is_err());
    }
}
