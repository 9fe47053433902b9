//! Plain-text rendering of explorer views.

use std::fmt::Write;

use crate::controller::View;
use crate::explorer::Selection;
use crate::query::{ConstellationCount, ConstellationProfile, SliderSpec};
use crate::StarRecord;

/// Options for text rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum number of table rows printed. Default 20.
    pub max_rows: usize,
    /// Maximum number of bars in the constellation chart. Default 15.
    pub max_bars: usize,
    /// Width in characters of the longest bar. Default 40.
    pub bar_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_rows: 20,
            max_bars: 15,
            bar_width: 40,
        }
    }
}

pub fn render_view(view: &View<'_>, config: &RenderConfig) -> String {
    match view {
        View::Selection(selection) => render_selection(selection, config),
        View::Profile(profile) => render_profile(profile),
        View::NoStarData(name) => format!("No star data available for {}\n", name),
        View::Prediction(report) => format!("{}\n", report),
    }
}

pub fn render_sliders(sliders: &[SliderSpec]) -> String {
    let mut out = String::new();
    for s in sliders {
        let _ = writeln!(
            out,
            "{:<24} [{} .. {}]  selected {} .. {}",
            s.field.label(),
            s.min,
            s.max,
            s.value.lo,
            s.value.hi
        );
    }
    out
}

pub fn render_selection(selection: &Selection<'_>, config: &RenderConfig) -> String {
    let mut out = String::new();
    let summary = &selection.summary;
    let _ = writeln!(out, "Total number of stars:          {}", summary.total);
    let _ = writeln!(
        out,
        "Most significant constellation: {}",
        summary.most_significant_text()
    );
    let _ = writeln!(
        out,
        "Average distance:               {}",
        summary.average_distance_text()
    );

    if !selection.counts.is_empty() {
        out.push('\n');
        out.push_str(&render_counts(&selection.counts, config));
    }
    if !selection.rows.is_empty() {
        out.push('\n');
        out.push_str(&render_rows(&selection.rows, config.max_rows));
    }
    out
}

/// Horizontal bar chart of stars per constellation.
pub fn render_counts(counts: &[ConstellationCount], config: &RenderConfig) -> String {
    let mut out = String::new();
    let max = counts.iter().map(|c| c.count).max().unwrap_or(0);
    if max == 0 {
        return out;
    }
    let label_width = counts
        .iter()
        .take(config.max_bars)
        .map(|c| c.constellation.chars().count())
        .max()
        .unwrap_or(0);

    for c in counts.iter().take(config.max_bars) {
        // at least one mark for any non-empty group
        let len = ((c.count * config.bar_width) / max).max(1);
        let _ = writeln!(
            out,
            "{:<width$} | {} {}",
            c.constellation,
            "#".repeat(len),
            c.count,
            width = label_width
        );
    }
    if counts.len() > config.max_bars {
        let _ = writeln!(
            out,
            "... and {} more constellations",
            counts.len() - config.max_bars
        );
    }
    out
}

/// Table of star rows, at most `max_rows` of them.
pub fn render_rows(rows: &[&StarRecord], max_rows: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:<20} {:>8} {:>8} {:>7} {:>7} {:>10} {:<8}",
        "Name", "Constellation", "RA", "Dec", "AppMag", "AbsMag", "Dist (ly)", "Class"
    );
    for s in rows.iter().take(max_rows) {
        let _ = writeln!(
            out,
            "{:<24} {:<20} {:>8.3} {:>8.3} {:>7.2} {:>7.2} {:>10.2} {:<8}",
            s.name,
            s.constellation,
            s.right_ascension,
            s.declination,
            s.apparent_magnitude,
            s.absolute_magnitude,
            s.distance_light_year,
            s.spectral_class
        );
    }
    if rows.len() > max_rows {
        let _ = writeln!(out, "... {} more rows", rows.len() - max_rows);
    }
    out
}

pub fn render_profile(profile: &ConstellationProfile) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} stars)",
        profile.constellation,
        profile.num_stars()
    );
    let _ = writeln!(
        out,
        "{:<24} {:>10} {:>10} {:>10}",
        "Field", "Min", "Mean", "Max"
    );
    for d in &profile.distributions {
        let min = d.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = d.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let _ = writeln!(
            out,
            "{:<24} {:>10.2} {:>10.2} {:>10.2}",
            d.field.label(),
            min,
            d.mean,
            max
        );
    }
    let _ = writeln!(out, "Stars: {}", profile.star_names.join(", "));
    out
}
