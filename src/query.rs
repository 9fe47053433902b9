//! Range filtering and aggregate queries over the clean star table.
//!
//! All functions here are pure: they borrow the table, never mutate it, and
//! return freshly allocated results. The five filter ranges are inclusive at
//! both ends and combine with AND semantics.

use crate::star::NumericField;
use crate::StarRecord;

/// Inclusive numeric range `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lo: f64,
    pub hi: f64,
}

impl Range {
    pub const UNBOUNDED: Range = Range {
        lo: f64::NEG_INFINITY,
        hi: f64::INFINITY,
    };

    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// Clamp a value into the range.
    pub fn clamp(&self, v: f64) -> f64 {
        v.max(self.lo).min(self.hi)
    }
}

impl Default for Range {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// The five range selections of the explorer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RangeFilter {
    pub right_ascension: Range,
    pub declination: Range,
    pub apparent_magnitude: Range,
    pub absolute_magnitude: Range,
    pub distance_light_year: Range,
}

impl RangeFilter {
    pub fn range(&self, field: NumericField) -> Range {
        match field {
            NumericField::RightAscension => self.right_ascension,
            NumericField::Declination => self.declination,
            NumericField::ApparentMagnitude => self.apparent_magnitude,
            NumericField::AbsoluteMagnitude => self.absolute_magnitude,
            NumericField::DistanceLightYear => self.distance_light_year,
        }
    }

    pub fn set_range(&mut self, field: NumericField, range: Range) {
        match field {
            NumericField::RightAscension => self.right_ascension = range,
            NumericField::Declination => self.declination = range,
            NumericField::ApparentMagnitude => self.apparent_magnitude = range,
            NumericField::AbsoluteMagnitude => self.absolute_magnitude = range,
            NumericField::DistanceLightYear => self.distance_light_year = range,
        }
    }

    /// Builder-style variant of [`RangeFilter::set_range`].
    pub fn with_range(mut self, field: NumericField, range: Range) -> Self {
        self.set_range(field, range);
        self
    }

    /// `true` when the star satisfies all five ranges.
    pub fn matches(&self, star: &StarRecord) -> bool {
        NumericField::ALL
            .iter()
            .all(|&f| self.range(f).contains(star.value(f)))
    }

    /// Stars matching all five ranges, in table order.
    pub fn apply<'a>(&self, stars: &'a [StarRecord]) -> Vec<&'a StarRecord> {
        stars.iter().filter(|s| self.matches(s)).collect()
    }

    /// Default slider selection for a table: the interquartile range of each
    /// field. Returns `None` for an empty table.
    pub fn defaults_for(stars: &[StarRecord]) -> Option<Self> {
        let mut filter = RangeFilter::default();
        for field in NumericField::ALL {
            filter.set_range(field, SliderSpec::for_field(stars, field)?.value);
        }
        Some(filter)
    }
}

/// Bounds and initial selection of one range slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderSpec {
    pub field: NumericField,
    pub min: f64,
    pub max: f64,
    /// Initial selection: 25th to 75th percentile.
    pub value: Range,
}

impl SliderSpec {
    /// Slider for one field, all values rounded to two decimals.
    pub fn for_field(stars: &[StarRecord], field: NumericField) -> Option<Self> {
        let mut values: Vec<f64> = stars.iter().map(|s| s.value(field)).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let min = *values.first()?;
        let max = *values.last()?;
        Some(Self {
            field,
            min: round2(min),
            max: round2(max),
            value: Range::new(
                round2(quantile_sorted(&values, 0.25)?),
                round2(quantile_sorted(&values, 0.75)?),
            ),
        })
    }

    /// Sliders for all five fields.
    pub fn all_for(stars: &[StarRecord]) -> Option<Vec<Self>> {
        NumericField::ALL
            .iter()
            .map(|&f| Self::for_field(stars, f))
            .collect()
    }
}

/// Round to two decimal places, ties to even (`0.125` -> `0.12`).
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Decimal text of a float that always shows a fractional part, so a whole
/// mean prints as `100.0` rather than `100`.
pub fn float_text(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

/// Quantile of already-sorted values with linear interpolation between the
/// two nearest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Arithmetic mean; `None` for no values.
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

// ── Group counts ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstellationCount {
    pub constellation: String,
    pub count: usize,
}

/// Number of stars per constellation, largest first.
///
/// Constellations with equal counts keep the order in which they were first
/// encountered.
pub fn constellation_counts<'a, I>(stars: I) -> Vec<ConstellationCount>
where
    I: IntoIterator<Item = &'a StarRecord>,
{
    let mut counts: Vec<ConstellationCount> = Vec::new();
    for star in stars {
        match counts
            .iter_mut()
            .find(|c| c.constellation == star.constellation)
        {
            Some(c) => c.count += 1,
            None => counts.push(ConstellationCount {
                constellation: star.constellation.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Rows ordered by the size of their constellation within the selection,
/// largest constellation first. Rows of equal-size groups keep table order.
pub fn sorted_by_constellation_size<'a>(rows: &[&'a StarRecord]) -> Vec<&'a StarRecord> {
    let counts = constellation_counts(rows.iter().copied());
    let count_of = |name: &str| {
        counts
            .iter()
            .find(|c| c.constellation == name)
            .map_or(0, |c| c.count)
    };
    let mut out = rows.to_vec();
    out.sort_by(|a, b| {
        count_of(b.constellation.as_str()).cmp(&count_of(a.constellation.as_str()))
    });
    out
}

// ── Selection summary ───────────────────────────────────────────────────────

/// The headline numbers for a range selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSummary {
    pub total: usize,
    /// Constellation with the most stars and its count; `None` if the
    /// selection is empty.
    pub most_significant: Option<ConstellationCount>,
    /// Mean distance in light years rounded to two decimals; `None` if the
    /// selection is empty.
    pub average_distance: Option<f64>,
}

impl FilterSummary {
    pub fn from_selection(rows: &[&StarRecord]) -> Self {
        let counts = constellation_counts(rows.iter().copied());
        Self {
            total: rows.len(),
            most_significant: counts.into_iter().next(),
            average_distance: mean(rows.iter().map(|s| s.distance_light_year)).map(round2),
        }
    }

    pub fn most_significant_text(&self) -> String {
        match &self.most_significant {
            Some(c) => format!("{} ({})", c.constellation, c.count),
            None => "N/A".to_string(),
        }
    }

    pub fn average_distance_text(&self) -> String {
        match self.average_distance {
            Some(d) => format!("{} light years", float_text(d)),
            None => "0 light years".to_string(),
        }
    }
}

/// Apply a filter and summarize the result in one call.
pub fn summarize(stars: &[StarRecord], filter: &RangeFilter) -> FilterSummary {
    FilterSummary::from_selection(&filter.apply(stars))
}

// ── Constellation profile ───────────────────────────────────────────────────

/// Values of one field across a constellation, with their mean.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDistribution {
    pub field: NumericField,
    pub values: Vec<f64>,
    pub mean: f64,
}

/// Per-field distributions and star names for one constellation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstellationProfile {
    pub constellation: String,
    pub distributions: Vec<FieldDistribution>,
    /// Unique star names in first-seen order.
    pub star_names: Vec<String>,
}

impl ConstellationProfile {
    /// Profile `constellation`; `None` when it has no stars in the table.
    pub fn build(stars: &[StarRecord], constellation: &str) -> Option<Self> {
        let members: Vec<&StarRecord> = stars
            .iter()
            .filter(|s| s.constellation == constellation)
            .collect();
        if members.is_empty() {
            return None;
        }

        let distributions = NumericField::ALL
            .iter()
            .map(|&field| {
                let values: Vec<f64> = members.iter().map(|s| s.value(field)).collect();
                let mean = mean(values.iter().copied()).unwrap_or(0.0);
                FieldDistribution {
                    field,
                    values,
                    mean,
                }
            })
            .collect();

        let mut star_names: Vec<String> = Vec::new();
        for s in &members {
            if !star_names.contains(&s.name) {
                star_names.push(s.name.clone());
            }
        }

        Some(Self {
            constellation: constellation.to_string(),
            distributions,
            star_names,
        })
    }

    pub fn distribution(&self, field: NumericField) -> Option<&FieldDistribution> {
        self.distributions.iter().find(|d| d.field == field)
    }

    pub fn num_stars(&self) -> usize {
        self.distributions.first().map_or(0, |d| d.values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star(name: &str, constellation: &str, ra: f64, dec: f64, appmag: f64) -> StarRecord {
        StarRecord {
            name: name.to_string(),
            constellation: constellation.to_string(),
            right_ascension: ra,
            declination: dec,
            apparent_magnitude: appmag,
            absolute_magnitude: -1.0,
            distance_light_year: 100.0,
            spectral_class: "G2V".to_string(),
        }
    }

    #[test]
    fn single_row_in_range() {
        let stars = vec![star("Arcturus", "Boötes", 14.245, 30.0, 1.0)];
        let filter = RangeFilter::default()
            .with_range(NumericField::RightAscension, Range::new(6.0, 16.0))
            .with_range(NumericField::Declination, Range::new(-90.0, 90.0))
            .with_range(NumericField::ApparentMagnitude, Range::new(-1.46, 2.0));
        assert_eq!(filter.apply(&stars).len(), 1);
    }

    #[test]
    fn bounds_are_inclusive_and_combined() {
        let stars = vec![
            star("a", "Orion", 6.0, 0.0, 1.0),
            star("b", "Orion", 16.0, 0.0, 1.0),
            star("c", "Orion", 16.01, 0.0, 1.0),
            star("d", "Orion", 10.0, 0.0, 2.5),
        ];
        let filter = RangeFilter::default()
            .with_range(NumericField::RightAscension, Range::new(6.0, 16.0))
            .with_range(NumericField::ApparentMagnitude, Range::new(-1.46, 2.0));
        let names: Vec<&str> = filter.apply(&stars).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn counts_sorted_with_first_seen_ties() {
        let stars = vec![
            star("a", "Lyra", 1.0, 0.0, 1.0),
            star("b", "Orion", 1.0, 0.0, 1.0),
            star("c", "Draco", 1.0, 0.0, 1.0),
            star("d", "Orion", 1.0, 0.0, 1.0),
            star("e", "Draco", 1.0, 0.0, 1.0),
        ];
        let counts = constellation_counts(&stars);
        let pairs: Vec<(&str, usize)> = counts
            .iter()
            .map(|c| (c.constellation.as_str(), c.count))
            .collect();
        assert_eq!(pairs, vec![("Orion", 2), ("Draco", 2), ("Lyra", 1)]);

        let rows: Vec<&StarRecord> = stars.iter().collect();
        let summary = FilterSummary::from_selection(&rows);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.most_significant_text(), "Orion (2)");

        let ordered: Vec<&str> = sorted_by_constellation_size(&rows)
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(ordered, vec!["b", "c", "d", "e", "a"]);
    }

    #[test]
    fn empty_selection_summary() {
        let summary = FilterSummary::from_selection(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.most_significant, None);
        assert_eq!(summary.most_significant_text(), "N/A");
        assert_eq!(summary.average_distance_text(), "0 light years");
    }

    #[test]
    fn average_distance_rounded() {
        let mut a = star("a", "Lyra", 1.0, 0.0, 1.0);
        let mut b = star("b", "Lyra", 1.0, 0.0, 1.0);
        a.distance_light_year = 10.0;
        b.distance_light_year = 10.125;
        let summary = summarize(&[a, b], &RangeFilter::default());
        assert_eq!(summary.average_distance, Some(10.06));
        assert_eq!(summary.average_distance_text(), "10.06 light years");
    }

    #[test]
    fn whole_average_keeps_a_decimal() {
        let mut a = star("a", "Lyra", 1.0, 0.0, 1.0);
        let mut b = star("b", "Lyra", 1.0, 0.0, 1.0);
        a.distance_light_year = 90.0;
        b.distance_light_year = 110.0;
        let summary = summarize(&[a, b], &RangeFilter::default());
        assert_eq!(summary.average_distance, Some(100.0));
        assert_eq!(summary.average_distance_text(), "100.0 light years");
        assert_eq!(float_text(25.5), "25.5");
        assert_eq!(float_text(-3.0), "-3.0");
    }

    #[test]
    fn round2_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(-0.125), -0.12);
        assert_eq!(round2(10.0625), 10.06);
        assert_eq!(round2(1.006), 1.01);
    }

    #[test]
    fn quantiles_interpolate() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.25), Some(1.75));
        assert_eq!(quantile_sorted(&v, 0.75), Some(3.25));
        assert_eq!(quantile_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn slider_defaults() {
        let stars = vec![
            star("a", "Lyra", 1.0, -10.0, 0.5),
            star("b", "Lyra", 2.0, 0.0, 1.5),
            star("c", "Lyra", 3.0, 10.0, 2.5),
            star("d", "Lyra", 4.0, 20.0, 3.5),
        ];
        let ra = SliderSpec::for_field(&stars, NumericField::RightAscension).unwrap();
        assert_eq!((ra.min, ra.max), (1.0, 4.0));
        assert_eq!(ra.value, Range::new(1.75, 3.25));

        let filter = RangeFilter::defaults_for(&stars).unwrap();
        assert_eq!(filter.declination, Range::new(-2.5, 12.5));
        assert!(RangeFilter::defaults_for(&[]).is_none());
    }

    #[test]
    fn profile_of_constellation() {
        let stars = vec![
            star("Vega", "Lyra", 18.6, 38.8, 0.03),
            star("Rigel", "Orion", 5.2, -8.2, 0.13),
            star("Sheliak", "Lyra", 18.8, 33.4, 3.52),
            star("Vega", "Lyra", 18.6, 38.8, 0.03),
        ];
        let profile = ConstellationProfile::build(&stars, "Lyra").unwrap();
        assert_eq!(profile.num_stars(), 3);
        assert_eq!(profile.star_names, vec!["Vega", "Sheliak"]);
        let dec = profile.distribution(NumericField::Declination).unwrap();
        assert!((dec.mean - (38.8 + 33.4 + 38.8) / 3.0).abs() < 1e-9);
        assert!(ConstellationProfile::build(&stars, "Draco").is_none());
    }
}
