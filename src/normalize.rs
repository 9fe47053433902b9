//! Coordinate normalization and record cleaning.
//!
//! Raw rows carry right ascension as `"<H>h <M>m <S>s"` and declination as
//! `"<sign><D>° <M>′ <S>″"` (or as a plain decimal). This module converts both
//! to decimal hours / degrees and drops every row that is left without one of
//! the required fields. Parse failures never abort a batch: a failed field is
//! treated as absent and the row is reported as dropped.
//!
//! Declination sign detection looks for a `-` anywhere in the text once the
//! unit symbols are gone. A stray hyphen in a malformed entry therefore flips
//! the sign; that behavior is kept as-is.

use tracing::{debug, info};

use crate::catalogs::RawStarRow;
use crate::star::{is_canonical_constellation, RequiredField, StarRecord};

const UNICODE_MINUS: char = '\u{2212}';

/// A declination value as found in the raw data.
#[derive(Debug, Clone, PartialEq)]
pub enum RawDeclination {
    /// Already a decimal number of degrees.
    Numeric(f64),
    /// Sexagesimal text, e.g. `"−05° 54′ 36″"`.
    Text(String),
}

impl RawDeclination {
    /// Classify a raw CSV field. Blank fields are missing; fields that are a
    /// plain decimal number are numeric; anything else is text.
    pub fn from_field(field: Option<&str>) -> Option<Self> {
        let field = field?.trim();
        if field.is_empty() {
            return None;
        }
        match field.parse::<f64>() {
            Ok(v) => Some(RawDeclination::Numeric(v)),
            Err(_) => Some(RawDeclination::Text(field.to_string())),
        }
    }
}

/// Parse `"<H>h <M>m <S>s"` into decimal hours.
///
/// The letters `h`, `m` and `s` are removed and the remainder must split
/// into exactly three numbers. Returns `None` otherwise.
pub fn parse_right_ascension(ra: &str) -> Option<f64> {
    let cleaned: String = ra.chars().filter(|c| !matches!(c, 'h' | 'm' | 's')).collect();
    let [hours, minutes, seconds] = three_numbers(&cleaned)?;
    Some(hours + minutes / 60.0 + seconds / 3600.0)
}

/// Convert a raw declination to decimal degrees.
///
/// Numeric input passes through. Text input has its unicode minus sign
/// normalized, the `°`, `′`, `″` and `+` symbols replaced by spaces, and the
/// sign taken from the presence of any `-`. The remaining text must split
/// into exactly three numbers.
pub fn parse_declination(dec: &RawDeclination) -> Option<f64> {
    match dec {
        RawDeclination::Numeric(v) => Some(*v).filter(|v| v.is_finite()),
        RawDeclination::Text(text) => {
            let text = text.trim().replace(UNICODE_MINUS, "-");
            let text = text.replace(['°', '′', '″', '+'], " ");
            let text = text.trim();
            let sign = if text.contains('-') { -1.0 } else { 1.0 };
            let text = text.replace('-', " ");
            let [degrees, minutes, seconds] = three_numbers(&text)?;
            Some(sign * (degrees + minutes / 60.0 + seconds / 3600.0))
        }
    }
}

/// Parse a free-standing measurement (magnitude, distance).
///
/// Unicode minus signs are accepted; anything non-numeric is `None`.
pub fn parse_measurement(value: &str) -> Option<f64> {
    parse_number(&value.trim().replace(UNICODE_MINUS, "-"))
}

fn parse_number(token: &str) -> Option<f64> {
    token.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn three_numbers(text: &str) -> Option<[f64; 3]> {
    let units: Vec<&str> = text.split_whitespace().collect();
    if units.len() != 3 {
        return None;
    }
    Some([
        parse_number(units[0])?,
        parse_number(units[1])?,
        parse_number(units[2])?,
    ])
}

// ── Record cleaning ─────────────────────────────────────────────────────────

/// Why a required field could not be filled.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    /// The column was blank.
    Missing(RequiredField),
    /// The column had text that did not parse.
    Unparseable(RequiredField, String),
}

impl FieldIssue {
    pub fn field(&self) -> RequiredField {
        match self {
            FieldIssue::Missing(f) | FieldIssue::Unparseable(f, _) => *f,
        }
    }
}

/// Outcome of cleaning one raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Kept(StarRecord),
    Dropped {
        name: Option<String>,
        issues: Vec<FieldIssue>,
    },
}

/// Per-record outcomes of a cleaning pass, in input order.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub outcomes: Vec<RecordOutcome>,
}

impl NormalizeReport {
    pub fn num_rows(&self) -> usize {
        self.outcomes.len()
    }

    pub fn num_kept(&self) -> usize {
        self.records().count()
    }

    pub fn num_dropped(&self) -> usize {
        self.num_rows() - self.num_kept()
    }

    /// Kept records in input order.
    pub fn records(&self) -> impl Iterator<Item = &StarRecord> {
        self.outcomes.iter().filter_map(|o| match o {
            RecordOutcome::Kept(r) => Some(r),
            RecordOutcome::Dropped { .. } => None,
        })
    }

    pub fn into_records(self) -> Vec<StarRecord> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                RecordOutcome::Kept(r) => Some(r),
                RecordOutcome::Dropped { .. } => None,
            })
            .collect()
    }

    /// Number of dropped rows affected by each required field.
    pub fn issue_counts(&self) -> Vec<(RequiredField, usize)> {
        RequiredField::ALL
            .iter()
            .map(|&field| {
                let n = self
                    .outcomes
                    .iter()
                    .filter(|o| match o {
                        RecordOutcome::Dropped { issues, .. } => {
                            issues.iter().any(|i| i.field() == field)
                        }
                        RecordOutcome::Kept(_) => false,
                    })
                    .count();
                (field, n)
            })
            .collect()
    }
}

fn text_field(
    value: &Option<String>,
    field: RequiredField,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => {
            issues.push(FieldIssue::Missing(field));
            None
        }
    }
}

fn numeric_field<F>(
    value: &Option<String>,
    field: RequiredField,
    parse: F,
    issues: &mut Vec<FieldIssue>,
) -> Option<f64>
where
    F: Fn(&str) -> Option<f64>,
{
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => {
            let parsed = parse(v);
            if parsed.is_none() {
                debug!("Could not parse {} value {:?}", field.column(), v);
                issues.push(FieldIssue::Unparseable(field, v.to_string()));
            }
            parsed
        }
        _ => {
            issues.push(FieldIssue::Missing(field));
            None
        }
    }
}

/// Clean a single raw row.
pub fn normalize_row(row: &RawStarRow) -> RecordOutcome {
    let mut issues = Vec::new();

    let name = text_field(&row.name, RequiredField::Name, &mut issues);
    let constellation = text_field(&row.constellation, RequiredField::Constellation, &mut issues);
    let right_ascension = numeric_field(
        &row.right_ascension,
        RequiredField::RightAscension,
        parse_right_ascension,
        &mut issues,
    );
    let declination = numeric_field(
        &row.declination,
        RequiredField::Declination,
        |v| RawDeclination::from_field(Some(v)).and_then(|d| parse_declination(&d)),
        &mut issues,
    );
    let apparent_magnitude = numeric_field(
        &row.apparent_magnitude,
        RequiredField::ApparentMagnitude,
        parse_measurement,
        &mut issues,
    );
    let absolute_magnitude = numeric_field(
        &row.absolute_magnitude,
        RequiredField::AbsoluteMagnitude,
        parse_measurement,
        &mut issues,
    );
    let distance_light_year = numeric_field(
        &row.distance_light_year,
        RequiredField::DistanceLightYear,
        parse_measurement,
        &mut issues,
    );
    let spectral_class = text_field(&row.spectral_class, RequiredField::SpectralClass, &mut issues);

    match (
        name,
        constellation,
        right_ascension,
        declination,
        apparent_magnitude,
        absolute_magnitude,
        distance_light_year,
        spectral_class,
    ) {
        (
            Some(name),
            Some(constellation),
            Some(right_ascension),
            Some(declination),
            Some(apparent_magnitude),
            Some(absolute_magnitude),
            Some(distance_light_year),
            Some(spectral_class),
        ) => RecordOutcome::Kept(StarRecord {
            name,
            constellation,
            right_ascension,
            declination,
            apparent_magnitude,
            absolute_magnitude,
            distance_light_year,
            spectral_class,
        }),
        (name, ..) => RecordOutcome::Dropped { name, issues },
    }
}

/// Clean a batch of raw rows, reporting the outcome of each.
pub fn normalize_rows(rows: &[RawStarRow]) -> NormalizeReport {
    let outcomes: Vec<RecordOutcome> = rows.iter().map(normalize_row).collect();
    let report = NormalizeReport { outcomes };

    for (field, n) in report.issue_counts() {
        if n > 0 {
            info!("{:>20}: {} rows dropped", field.column(), n);
        }
    }
    for record in report.records() {
        if !is_canonical_constellation(&record.constellation) {
            debug!(
                "Star {:?} has non-canonical constellation {:?}",
                record.name, record.constellation
            );
        }
    }
    info!(
        "Kept {} of {} raw rows ({} dropped)",
        report.num_kept(),
        report.num_rows(),
        report.num_dropped()
    );
    report
}
