//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during aggregation
//! - exported to JSON/CSV
//! - reused by alternative front-ends later

use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

/// One half-hourly price observation, as loaded from the input CSV.
#[derive(Debug, Clone)]
pub struct PriceRecord {
    /// Settlement timestamp. Unique-enough sort key; the record set is kept
    /// in chronological order of this field.
    pub timestamp: NaiveDateTime,

    /// Regional Reference Price in $/MWh. `None` models a null cell in the
    /// input: tolerated, surfaced in the null report, excluded per-group by
    /// aggregations. Negative and extreme values are legitimate market data.
    pub rrp: Option<f64>,

    /// Reporting quarter label (e.g. "Q1-22").
    pub index_term: QuarterLabel,

    /// Calendar year as provided by the file (not re-derived from the
    /// timestamp).
    pub year: i32,

    /// Intraday period indicator flags. Independent booleans, not a
    /// partition: a record may carry zero, one, or several of them.
    pub solar_period: bool,
    pub evening_peak: bool,
    pub morning_peak: bool,
}

impl PriceRecord {
    pub fn in_period(&self, period: Period) -> bool {
        match period {
            Period::EveningPeak => self.evening_peak,
            Period::MorningPeak => self.morning_peak,
            Period::SolarPeriod => self.solar_period,
        }
    }

    /// Number of period flags set on this record (overlap diagnostic).
    pub fn active_period_count(&self) -> usize {
        Period::ALL.iter().filter(|p| self.in_period(**p)).count()
    }
}

/// A reporting-quarter category (`IndexTerm` column).
///
/// Labels like `Q1-22` are parsed so ordering is chronological (year first,
/// then quarter). A naive lexical sort would misorder across year boundaries
/// ("Q1-23" before "Q4-22"), so the comparator is explicit here.
///
/// Labels that don't match `Qn-YY` / `Qn-YYYY` are kept as opaque categories:
/// they sort after all recognized quarters (lexically among themselves) and
/// are never dropped from any aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuarterLabel {
    raw: String,
    key: Option<(i32, u8)>,
}

impl QuarterLabel {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            key: parse_quarter_key(raw),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// `(year, quarter)` when the label was recognized.
    pub fn key(&self) -> Option<(i32, u8)> {
        self.key
    }
}

fn parse_quarter_key(raw: &str) -> Option<(i32, u8)> {
    let s = raw.trim();
    let rest = s.strip_prefix('Q').or_else(|| s.strip_prefix('q'))?;
    let (q, year) = rest.split_once('-')?;
    let quarter: u8 = q.trim().parse().ok()?;
    if !(1..=4).contains(&quarter) {
        return None;
    }
    let year = year.trim();
    let year: i32 = match year.len() {
        2 => 2000 + year.parse::<i32>().ok()?,
        4 => year.parse().ok()?,
        _ => return None,
    };
    Some((year, quarter))
}

impl Ord for QuarterLabel {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.key, other.key) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.raw.cmp(&other.raw)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.raw.cmp(&other.raw),
        }
    }
}

impl PartialOrd for QuarterLabel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for QuarterLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl Serialize for QuarterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Named intraday demand window.
///
/// `ALL` fixes the presentation order (alphabetical by display name) so
/// tables and legends are stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    EveningPeak,
    MorningPeak,
    SolarPeriod,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::EveningPeak, Period::MorningPeak, Period::SolarPeriod];

    /// Human-readable label for terminal output and chart legends.
    pub fn display_name(self) -> &'static str {
        match self {
            Period::EveningPeak => "Evening Peak",
            Period::MorningPeak => "Morning Peak",
            Period::SolarPeriod => "Solar Period",
        }
    }

    /// CSV column that carries this period's indicator flag.
    pub fn column_name(self) -> &'static str {
        match self {
            Period::EveningPeak => "Evening_Peak",
            Period::MorningPeak => "Morning_Peak",
            Period::SolarPeriod => "Solar_Period",
        }
    }
}

/// Full `describe`-style statistics over a group's RRP values.
///
/// `count` is the number of non-null observations. Quartiles use linear
/// interpolation; `std` is the sample standard deviation (Bessel's
/// correction), absent when fewer than two observations exist.
#[derive(Debug, Clone, Serialize)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// The five comparison statistics computed per `(Period, IndexTerm)` group.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodStats {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std: Option<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults). Keeping the file path here
/// rather than resolving it against the working directory inside the loader
/// keeps the core pipeline stateless and independently testable.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,

    /// Rows shown in the head preview.
    pub head_rows: usize,

    /// Terminal ASCII chart of mean RRP per quarter.
    pub ascii_plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    /// Directory for the SVG figures; `None` skips chart rendering.
    pub charts_dir: Option<PathBuf>,

    pub export_pivot: Option<PathBuf>,
    pub export_stats: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quarter_label_parses_short_and_long_years() {
        assert_eq!(QuarterLabel::new("Q1-22").key(), Some((2022, 1)));
        assert_eq!(QuarterLabel::new("Q4-2023").key(), Some((2023, 4)));
        assert_eq!(QuarterLabel::new("q2-21").key(), Some((2021, 2)));
        assert_eq!(QuarterLabel::new("Q5-22").key(), None);
        assert_eq!(QuarterLabel::new("H1-22").key(), None);
    }

    #[test]
    fn quarter_order_is_chronological_across_years() {
        let q4_22 = QuarterLabel::new("Q4-22");
        let q1_23 = QuarterLabel::new("Q1-23");
        assert!(q4_22 < q1_23, "Q4-22 must sort before Q1-23");
    }

    #[test]
    fn unrecognized_labels_sort_after_recognized_quarters() {
        let known = QuarterLabel::new("Q4-23");
        let opaque = QuarterLabel::new("ADHOC");
        assert!(known < opaque);
    }

    #[test]
    fn period_flags_are_independent() {
        let r = PriceRecord {
            timestamp: chrono::NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .and_hms_opt(17, 30, 0)
                .unwrap(),
            rrp: Some(88.0),
            index_term: QuarterLabel::new("Q1-22"),
            year: 2022,
            solar_period: true,
            evening_peak: true,
            morning_peak: false,
        };
        assert!(r.in_period(Period::SolarPeriod));
        assert!(r.in_period(Period::EveningPeak));
        assert_eq!(r.active_period_count(), 2);
    }
}
