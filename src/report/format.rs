//! Formatted terminal tables.
//!
//! We keep formatting code in one place so:
//! - the aggregation code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! All tables are plain fixed-width text. Prices are shown with 2 decimal
//! places; a group with no observations renders as `n/a`, never as zero.

use std::collections::BTreeMap;

use crate::analysis::{PeriodCounts, PeriodQuarterStats};
use crate::domain::{Describe, Period, PriceRecord, QuarterLabel};
use crate::io::ingest::IngestedData;

const NO_DATA: &str = "n/a";

/// First-N preview of the loaded records.
pub fn format_head(records: &[PriceRecord], n: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<20} {:>10} {:>9} {:>6} {:>6} {:>8} {:>8}\n",
        "SETTLEMENTDATE", "RRP", "IndexTerm", "Year", "Solar", "Evening", "Morning"
    ));
    for r in records.iter().take(n) {
        out.push_str(&format!(
            "{:<20} {:>10} {:>9} {:>6} {:>6} {:>8} {:>8}\n",
            r.timestamp.format("%Y-%m-%d %H:%M:%S"),
            fmt_opt_price(r.rrp),
            r.index_term,
            r.year,
            flag(r.solar_period),
            flag(r.evening_peak),
            flag(r.morning_peak),
        ));
    }
    out
}

/// Dataset summary: row counts, time span, and the per-column null report.
///
/// The null counts are diagnostic only; nothing is filtered because of them.
pub fn format_info(ingest: &IngestedData) -> String {
    let mut out = String::new();
    out.push_str(&format!("Rows read: {}\n", ingest.rows_read));
    out.push_str(&format!("Records:   {}\n", ingest.records.len()));

    if let (Some(first), Some(last)) = (ingest.records.first(), ingest.records.last()) {
        out.push_str(&format!(
            "Span:      {} .. {}\n",
            first.timestamp.format("%Y-%m-%d %H:%M:%S"),
            last.timestamp.format("%Y-%m-%d %H:%M:%S"),
        ));
    }

    out.push_str("\nNull values per column:\n");
    for (column, count) in &ingest.null_counts {
        out.push_str(&format!("  {column:<16} {count}\n"));
    }
    out
}

pub fn format_unique_quarters(quarters: &[QuarterLabel]) -> String {
    let labels: Vec<&str> = quarters.iter().map(|q| q.as_str()).collect();
    format!("Quarters ({}): {}\n", labels.len(), labels.join(", "))
}

/// Per-year period activity counts, plus the overlap note when any record
/// carries more than one active flag (double counting in the combined
/// comparison is intentional, but the analyst should see it).
pub fn format_period_counts(
    counts: &BTreeMap<i32, PeriodCounts>,
    overlapping_rows: usize,
) -> String {
    let mut out = String::new();
    out.push_str("Period activity counts by year:\n");
    out.push_str(&format!(
        "{:<6} {:>12} {:>12} {:>12}\n",
        "Year", "Solar_Period", "Evening_Peak", "Morning_Peak"
    ));
    for (year, c) in counts {
        out.push_str(&format!(
            "{:<6} {:>12} {:>12} {:>12}\n",
            year, c.solar_period, c.evening_peak, c.morning_peak
        ));
    }
    if overlapping_rows > 0 {
        out.push_str(&format!(
            "Note: {overlapping_rows} record(s) are flagged in more than one period; \
             such records appear once per period in the combined comparison.\n"
        ));
    }
    out
}

/// One describe row (count/mean/std/min/quartiles/max), `n/a` when no data.
fn describe_row(label: &str, describe: Option<&Describe>) -> String {
    match describe {
        Some(d) => format!(
            "{:<10} {:>7} {:>10.2} {:>10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}\n",
            label,
            d.count,
            d.mean,
            fmt_opt(d.std),
            d.min,
            d.q25,
            d.median,
            d.q75,
            d.max
        ),
        None => format!(
            "{:<10} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
            label, 0, NO_DATA, NO_DATA, NO_DATA, NO_DATA, NO_DATA, NO_DATA, NO_DATA
        ),
    }
}

fn describe_header() -> String {
    format!(
        "{:<10} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    )
}

/// Whole-dataset RRP describe.
pub fn format_describe_all(describe: Option<&Describe>) -> String {
    let mut out = String::from("RRP, all records:\n");
    out.push_str(&describe_header());
    out.push_str(&describe_row("RRP", describe));
    out
}

/// RRP describe per quarter, quarters chronological.
pub fn format_describe_by_quarter(rows: &[(QuarterLabel, Option<Describe>)]) -> String {
    let mut out = String::from("RRP by IndexTerm:\n");
    out.push_str(&describe_header());
    for (quarter, describe) in rows {
        out.push_str(&describe_row(quarter.as_str(), describe.as_ref()));
    }
    out
}

/// The final pivoted comparison table: one block per statistic, rows =
/// quarters, columns = periods, cells rounded to 2 decimal places.
pub fn format_pivot(stats: &PeriodQuarterStats) -> String {
    let mut out = String::from("RRP statistics by Period and IndexTerm ($/MWh):\n");

    let stat_blocks: [(&str, fn(&crate::domain::PeriodStats) -> Option<f64>); 5] = [
        ("mean", |s| Some(s.mean)),
        ("median", |s| Some(s.median)),
        ("min", |s| Some(s.min)),
        ("max", |s| Some(s.max)),
        ("std", |s| s.std),
    ];

    for (name, pick) in stat_blocks {
        out.push_str(&format!("\n[{name}]\n"));
        out.push_str(&format!("{:<10}", "IndexTerm"));
        for period in Period::ALL {
            out.push_str(&format!(" {:>14}", period.display_name()));
        }
        out.push('\n');

        for quarter in &stats.quarters {
            out.push_str(&format!("{:<10}", quarter.as_str()));
            for period in Period::ALL {
                let cell = stats.get(period, quarter).and_then(pick);
                out.push_str(&format!(" {:>14}", fmt_opt(cell)));
            }
            out.push('\n');
        }
    }
    out
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => NO_DATA.to_string(),
    }
}

fn fmt_opt_price(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => String::new(),
    }
}

fn flag(b: bool) -> &'static str {
    if b {
        "1"
    } else {
        "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis;
    use chrono::NaiveDate;

    fn record(rrp: Option<f64>, quarter: &str, evening: bool) -> PriceRecord {
        PriceRecord {
            timestamp: NaiveDate::from_ymd_opt(2022, 1, 1)
                .unwrap()
                .and_hms_opt(17, 0, 0)
                .unwrap(),
            rrp,
            index_term: QuarterLabel::new(quarter),
            year: 2022,
            solar_period: false,
            evening_peak: evening,
            morning_peak: false,
        }
    }

    #[test]
    fn pivot_shows_no_data_for_empty_groups() {
        // Only evening-peak data: the solar/morning columns must render n/a.
        let records = vec![
            record(Some(100.0), "Q1-22", true),
            record(Some(200.0), "Q1-22", true),
        ];
        let stats = analysis::period_quarter_stats(&records);
        let table = format_pivot(&stats);
        assert!(table.contains("150.00"), "evening mean missing:\n{table}");
        assert!(table.contains(NO_DATA), "no-data marker missing:\n{table}");
        assert!(!table.contains("NaN"));
    }

    #[test]
    fn pivot_lists_every_quarter() {
        let records = vec![
            record(Some(1.0), "Q4-22", true),
            record(Some(2.0), "Q1-23", true),
        ];
        let stats = analysis::period_quarter_stats(&records);
        let table = format_pivot(&stats);
        let q4 = table.find("Q4-22").unwrap();
        let q1 = table.find("Q1-23").unwrap();
        assert!(q4 < q1, "quarters out of chronological order:\n{table}");
    }

    #[test]
    fn describe_row_rounds_to_two_decimals() {
        let records = vec![
            record(Some(100.0), "Q1-22", false),
            record(Some(200.0), "Q1-22", false),
            record(Some(50.0), "Q1-22", false),
        ];
        let rows = analysis::describe_by_quarter(&records);
        let table = format_describe_by_quarter(&rows);
        assert!(table.contains("116.67"), "rounded mean missing:\n{table}");
    }
}
