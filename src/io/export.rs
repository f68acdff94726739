//! Export computed aggregates to CSV/JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; they carry the same numbers the terminal tables show.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::analysis::{PeriodCounts, PeriodQuarterStats};
use crate::domain::{Describe, PeriodStats, QuarterLabel};
use crate::error::AppError;

/// Write the pivoted `(stat × IndexTerm × Period)` table to a CSV file.
///
/// Cells match the terminal display (2 decimal places); no-data cells are
/// left empty.
pub fn write_pivot_csv(path: &Path, stats: &PeriodQuarterStats) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create export CSV '{}': {e}",
            path.display()
        ))
    })?;

    writeln!(file, "stat,IndexTerm,Evening Peak,Morning Peak,Solar Period")
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    let stat_blocks: [(&str, fn(&PeriodStats) -> Option<f64>); 5] = [
        ("mean", |s| Some(s.mean)),
        ("median", |s| Some(s.median)),
        ("min", |s| Some(s.min)),
        ("max", |s| Some(s.max)),
        ("std", |s| s.std),
    ];

    for (name, pick) in stat_blocks {
        for quarter in &stats.quarters {
            let cells: Vec<String> = crate::domain::Period::ALL
                .iter()
                .map(|&period| {
                    stats
                        .get(period, quarter)
                        .and_then(pick)
                        .map(|v| format!("{v:.2}"))
                        .unwrap_or_default()
                })
                .collect();
            writeln!(file, "{},{},{}", name, quarter, cells.join(","))
                .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct StatsExport<'a> {
    tool: &'static str,
    period_counts_by_year: &'a BTreeMap<i32, PeriodCounts>,
    rrp_by_quarter: Vec<QuarterDescribeRow<'a>>,
    rrp_by_period_quarter: Vec<PeriodQuarterRow<'a>>,
}

#[derive(Serialize)]
struct QuarterDescribeRow<'a> {
    index_term: &'a QuarterLabel,
    stats: Option<&'a Describe>,
}

#[derive(Serialize)]
struct PeriodQuarterRow<'a> {
    period: &'static str,
    index_term: &'a QuarterLabel,
    stats: &'a PeriodStats,
}

/// Write all computed aggregates to a JSON file.
pub fn write_stats_json(
    path: &Path,
    period_counts: &BTreeMap<i32, PeriodCounts>,
    by_quarter: &[(QuarterLabel, Option<Describe>)],
    period_quarter: &PeriodQuarterStats,
) -> Result<(), AppError> {
    let export = StatsExport {
        tool: "rrp-report",
        period_counts_by_year: period_counts,
        rrp_by_quarter: by_quarter
            .iter()
            .map(|(q, d)| QuarterDescribeRow {
                index_term: q,
                stats: d.as_ref(),
            })
            .collect(),
        rrp_by_period_quarter: period_quarter
            .iter()
            .map(|((period, quarter), stats)| PeriodQuarterRow {
                period: period.display_name(),
                index_term: quarter,
                stats,
            })
            .collect(),
    };

    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create export JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, &export)
        .map_err(|e| AppError::io(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}
