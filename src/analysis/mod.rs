//! Grouped aggregation over the loaded record set.
//!
//! Everything here is a pure function from borrowed records to owned result
//! structs, so the report/plot layers never recompute and tests can hit each
//! aggregate directly. Grouping uses `BTreeMap` keyed on `QuarterLabel` /
//! `Period`, which makes output order chronological and deterministic (no
//! hash-order dependence).
//!
//! Null-RRP semantics: aggregation excludes null values per-group (a record
//! with a null RRP still counts toward period activity, but contributes no
//! observation to price statistics). An all-null group is reported as an
//! explicit no-data entry, never as zero.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Describe, Period, PeriodStats, PriceRecord, QuarterLabel};
use crate::stats;

/// Per-year activity counts for the three period flags.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PeriodCounts {
    pub solar_period: usize,
    pub evening_peak: usize,
    pub morning_peak: usize,
}

/// Count records with each flag set, grouped by `Year`.
///
/// Flags are independent booleans: a record active in two periods increments
/// two counters. Used as a sanity check that period windows are populated as
/// expected each year.
pub fn period_counts_by_year(records: &[PriceRecord]) -> BTreeMap<i32, PeriodCounts> {
    let mut out: BTreeMap<i32, PeriodCounts> = BTreeMap::new();
    for r in records {
        let counts = out.entry(r.year).or_default();
        if r.solar_period {
            counts.solar_period += 1;
        }
        if r.evening_peak {
            counts.evening_peak += 1;
        }
        if r.morning_peak {
            counts.morning_peak += 1;
        }
    }
    out
}

/// Describe RRP over the whole record set.
pub fn describe_all(records: &[PriceRecord]) -> Option<Describe> {
    stats::describe(&rrp_values(records.iter()))
}

/// Describe RRP per quarter, quarters in chronological order.
///
/// Every quarter present in the input appears exactly once; a quarter whose
/// RRP values are all null yields `None` (explicit no-data).
pub fn describe_by_quarter(records: &[PriceRecord]) -> Vec<(QuarterLabel, Option<Describe>)> {
    group_by_quarter(records.iter())
        .into_iter()
        .map(|(quarter, values)| (quarter, stats::describe(&values)))
        .collect()
}

/// Mean RRP per quarter (line-chart series).
pub fn mean_rrp_by_quarter(records: &[PriceRecord]) -> Vec<(QuarterLabel, Option<f64>)> {
    group_by_quarter(records.iter())
        .into_iter()
        .map(|(quarter, values)| (quarter, stats::mean(&values)))
        .collect()
}

/// A transient view of the records active in one period.
///
/// Built fresh each run; a record flagged in several periods appears in
/// several slices. When slices are concatenated for the combined comparison,
/// that record legitimately contributes once per period (intentional, and
/// surfaced to the analyst via the overlap diagnostic).
pub struct PeriodSlice<'a> {
    pub period: Period,
    pub records: Vec<&'a PriceRecord>,
}

pub fn period_slices(records: &[PriceRecord]) -> Vec<PeriodSlice<'_>> {
    Period::ALL
        .iter()
        .map(|&period| PeriodSlice {
            period,
            records: records.iter().filter(|r| r.in_period(period)).collect(),
        })
        .collect()
}

/// Price statistics for every `(Period, IndexTerm)` pair.
///
/// The grid is complete: every quarter present in the input appears for every
/// period; a pair with no records (or only null RRP) is an explicit no-data
/// cell.
#[derive(Debug)]
pub struct PeriodQuarterStats {
    /// All quarters in the input, chronological.
    pub quarters: Vec<QuarterLabel>,
    cells: BTreeMap<(Period, QuarterLabel), PeriodStats>,
}

impl PeriodQuarterStats {
    pub fn get(&self, period: Period, quarter: &QuarterLabel) -> Option<&PeriodStats> {
        self.cells.get(&(period, quarter.clone()))
    }

    /// Mean RRP per quarter for one period, in quarter order (chart series).
    pub fn mean_series(&self, period: Period) -> Vec<(QuarterLabel, Option<f64>)> {
        self.quarters
            .iter()
            .map(|q| (q.clone(), self.get(period, q).map(|s| s.mean)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&(Period, QuarterLabel), &PeriodStats)> {
        self.cells.iter()
    }
}

pub fn period_quarter_stats(records: &[PriceRecord]) -> PeriodQuarterStats {
    let quarters: Vec<QuarterLabel> = group_by_quarter(records.iter())
        .into_iter()
        .map(|(q, _)| q)
        .collect();

    let mut cells = BTreeMap::new();
    for slice in period_slices(records) {
        for (quarter, values) in group_by_quarter(slice.records.iter().copied()) {
            if let Some(stats) = stats::period_stats(&values) {
                cells.insert((slice.period, quarter), stats);
            }
        }
    }

    PeriodQuarterStats { quarters, cells }
}

/// Non-null RRP values per quarter, chronological (box-chart input).
pub fn rrp_values_by_quarter(records: &[PriceRecord]) -> Vec<(QuarterLabel, Vec<f64>)> {
    group_by_quarter(records.iter()).into_iter().collect()
}

/// Non-null RRP values per `(Period, IndexTerm)`, each period aligned to the
/// full chronological quarter list (empty for no-data pairs).
pub fn rrp_values_by_period_quarter(
    records: &[PriceRecord],
) -> Vec<(Period, Vec<(QuarterLabel, Vec<f64>)>)> {
    let quarters: Vec<QuarterLabel> = group_by_quarter(records.iter())
        .into_iter()
        .map(|(q, _)| q)
        .collect();

    period_slices(records)
        .into_iter()
        .map(|slice| {
            let mut grouped = group_by_quarter(slice.records.iter().copied());
            let aligned = quarters
                .iter()
                .map(|q| (q.clone(), grouped.remove(q).unwrap_or_default()))
                .collect();
            (slice.period, aligned)
        })
        .collect()
}

/// Group non-null RRP values by quarter. Quarters with rows but only null
/// RRP still get an (empty) entry so no category is dropped.
fn group_by_quarter<'a>(
    records: impl Iterator<Item = &'a PriceRecord>,
) -> BTreeMap<QuarterLabel, Vec<f64>> {
    let mut groups: BTreeMap<QuarterLabel, Vec<f64>> = BTreeMap::new();
    for r in records {
        let values = groups.entry(r.index_term.clone()).or_default();
        if let Some(rrp) = r.rrp {
            values.push(rrp);
        }
    }
    groups
}

fn rrp_values<'a>(records: impl Iterator<Item = &'a PriceRecord>) -> Vec<f64> {
    records.filter_map(|r| r.rrp).collect()
}
