//! CSV ingest and normalization.
//!
//! This module turns the half-hourly price export into a clean, chronologically
//! ordered set of `PriceRecord`s.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 3)
//! - **Fail-fast rows**: a malformed timestamp or numeric anywhere aborts the
//!   run (exit code 4) rather than silently dropping the row
//! - **Deterministic behavior** (stable sort, no hidden coercion)
//! - **Separation of concerns**: no aggregation logic here
//!
//! The only tolerated data-quality condition is a null (empty) `RRP` cell:
//! it is kept as `None`, counted in the null report, and excluded per-group
//! by downstream aggregation.

use std::collections::HashMap;
use std::fs::File;

use chrono::NaiveDateTime;
use csv::StringRecord;

use crate::domain::{PriceRecord, QuarterLabel};
use crate::error::AppError;

/// Columns the input file must carry, in report order.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "SETTLEMENTDATE",
    "RRP",
    "IndexTerm",
    "Year",
    "Solar_Period",
    "Evening_Peak",
    "Morning_Peak",
];

/// Ingest output: ordered records + diagnostics.
#[derive(Debug, Clone)]
pub struct IngestedData {
    /// Records in chronological `timestamp` order.
    pub records: Vec<PriceRecord>,
    /// Null (empty) cell count per required column, diagnostic only.
    pub null_counts: Vec<(String, usize)>,
    pub rows_read: usize,
}

impl IngestedData {
    /// Distinct quarters in chronological order.
    pub fn unique_quarters(&self) -> Vec<QuarterLabel> {
        let mut quarters: Vec<QuarterLabel> =
            self.records.iter().map(|r| r.index_term.clone()).collect();
        quarters.sort();
        quarters.dedup();
        quarters
    }

    /// Records whose RRP is in more than one period at once (overlap
    /// diagnostic for the combined period comparison).
    pub fn overlapping_period_rows(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.active_period_count() > 1)
            .count()
    }
}

/// Load and normalize the price CSV.
pub fn load_prices(path: &std::path::Path) -> Result<IngestedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::io(format!(
            "Failed to open CSV '{}': {e}",
            path.display()
        ))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::io(format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut records = Vec::new();
    let mut null_counts: HashMap<&'static str, usize> = HashMap::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record =
            result.map_err(|e| AppError::parse(format!("line {line}: CSV parse error: {e}")))?;

        records.push(parse_row(&record, &header_map, line, &mut null_counts)?);
    }

    if records.is_empty() {
        return Err(AppError::schema("No data rows found in the input file."));
    }

    // Timestamp is the ordering key for everything downstream.
    records.sort_by_key(|r| r.timestamp);

    let null_counts = REQUIRED_COLUMNS
        .iter()
        .map(|col| (col.to_string(), null_counts.get(col).copied().unwrap_or(0)))
        .collect();

    Ok(IngestedData {
        records,
        null_counts,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿SETTLEMENTDATE"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for col in REQUIRED_COLUMNS {
        if !header_map.contains_key(&col.to_ascii_lowercase()) {
            return Err(AppError::schema(format!(
                "Missing required column: `{col}`"
            )));
        }
    }
    Ok(())
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
    null_counts: &mut HashMap<&'static str, usize>,
) -> Result<PriceRecord, AppError> {
    let timestamp_str = get_required(record, header_map, "SETTLEMENTDATE", line)?;
    let timestamp = parse_timestamp(timestamp_str)
        .map_err(|e| AppError::parse(format!("line {line}: {e}")))?;

    // A null RRP is a data-quality condition to surface, not an error.
    let rrp = match get_optional(record, header_map, "RRP") {
        Some(s) => Some(s.parse::<f64>().map_err(|_| {
            AppError::parse(format!("line {line}: Invalid `RRP` value '{s}'."))
        })?),
        None => {
            *null_counts.entry("RRP").or_insert(0) += 1;
            None
        }
    };

    let index_term = QuarterLabel::new(get_required(record, header_map, "IndexTerm", line)?);

    let year_str = get_required(record, header_map, "Year", line)?;
    let year: i32 = year_str
        .parse()
        .map_err(|_| AppError::parse(format!("line {line}: Invalid `Year` value '{year_str}'.")))?;

    let solar_period = parse_flag(get_required(record, header_map, "Solar_Period", line)?)
        .map_err(|e| AppError::parse(format!("line {line}: `Solar_Period`: {e}")))?;
    let evening_peak = parse_flag(get_required(record, header_map, "Evening_Peak", line)?)
        .map_err(|e| AppError::parse(format!("line {line}: `Evening_Peak`: {e}")))?;
    let morning_peak = parse_flag(get_required(record, header_map, "Morning_Peak", line)?)
        .map_err(|e| AppError::parse(format!("line {line}: `Morning_Peak`: {e}")))?;

    Ok(PriceRecord {
        timestamp,
        rrp,
        index_term,
        year,
        solar_period,
        evening_peak,
        morning_peak,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
    line: usize,
) -> Result<&'a str, AppError> {
    get_optional(record, header_map, name).ok_or_else(|| {
        AppError::parse(format!("line {line}: Missing required value: `{name}`"))
    })
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(&name.to_ascii_lowercase())?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime, String> {
    // AEMO exports use `YYYY/MM/DD HH:MM:SS`; we accept a small set of common
    // settlement-date formats to reduce friction while keeping parsing
    // deterministic.
    const FMTS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d/%m/%Y %H:%M",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for fmt in FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    Err(format!(
        "Invalid timestamp '{s}'. Expected a settlement date like 'YYYY-MM-DD HH:MM:SS'."
    ))
}

fn parse_flag(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        other => Err(format!("Invalid indicator value '{other}' (expected 0 or 1).")),
    }
}
