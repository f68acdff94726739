//! End-to-end pipeline properties against a fixture CSV.

use std::collections::BTreeSet;
use std::path::PathBuf;

use rrp_report::analysis;
use rrp_report::domain::{Period, QuarterLabel};
use rrp_report::io::ingest;
use rrp_report::report::format;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/prices.csv")
}

#[test]
fn loads_fixture_in_chronological_order() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    assert_eq!(data.rows_read, 11);
    assert_eq!(data.records.len(), 11);
    assert!(data
        .records
        .windows(2)
        .all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn null_rrp_is_reported_not_dropped() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    let rrp_nulls = data
        .null_counts
        .iter()
        .find(|(col, _)| col == "RRP")
        .map(|(_, n)| *n)
        .unwrap();
    assert_eq!(rrp_nulls, 1);

    // The record with the null RRP still exists (Q2-22 has 3 records) but
    // contributes no observation to the quarter's describe.
    let by_quarter = analysis::describe_by_quarter(&data.records);
    let q2 = by_quarter
        .iter()
        .find(|(q, _)| q.as_str() == "Q2-22")
        .and_then(|(_, d)| d.as_ref())
        .unwrap();
    assert_eq!(q2.count, 2);
}

#[test]
fn quarter_set_is_closed_across_all_aggregates() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    let input_quarters: BTreeSet<QuarterLabel> = data
        .records
        .iter()
        .map(|r| r.index_term.clone())
        .collect();

    let by_quarter: BTreeSet<QuarterLabel> = analysis::describe_by_quarter(&data.records)
        .into_iter()
        .map(|(q, _)| q)
        .collect();
    assert_eq!(input_quarters, by_quarter);

    let pivot_quarters: BTreeSet<QuarterLabel> = analysis::period_quarter_stats(&data.records)
        .quarters
        .into_iter()
        .collect();
    assert_eq!(input_quarters, pivot_quarters);
}

#[test]
fn aggregates_are_deterministic_across_runs() {
    let first = ingest::load_prices(&fixture_path()).unwrap();
    let second = ingest::load_prices(&fixture_path()).unwrap();

    let table_a = format::format_pivot(&analysis::period_quarter_stats(&first.records));
    let table_b = format::format_pivot(&analysis::period_quarter_stats(&second.records));
    assert_eq!(table_a, table_b);

    let counts_a = format::format_period_counts(
        &analysis::period_counts_by_year(&first.records),
        first.overlapping_period_rows(),
    );
    let counts_b = format::format_period_counts(
        &analysis::period_counts_by_year(&second.records),
        second.overlapping_period_rows(),
    );
    assert_eq!(counts_a, counts_b);
}

#[test]
fn period_counts_match_raw_boolean_sums() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    let counts = analysis::period_counts_by_year(&data.records);

    for (year, c) in &counts {
        let solar = data
            .records
            .iter()
            .filter(|r| r.year == *year && r.solar_period)
            .count();
        let evening = data
            .records
            .iter()
            .filter(|r| r.year == *year && r.evening_peak)
            .count();
        let morning = data
            .records
            .iter()
            .filter(|r| r.year == *year && r.morning_peak)
            .count();
        assert_eq!(c.solar_period, solar);
        assert_eq!(c.evening_peak, evening);
        assert_eq!(c.morning_peak, morning);
    }

    // The fixture's flags are mutually exclusive, so the per-period sums also
    // add up to the rows with at least one active flag.
    let flagged = data
        .records
        .iter()
        .filter(|r| r.active_period_count() >= 1)
        .count();
    let summed: usize = counts
        .values()
        .map(|c| c.solar_period + c.evening_peak + c.morning_peak)
        .sum();
    assert_eq!(flagged, summed);
}

#[test]
fn evening_peak_scenario_means() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    let pq = analysis::period_quarter_stats(&data.records);
    let q1 = QuarterLabel::new("Q1-22");

    // Q1-22 evening peak: 100 and 200.
    let evening = pq.get(Period::EveningPeak, &q1).unwrap();
    assert!((evening.mean - 150.0).abs() < 1e-9);

    // Q1-22 overall: 65.10, -12.50, 100, 200, 50.
    let by_quarter = analysis::describe_by_quarter(&data.records);
    let d = by_quarter
        .iter()
        .find(|(q, _)| *q == q1)
        .and_then(|(_, d)| d.as_ref())
        .unwrap();
    assert!((d.mean - 402.6 / 5.0).abs() < 1e-9);
}

#[test]
fn negative_spike_is_a_legitimate_observation() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    let pq = analysis::period_quarter_stats(&data.records);
    let s = pq
        .get(Period::EveningPeak, &QuarterLabel::new("Q2-22"))
        .unwrap();
    assert!((s.min - -1000.0).abs() < 1e-9);
    assert!((s.mean - -1000.0).abs() < 1e-9);
}

#[test]
fn empty_period_quarter_pair_reports_no_data() {
    let data = ingest::load_prices(&fixture_path()).unwrap();
    let pq = analysis::period_quarter_stats(&data.records);

    // Q4-22 has a single solar record and nothing else.
    let q4 = QuarterLabel::new("Q4-22");
    assert!(pq.get(Period::EveningPeak, &q4).is_none());
    assert!(pq.get(Period::MorningPeak, &q4).is_none());
    assert!(pq.get(Period::SolarPeriod, &q4).is_some());

    let table = format::format_pivot(&pq);
    assert!(table.contains("n/a"));
    assert!(!table.contains("NaN"));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = ingest::load_prices(std::path::Path::new("does-not-exist.csv")).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn missing_column_is_a_schema_error() {
    let dir = std::env::temp_dir().join("rrp-report-schema-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("missing_column.csv");
    std::fs::write(
        &path,
        "SETTLEMENTDATE,RRP,IndexTerm,Year,Solar_Period,Evening_Peak\n\
         2022-01-01 00:30:00,10.0,Q1-22,2022,0,0\n",
    )
    .unwrap();

    let err = ingest::load_prices(&path).unwrap_err();
    assert_eq!(err.exit_code(), 3);
    assert!(err.to_string().contains("Morning_Peak"));
}

#[test]
fn malformed_timestamp_fails_the_whole_run() {
    let dir = std::env::temp_dir().join("rrp-report-parse-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad_timestamp.csv");
    std::fs::write(
        &path,
        "SETTLEMENTDATE,RRP,IndexTerm,Year,Solar_Period,Evening_Peak,Morning_Peak\n\
         2022-01-01 00:30:00,10.0,Q1-22,2022,0,0,0\n\
         not-a-timestamp,20.0,Q1-22,2022,0,0,0\n",
    )
    .unwrap();

    let err = ingest::load_prices(&path).unwrap_err();
    assert_eq!(err.exit_code(), 4);
    assert!(err.to_string().contains("line 3"));
}
