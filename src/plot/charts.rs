//! Plotters-powered SVG figures.
//!
//! Why the SVG backend instead of a bitmap one?
//! - no native font/raster dependencies (text stays as SVG text elements)
//! - deterministic output (helpful for golden tests and diffs)
//! - scales cleanly when embedded in reports
//!
//! Five figures are written in a fixed sequence mirroring the analysis order:
//! raw series, per-quarter average line, per-quarter box distribution,
//! per-period-and-quarter comparison line, per-period-and-quarter box
//! distribution.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;

use crate::analysis::{self, PeriodQuarterStats};
use crate::domain::{Period, PriceRecord, QuarterLabel};
use crate::error::AppError;

const FIG_TIME_SERIES: &str = "01_time_series.svg";
const FIG_AVG_BY_QUARTER: &str = "02_avg_by_quarter.svg";
const FIG_BOX_BY_QUARTER: &str = "03_box_by_quarter.svg";
const FIG_AVG_BY_PERIOD_QUARTER: &str = "04_avg_by_period_quarter.svg";
const FIG_BOX_BY_PERIOD_QUARTER: &str = "05_box_by_period_quarter.svg";

/// Render all five figures into `dir`, returning the written paths in order.
///
/// When the dataset carries no non-null price at all there is nothing to
/// draw; we skip rendering rather than emit empty axes.
pub fn render_all(
    dir: &Path,
    records: &[PriceRecord],
    quarter_means: &[(QuarterLabel, Option<f64>)],
    period_quarter: &PeriodQuarterStats,
) -> Result<Vec<PathBuf>, AppError> {
    if records.iter().all(|r| r.rrp.is_none()) {
        return Ok(Vec::new());
    }

    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::io(format!(
            "Failed to create charts directory '{}': {e}",
            dir.display()
        ))
    })?;

    let mut written = Vec::with_capacity(5);

    let path = dir.join(FIG_TIME_SERIES);
    time_series(&path, records)?;
    written.push(path);

    let path = dir.join(FIG_AVG_BY_QUARTER);
    avg_by_quarter(&path, quarter_means)?;
    written.push(path);

    let path = dir.join(FIG_BOX_BY_QUARTER);
    box_by_quarter(&path, records)?;
    written.push(path);

    let path = dir.join(FIG_AVG_BY_PERIOD_QUARTER);
    avg_by_period_quarter(&path, period_quarter)?;
    written.push(path);

    let path = dir.join(FIG_BOX_BY_PERIOD_QUARTER);
    box_by_period_quarter(&path, records)?;
    written.push(path);

    Ok(written)
}

/// Figure 1: raw RRP over time.
fn time_series(path: &Path, records: &[PriceRecord]) -> Result<(), AppError> {
    let points: Vec<(NaiveDateTime, f64)> = records
        .iter()
        .filter_map(|r| r.rrp.map(|v| (r.timestamp, v)))
        .collect();
    let Some((&(t0, _), &(t1, _))) = points.first().zip(points.last()) else {
        return Ok(());
    };
    // Records are already chronological; a degenerate single-instant span
    // still needs a non-empty axis range.
    let t1 = if t1 > t0 { t1 } else { t0 + Duration::days(1) };
    let (y0, y1) = padded_value_range(points.iter().map(|&(_, y)| y));

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Time Series of Electricity Prices", ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(RangedDateTime::from(t0..t1), y0..y1)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price ($/MWh)")
        .x_labels(8)
        .y_labels(8)
        .x_label_formatter(&|dt| dt.format("%Y-%m").to_string())
        .draw()
        .map_err(|e| draw_err(path, e))?;

    chart
        .draw_series(LineSeries::new(points, &BLUE.mix(0.7)))
        .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))
}

/// Figure 2: average RRP per quarter.
fn avg_by_quarter(
    path: &Path,
    means: &[(QuarterLabel, Option<f64>)],
) -> Result<(), AppError> {
    let labels: Vec<String> = means.iter().map(|(q, _)| q.to_string()).collect();
    let points: Vec<(f64, f64)> = means
        .iter()
        .enumerate()
        .filter_map(|(i, (_, m))| m.map(|m| (i as f64, m)))
        .collect();
    if points.is_empty() {
        return Ok(());
    }
    let (y0, y1) = padded_value_range(points.iter().map(|&(_, y)| y));
    let x_max = (means.len().saturating_sub(1)).max(1) as f64;

    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Average Quarterly Price by IndexTerm", ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(-0.5..x_max + 0.5, y0..y1)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("IndexTerm")
        .y_desc("Average RRP ($/MWh)")
        // One tick per quarter so every label is shown.
        .x_labels(labels.len().max(2))
        .x_label_formatter(&make_category_formatter(labels))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(|e| draw_err(path, e))?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )
        .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))
}

/// Figure 3: RRP distribution per quarter.
fn box_by_quarter(path: &Path, records: &[PriceRecord]) -> Result<(), AppError> {
    let groups = analysis::rrp_values_by_quarter(records);
    let labels: Vec<String> = groups.iter().map(|(q, _)| q.to_string()).collect();
    let all: Vec<f64> = groups.iter().flat_map(|(_, v)| v.iter().copied()).collect();
    if all.is_empty() {
        return Ok(());
    }
    let (y0, y1) = padded_value_range(all.iter().copied());
    let n = groups.len();

    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Boxplot for RRP by IndexTerm", ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d((0..n).into_segmented(), y0 as f32..y1 as f32)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("IndexTerm")
        .y_desc("RRP ($/MWh)")
        .x_label_formatter(&make_segment_formatter(labels))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    chart
        .draw_series(
            groups
                .iter()
                .enumerate()
                .filter(|(_, (_, values))| !values.is_empty())
                .map(|(i, (_, values))| {
                    Boxplot::new_vertical(SegmentValue::CenterOf(i), &Quartiles::new(values))
                        .width(20)
                        .style(&BLUE)
                }),
        )
        .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))
}

/// Figure 4: average RRP per quarter, one line per period.
fn avg_by_period_quarter(
    path: &Path,
    stats: &PeriodQuarterStats,
) -> Result<(), AppError> {
    let labels: Vec<String> = stats.quarters.iter().map(|q| q.to_string()).collect();
    let mut y_values = Vec::new();
    for period in Period::ALL {
        for (_, m) in stats.mean_series(period) {
            if let Some(m) = m {
                y_values.push(m);
            }
        }
    }
    if y_values.is_empty() {
        return Ok(());
    }
    let (y0, y1) = padded_value_range(y_values.iter().copied());
    let x_max = (labels.len().saturating_sub(1)).max(1) as f64;

    let root = SVGBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Average RRP by Period and IndexTerm", ("sans-serif", 24))
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d(-0.5..x_max + 0.5, y0..y1)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("IndexTerm")
        .y_desc("Average RRP ($/MWh)")
        .x_labels(labels.len().max(2))
        .x_label_formatter(&make_category_formatter(labels))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    for period in Period::ALL {
        let color = period_color(period);
        let points: Vec<(f64, f64)> = stats
            .mean_series(period)
            .into_iter()
            .enumerate()
            .filter_map(|(i, (_, m))| m.map(|m| (i as f64, m)))
            .collect();

        chart
            .draw_series(LineSeries::new(points.iter().copied(), &color))
            .map_err(|e| draw_err(path, e))?
            .label(period.display_name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )
            .map_err(|e| draw_err(path, e))?;
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))
}

/// Figure 5: RRP distribution per quarter, grouped by period.
fn box_by_period_quarter(path: &Path, records: &[PriceRecord]) -> Result<(), AppError> {
    let by_period = analysis::rrp_values_by_period_quarter(records);
    let labels: Vec<String> = by_period
        .first()
        .map(|(_, groups)| groups.iter().map(|(q, _)| q.to_string()).collect())
        .unwrap_or_default();
    let all: Vec<f64> = by_period
        .iter()
        .flat_map(|(_, groups)| groups.iter().flat_map(|(_, v)| v.iter().copied()))
        .collect();
    if all.is_empty() {
        return Ok(());
    }
    let (y0, y1) = padded_value_range(all.iter().copied());
    let n = labels.len();

    let root = SVGBackend::new(path, (1400, 700)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_err(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption(
            "Boxplot of RRP for Each Period by Quarter (IndexTerm)",
            ("sans-serif", 24),
        )
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 45)
        .build_cartesian_2d((0..n).into_segmented(), y0 as f32..y1 as f32)
        .map_err(|e| draw_err(path, e))?;

    chart
        .configure_mesh()
        .x_desc("Quarter (IndexTerm)")
        .y_desc("RRP ($/MWh)")
        .x_label_formatter(&make_segment_formatter(labels))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    // One boxplot per (period, quarter), offset within the quarter segment so
    // the three periods sit side by side.
    for (j, (period, groups)) in by_period.iter().enumerate() {
        let color = period_color(*period);
        let offset = (j as f64 - 1.0) * 22.0;

        chart
            .draw_series(
                groups
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, values))| !values.is_empty())
                    .map(|(i, (_, values))| {
                        Boxplot::new_vertical(SegmentValue::CenterOf(i), &Quartiles::new(values))
                            .width(18)
                            .style(&color)
                            .offset(offset)
                    }),
            )
            .map_err(|e| draw_err(path, e))?
            .label(period.display_name())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(|e| draw_err(path, e))?;

    root.present().map_err(|e| draw_err(path, e))
}

/// High-contrast palette, one fixed color per period.
fn period_color(period: Period) -> RGBColor {
    match period {
        Period::EveningPeak => RGBColor(214, 39, 40),
        Period::MorningPeak => RGBColor(31, 119, 180),
        Period::SolarPeriod => RGBColor(255, 127, 14),
    }
}

fn padded_value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = (max - min).abs();
    let pad = (span * 0.05).max(1.0);
    (min - pad, max + pad)
}

/// Tick formatter for a continuous axis carrying category indices: integer
/// positions map to their quarter label, everything else is blank.
fn make_category_formatter(labels: Vec<String>) -> impl Fn(&f64) -> String {
    move |x: &f64| {
        let i = x.round();
        if (x - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        labels.get(i as usize).cloned().unwrap_or_default()
    }
}

fn make_segment_formatter(labels: Vec<String>) -> impl Fn(&SegmentValue<usize>) -> String {
    move |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn draw_err(path: &Path, e: impl std::fmt::Display) -> AppError {
    AppError::io(format!(
        "Failed to render chart '{}': {e}",
        path.display()
    ))
}
