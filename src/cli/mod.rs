//! Command-line parsing for the quarterly price report.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! loading/aggregation code.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
///
/// A single linear pipeline, so no subcommands: load the CSV, print the
/// summary tables, render the charts.
#[derive(Debug, Parser)]
#[command(
    name = "rrp",
    version,
    about = "Quarterly regional electricity price analysis (half-hourly RRP CSV)"
)]
pub struct Cli {
    /// Input CSV of half-hourly price records.
    #[arg(short = 'f', long = "file", default_value = "QLD_Prices_CY21-CY23.csv")]
    pub file: PathBuf,

    /// Rows shown in the head preview.
    #[arg(long, default_value_t = 5)]
    pub head: usize,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Terminal plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Terminal plot height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Directory for the SVG figures.
    #[arg(long, default_value = "charts")]
    pub charts_dir: PathBuf,

    /// Skip SVG chart rendering.
    #[arg(long)]
    pub no_charts: bool,

    /// Export the pivoted statistics table to CSV.
    #[arg(long, value_name = "CSV")]
    pub export_pivot: Option<PathBuf>,

    /// Export all computed aggregates to JSON.
    #[arg(long, value_name = "JSON")]
    pub export_stats: Option<PathBuf>,
}
