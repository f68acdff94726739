//! Shared analysis pipeline.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> normalize -> grouped aggregation
//!
//! The presentation layer (tables, plots, exports) consumes `RunOutput` and
//! never recomputes an aggregate.

use std::collections::BTreeMap;

use crate::analysis::{self, PeriodCounts, PeriodQuarterStats};
use crate::domain::{AnalysisConfig, Describe, QuarterLabel};
use crate::error::AppError;
use crate::io::ingest::{self, IngestedData};

/// All computed outputs of a single `rrp` run.
#[derive(Debug)]
pub struct RunOutput {
    pub ingest: IngestedData,
    pub describe_all: Option<Describe>,
    pub describe_by_quarter: Vec<(QuarterLabel, Option<Describe>)>,
    pub mean_by_quarter: Vec<(QuarterLabel, Option<f64>)>,
    pub period_counts: BTreeMap<i32, PeriodCounts>,
    pub period_quarter: PeriodQuarterStats,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let ingest = ingest::load_prices(&config.csv_path)?;

    let describe_all = analysis::describe_all(&ingest.records);
    let describe_by_quarter = analysis::describe_by_quarter(&ingest.records);
    let mean_by_quarter = analysis::mean_rrp_by_quarter(&ingest.records);
    let period_counts = analysis::period_counts_by_year(&ingest.records);
    let period_quarter = analysis::period_quarter_stats(&ingest.records);

    Ok(RunOutput {
        ingest,
        describe_all,
        describe_by_quarter,
        mean_by_quarter,
        period_counts,
        period_quarter,
    })
}
