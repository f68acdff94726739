//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the load/aggregate pipeline
//! - prints the summary tables in a fixed order
//! - renders the terminal plot and SVG figures
//! - writes optional exports

use clap::Parser;

use crate::cli::Cli;
use crate::domain::AnalysisConfig;
use crate::error::AppError;
use crate::report::format;

pub mod pipeline;

/// Entry point for the `rrp` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = analysis_config_from_args(&cli);
    let run = pipeline::run_analysis(&config)?;

    println!("=== rrp - Quarterly Electricity Price Report ===");
    println!("File: {}", config.csv_path.display());
    println!();

    // Dataset exploration, in the order an analyst reads it: preview, shape
    // and nulls, whole-set describe, the quarter categories.
    print!("{}", format::format_head(&run.ingest.records, config.head_rows));
    println!();
    print!("{}", format::format_info(&run.ingest));
    println!();
    print!("{}", format::format_describe_all(run.describe_all.as_ref()));
    println!();
    print!(
        "{}",
        format::format_unique_quarters(&run.ingest.unique_quarters())
    );
    println!();
    print!(
        "{}",
        format::format_period_counts(&run.period_counts, run.ingest.overlapping_period_rows())
    );
    println!();
    print!(
        "{}",
        format::format_describe_by_quarter(&run.describe_by_quarter)
    );

    if config.ascii_plot {
        println!();
        print!(
            "{}",
            crate::plot::render_quarter_means(
                &run.mean_by_quarter,
                config.plot_width,
                config.plot_height,
            )
        );
    }

    if let Some(dir) = &config.charts_dir {
        let written = crate::plot::charts::render_all(
            dir,
            &run.ingest.records,
            &run.mean_by_quarter,
            &run.period_quarter,
        )?;
        println!();
        if written.is_empty() {
            println!("No charts written (no price data).");
        } else {
            for path in &written {
                println!("Wrote chart {}", path.display());
            }
        }
    }

    // The pivoted comparison table closes the report.
    println!();
    print!("{}", format::format_pivot(&run.period_quarter));

    if let Some(path) = &config.export_pivot {
        crate::io::export::write_pivot_csv(path, &run.period_quarter)?;
        println!("\nWrote pivot CSV {}", path.display());
    }
    if let Some(path) = &config.export_stats {
        crate::io::export::write_stats_json(
            path,
            &run.period_counts,
            &run.describe_by_quarter,
            &run.period_quarter,
        )?;
        println!("\nWrote stats JSON {}", path.display());
    }

    Ok(())
}

pub fn analysis_config_from_args(cli: &Cli) -> AnalysisConfig {
    AnalysisConfig {
        csv_path: cli.file.clone(),
        head_rows: cli.head,
        ascii_plot: !cli.no_plot,
        plot_width: cli.width,
        plot_height: cli.height,
        charts_dir: if cli.no_charts {
            None
        } else {
            Some(cli.charts_dir.clone())
        },
        export_pivot: cli.export_pivot.clone(),
        export_stats: cli.export_stats.clone(),
    }
}
