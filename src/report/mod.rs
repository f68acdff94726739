//! Formatted terminal output for the analysis run.

pub mod format;
