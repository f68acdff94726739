//! Chart rendering: terminal ASCII plot + SVG figures.

pub mod ascii;
pub mod charts;

pub use ascii::render_quarter_means;
