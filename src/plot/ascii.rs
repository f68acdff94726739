//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - quarter means: `o`
//! - connecting line: `-`
//!
//! The x axis is categorical (quarters in chronological order); quarters with
//! no price data leave a gap in the line.

use crate::domain::QuarterLabel;

/// Render mean RRP per quarter as a terminal line chart.
pub fn render_quarter_means(
    series: &[(QuarterLabel, Option<f64>)],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points: Vec<(usize, f64)> = series
        .iter()
        .enumerate()
        .filter_map(|(i, (_, mean))| mean.map(|m| (i, m)))
        .collect();

    let Some((y_min, y_max)) = value_range(&points) else {
        return "Plot: no price data to draw.\n".to_string();
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let n = series.len().max(2);

    let mut grid = vec![vec![' '; width]; height];

    // Connect consecutive data points, then overlay the point markers.
    let mut prev: Option<(usize, usize)> = None;
    for &(i, mean) in &points {
        let x = map_x(i, n, width);
        let y = map_y(mean, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        }
        prev = Some((x, y));
    }
    for &(i, mean) in &points {
        let x = map_x(i, n, width);
        let y = map_y(mean, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: mean RRP by quarter | y=[{y_min:.2}, {y_max:.2}] $/MWh\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    if let (Some((first, _)), Some((last, _))) = (series.first(), series.last()) {
        out.push_str(&format!(
            "x: {} .. {} ({} quarters)\n",
            first,
            last,
            series.len()
        ));
    }

    out
}

fn value_range(points: &[(usize, f64)]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for &(_, y) in points {
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    if min_y.is_finite() && max_y.is_finite() {
        Some((min_y, max_y))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    let width = width.max(2);
    let u = (i as f64 / (n as f64 - 1.0)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let series = vec![
            (QuarterLabel::new("Q1-22"), Some(100.0)),
            (QuarterLabel::new("Q2-22"), Some(110.0)),
        ];
        let txt = render_quarter_means(&series, 10, 5);
        let expected = concat!(
            "Plot: mean RRP by quarter | y=[99.50, 110.50] $/MWh\n",
            "        -o\n",
            "      --  \n",
            "    --    \n",
            "  --      \n",
            "o-        \n",
            "x: Q1-22 .. Q2-22 (2 quarters)\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn all_null_series_degrades_gracefully() {
        let series = vec![(QuarterLabel::new("Q1-22"), None)];
        let txt = render_quarter_means(&series, 10, 5);
        assert!(txt.contains("no price data"));
    }

    #[test]
    fn gap_quarters_do_not_break_rendering() {
        let series = vec![
            (QuarterLabel::new("Q1-22"), Some(50.0)),
            (QuarterLabel::new("Q2-22"), None),
            (QuarterLabel::new("Q3-22"), Some(60.0)),
        ];
        let txt = render_quarter_means(&series, 20, 6);
        assert!(txt.contains('o'));
    }
}
