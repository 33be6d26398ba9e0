//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Two charts are supported:
//! - trend: one line per entity over the year columns, one glyph per entity
//! - scatter: held-out predictions (`o`) and the actual values (`+`) against the actual values

use crate::domain::TrendSeries;

/// Glyphs assigned to trend series, in order (cycled when exhausted).
const SERIES_GLYPHS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Glyph used for series number `idx`.
pub fn series_glyph(idx: usize) -> char {
    let glyphs: Vec<char> = SERIES_GLYPHS.chars().collect();
    glyphs[idx % glyphs.len()]
}

/// Render the multi-series trend chart.
///
/// `years` fixes the x axis (categorical, evenly spaced). Missing values break
/// the line of their series.
pub fn render_trend_plot(
    series: &[TrendSeries],
    years: &[String],
    title: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let values = series
        .iter()
        .flat_map(|s| s.points.iter().filter_map(|(_, v)| *v));
    let (y_min, y_max) = value_range(values).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let x_max = years.len().saturating_sub(1).max(1) as f64;

    let mut grid = vec![vec![' '; width]; height];

    for (idx, s) in series.iter().enumerate() {
        let glyph = series_glyph(idx);
        let cells: Vec<Option<(usize, usize)>> = s
            .points
            .iter()
            .map(|(year, v)| {
                let x = years.iter().position(|y| y == year)? as f64;
                let v = (*v)?;
                Some((map_x(x, 0.0, x_max, width), map_y(v, y_min, y_max, height)))
            })
            .collect();

        // Lines first, so markers can overlay.
        for pair in cells.windows(2) {
            if let [Some((x0, y0)), Some((x1, y1))] = pair {
                draw_line(&mut grid, *x0, *y0, *x1, *y1, glyph);
            }
        }
        for &(x, y) in cells.iter().flatten() {
            grid[y][x] = glyph;
        }
    }

    let first = years.first().map(String::as_str).unwrap_or("-");
    let last = years.last().map(String::as_str).unwrap_or("-");

    let mut out = String::new();
    out.push_str(&format!("{title}\n"));
    out.push_str(&format!(
        "x=year [{first} .. {last}] | y=production [{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str(&legend(series, width));
    out
}

/// Render predicted vs actual values of the held-out rows.
pub fn render_scatter_plot(actual: &[f64], predicted: &[f64], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (x_min, x_max) = value_range(actual.iter().copied()).unwrap_or((0.0, 1.0));
    let (x_min, x_max) = pad_range(x_min, x_max, 0.05);
    let (y_min, y_max) =
        value_range(actual.iter().chain(predicted).copied()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for &a in actual {
        if a.is_finite() {
            grid[map_y(a, y_min, y_max, height)][map_x(a, x_min, x_max, width)] = '+';
        }
    }
    for (&a, &p) in actual.iter().zip(predicted) {
        if a.is_finite() && p.is_finite() {
            grid[map_y(p, y_min, y_max, height)][map_x(a, x_min, x_max, width)] = 'o';
        }
    }

    let mut out = String::new();
    out.push_str("Predicted vs Actual\n");
    out.push_str(&format!(
        "x=actual [{x_min:.2}, {x_max:.2}] | y=predicted [{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out.push_str("o predicted  + actual\n");
    out
}

fn legend(series: &[TrendSeries], width: usize) -> String {
    let mut out = String::new();
    let mut line = String::new();
    for (idx, s) in series.iter().enumerate() {
        let entry = format!("{} {}", series_glyph(idx), s.entity);
        if !line.is_empty() && line.chars().count() + 2 + entry.chars().count() > width {
            out.push_str(&line);
            out.push('\n');
            line.clear();
        }
        if !line.is_empty() {
            line.push_str("  ");
        }
        line.push_str(&entry);
    }
    if !line.is_empty() {
        out.push_str(&line);
        out.push('\n');
    }
    out
}

/// Min/max of the finite values; a single distinct value is widened to a unit span.
fn value_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if !(min_v.is_finite() && max_v.is_finite()) {
        return None;
    }
    if max_v > min_v {
        Some((min_v, max_v))
    } else {
        Some((min_v - 0.5, max_v + 0.5))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish). Only blank cells are written.
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
