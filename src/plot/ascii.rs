//! ASCII plotting of the maturity curve for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - projected points: `o`
//! - step-after line: `-` (hold) and `|` (rise)

use crate::domain::MaturityPoint;
use crate::engine::step_after;

/// Headroom above the 28-day value.
const TOP_PAD: f64 = 0.05;

/// Render the maturity projection. The y-axis always starts at 0 MPa.
pub fn render_maturity_plot(points: &[MaturityPoint], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (d_min, d_max) = day_range(points).unwrap_or((3.0, 28.0));
    let y_max = points.iter().map(|p| p.fc).fold(f64::NEG_INFINITY, f64::max);
    let y_max = if y_max.is_finite() && y_max > 0.0 { y_max * (1.0 + TOP_PAD) } else { 1.0 };
    let y_min = 0.0;

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first (so points can overlay).
    let line = step_after(points);
    let mut prev: Option<(usize, usize)> = None;
    for &(d, y) in &line {
        let x = map_x(d, d_min, d_max, width);
        let yy = map_y(y, y_min, y_max, height);
        match prev {
            Some((x0, y0)) => {
                let ch = if x0 == x { '|' } else { '-' };
                draw_line(&mut grid, x0, y0, x, yy, ch);
            }
            None => grid[yy][x] = '-',
        }
        prev = Some((x, yy));
    }

    for p in points {
        let x = map_x(f64::from(p.day), d_min, d_max, width);
        let y = map_y(p.fc, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Maturity: day=[{d_min:.0}, {d_max:.0}] | f'c=[{y_min:.2}, {y_max:.2}] MPa\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn day_range(points: &[MaturityPoint]) -> Option<(f64, f64)> {
    let min_d = points.iter().map(|p| p.day).min()?;
    let max_d = points.iter().map(|p| p.day).max()?;
    if max_d > min_d {
        Some((f64::from(min_d), f64::from(max_d)))
    } else {
        None
    }
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

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
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
    use crate::engine::maturity_curve;

    #[test]
    fn plot_golden_snapshot_small() {
        let txt = render_maturity_plot(&maturity_curve(10.0), 10, 5);
        let expected = concat!(
            "Maturity: day=[3, 28] | f'c=[0.00, 10.50] MPa\n",
            "         o\n",
            " o--o-----\n",
            "o-        \n",
            "          \n",
            "          \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_handles_empty_input() {
        let txt = render_maturity_plot(&[], 20, 6);
        assert_eq!(txt.lines().count(), 7);
        assert!(txt.starts_with("Maturity: day=[3, 28]"));
    }
}
