//! ASCII plotting for terminal output.
//!
//! Intentionally "dumb" (fixed-size character grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted exponential trend: `-` line

use crate::domain::{DomainSample, FitResult, ModelKind};

/// Render one domain's observations with its exponential fit overlaid.
pub fn render_domain_plot(
    sample: &DomainSample,
    fit: Option<&FitResult>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = year_range(sample) else {
        return format!("Plot: {} (not enough year spread to plot)\n", sample.domain);
    };

    let line = fit.and_then(|f| trend_line(f, x_min, x_max, width));

    let (y_min, y_max) = value_range(sample, line.as_deref()).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the trend first so observed points overlay it.
    if let Some(line) = &line {
        draw_segments(&mut grid, line, x_min, x_max, y_min, y_max);
    }
    for obs in &sample.observations {
        let x = map_x(obs.year, x_min, x_max, width);
        let y = map_y(obs.log10_esp, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {} | year=[{x_min:.0}, {x_max:.0}] | log10(ESP)=[{y_min:.2}, {y_max:.2}]\n",
        sample.domain
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

/// Sample the fitted exponential line across the plotted year range.
fn trend_line(fit: &FitResult, x_min: f64, x_max: f64, n: usize) -> Option<Vec<(f64, f64)>> {
    if fit.model != ModelKind::Exponential {
        return None;
    }
    let intercept = fit.param("intercept")?;
    let slope = fit.param("slope")?;

    let n = n.max(2);
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let u = i as f64 / (n as f64 - 1.0);
        let x = x_min + u * (x_max - x_min);
        out.push((x, intercept + slope * x));
    }
    Some(out)
}

fn year_range(sample: &DomainSample) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for obs in &sample.observations {
        min_x = min_x.min(obs.year);
        max_x = max_x.max(obs.year);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn value_range(sample: &DomainSample, line: Option<&[(f64, f64)]>) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for obs in &sample.observations {
        min_y = min_y.min(obs.log10_esp);
        max_y = max_y.max(obs.log10_esp);
    }
    if let Some(line) = line {
        for &(_, y) in line {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if min_y.is_finite() && max_y.is_finite() && max_y > min_y {
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

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the plot.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_segments(
    grid: &mut [Vec<char>],
    line: &[(f64, f64)],
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
) {
    if line.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(x, y) in line {
        let cx = map_x(x, x_min, x_max, width);
        let cy = map_y(y, y_min, y_max, height);
        if let Some((px, py)) = prev {
            draw_line(grid, px, py, cx, cy, '-');
        } else {
            grid[cy][cx] = '-';
        }
        prev = Some((cx, cy));
    }
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
    use crate::domain::Observation;
    use std::collections::BTreeMap;

    fn sample() -> DomainSample {
        DomainSample::new(
            "maize",
            vec![
                Observation { year: 1900.0, log10_esp: 4.0 },
                Observation { year: 1950.0, log10_esp: 2.0 },
                Observation { year: 2000.0, log10_esp: 0.0 },
            ],
        )
    }

    #[test]
    fn plot_contains_points_and_header() {
        let txt = render_domain_plot(&sample(), None, 20, 8);
        assert!(txt.starts_with("Plot: maize | year=[1900, 2000]"));
        let grid_marks: usize = txt.lines().skip(1).map(|l| l.matches('o').count()).sum();
        assert_eq!(grid_marks, 3);
        // Header + 8 grid rows.
        assert_eq!(txt.lines().count(), 9);
    }

    #[test]
    fn exponential_fit_draws_a_line() {
        let mut params = BTreeMap::new();
        params.insert("intercept".to_string(), 80.0);
        params.insert("slope".to_string(), -0.04);
        let fit = FitResult {
            domain: "maize".to_string(),
            model: ModelKind::Exponential,
            n: 3,
            params,
            ci_low: BTreeMap::new(),
            ci_high: BTreeMap::new(),
            r2: Some(1.0),
            aic: None,
            bic: None,
            notes: String::new(),
        };

        let txt = render_domain_plot(&sample(), Some(&fit), 30, 10);
        assert!(txt.contains('-'));
    }

    #[test]
    fn degenerate_year_range_is_reported() {
        let flat = DomainSample::new(
            "flat",
            vec![
                Observation { year: 2000.0, log10_esp: 1.0 },
                Observation { year: 2000.0, log10_esp: 2.0 },
            ],
        );
        let txt = render_domain_plot(&flat, None, 20, 8);
        assert!(txt.contains("not enough year spread"));
    }
}
