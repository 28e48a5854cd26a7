//! ASCII chart of the smoothed sales series.
//!
//! Retail is drawn with `R`, wholesale with `W`; where both land on the same
//! cell retail wins. The x axis is the record index (weeks are evenly spaced),
//! the y axis spans both series with a small pad.

use crate::analytics::SmoothedSeries;

/// Render the smoothed series into a `width` x `height` character grid with a
/// one-line header.
pub fn render_ascii_chart(series: &SmoothedSeries, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    if series.is_empty() {
        return "Plot: no sales data\n".to_string();
    }

    let (y_min, y_max) = series.value_range().unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);
    let n = series.len();

    let mut grid = vec![vec![' '; width]; height];

    // Wholesale first so retail overlays it.
    draw_series(&mut grid, &series.wholesale, n, y_min, y_max, 'W');
    draw_series(&mut grid, &series.retail, n, y_min, y_max, 'R');

    let first = series.labels.first().map(String::as_str).unwrap_or("-");
    let last = series.labels.last().map(String::as_str).unwrap_or("-");

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {first}..{last} | window={} | y=[{y_min:.2}, {y_max:.2}]\n",
        series.window
    ));

    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    out
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(i: usize, n: usize, width: usize) -> usize {
    if n < 2 {
        return 0;
    }
    let u = i as f64 / (n as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_series(grid: &mut [Vec<char>], values: &[f64], n: usize, y_min: f64, y_max: f64, ch: char) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for (i, &v) in values.iter().enumerate() {
        let x = map_x(i, n, width);
        let y = map_y(v, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, ch);
        } else {
            grid[y][x] = ch;
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish). Overwrites existing cells.
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
        if y0 >= 0 && (y0 as usize) < grid.len() && x0 >= 0 && (x0 as usize) < grid[0].len() {
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
        let series = SmoothedSeries {
            labels: vec!["2017-01-01".to_string(), "2017-01-08".to_string()],
            retail: vec![100.0, 110.0],
            wholesale: vec![100.0, 100.0],
            window: 4,
        };

        let txt = render_ascii_chart(&series, 10, 5);
        let expected = concat!(
            "Plot: 2017-01-01..2017-01-08 | window=4 | y=[99.50, 110.50]\n",
            "        RR\n",
            "      RR\n",
            "    RR\n",
            "  RR\n",
            "RRWWWWWWWW\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn empty_series_says_so() {
        let series = SmoothedSeries {
            labels: Vec::new(),
            retail: Vec::new(),
            wholesale: Vec::new(),
            window: 4,
        };
        assert_eq!(render_ascii_chart(&series, 40, 10), "Plot: no sales data\n");
    }
}
