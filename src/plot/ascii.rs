//! ASCII plotting of the monthly forecasts for terminal output.
//!
//! Fixed-size grid, deterministic output. Each city gets a marker; forecast
//! months are joined with `.` line segments and the markers drawn on top.

use crate::domain::CityResult;

/// Markers assigned to cities in order (cycled if there are more cities).
pub const MARKERS: [char; 6] = ['o', 'x', '+', '*', '#', '@'];

/// One plotted series: `(period, value)` points with a marker.
#[derive(Debug, Clone)]
pub struct PlotSeries<'a> {
    pub label: &'a str,
    pub marker: char,
    pub points: Vec<(f64, f64)>,
}

/// Collect the forecast of every city that has one, with its marker.
pub fn forecast_series(results: &[CityResult]) -> Vec<PlotSeries<'_>> {
    results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let forecast = r.forecast.as_ref()?;
            Some(PlotSeries {
                label: r.city(),
                marker: MARKERS[i % MARKERS.len()],
                points: forecast.points().into_iter().map(|(t, v)| (t as f64, v)).collect(),
            })
        })
        .collect()
}

/// Render the monthly forecasts of all cities on one grid.
pub fn render_forecast_plot(results: &[CityResult], width: usize, height: usize) -> String {
    let series = forecast_series(results);
    render_plot(&series, width, height)
}

/// Render any set of series on one grid, with a legend underneath.
pub fn render_plot(series: &[PlotSeries<'_>], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((t_min, t_max)) = range(series.iter().flat_map(|s| s.points.iter().map(|p| p.0))) else {
        return "Plot: no forecasts to draw\n".to_string();
    };
    let (y_min, y_max) = range(series.iter().flat_map(|s| s.points.iter().map(|p| p.1))).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Lines first so markers overlay them.
    for s in series {
        draw_polyline(&mut grid, &s.points, t_min, t_max, y_min, y_max);
    }
    for s in series {
        for &(t, y) in &s.points {
            let x = map_x(t, t_min, t_max, width);
            let yy = map_y(y, y_min, y_max, height);
            grid[yy][x] = s.marker;
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: month=[{t_min:.0}, {t_max:.0}] | predicted crimes=[{y_min:.1}, {y_max:.1}]\n"
    ));

    for row in grid {
        let line: String = row.into_iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let legend: Vec<String> = series.iter().map(|s| format!("{} {}", s.marker, s.label)).collect();
    out.push_str(&legend.join("  "));
    out.push('\n');

    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    if max > min {
        Some((min, max))
    } else {
        Some((min - 0.5, max + 0.5))
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
    // Larger values toward row 0.
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], t_min: f64, t_max: f64, y_min: f64, y_max: f64) {
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in points {
        let x = map_x(t, t_min, t_max, width);
        let yy = map_y(y, y_min, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '.');
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham). Only fills empty cells.
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
    use crate::domain::{CitySummary, Forecast, TimeSeries};

    fn result(city: &str, forecast: Option<Vec<f64>>) -> CityResult {
        CityResult {
            series: TimeSeries {
                city: city.to_string(),
                values: vec![],
            },
            model: None,
            forecast: forecast.map(|values| Forecast {
                start_period: 37,
                lower: values.clone(),
                upper: values.clone(),
                values,
            }),
            summary: CitySummary {
                city: city.to_string(),
                total: None,
                growth: None,
                note: None,
            },
        }
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let series = vec![
            PlotSeries {
                label: "Up",
                marker: 'o',
                points: vec![(1.0, 100.0), (10.0, 110.0)],
            },
            PlotSeries {
                label: "Flat",
                marker: 'x',
                points: vec![(1.0, 100.0), (10.0, 100.0)],
            },
        ];

        let txt = render_plot(&series, 10, 5);
        let expected = concat!(
            "Plot: month=[1, 10] | predicted crimes=[99.5, 110.5]\n",
            "        .o\n",
            "      ..\n",
            "    ..\n",
            "  ..\n",
            "x........x\n",
            "o Up  x Flat\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn cities_without_forecast_are_skipped() {
        let results = vec![
            result("A", Some(vec![1.0, 2.0, 3.0])),
            result("B", None),
            result("C", Some(vec![3.0, 2.0, 1.0])),
        ];
        let series = forecast_series(&results);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].marker, 'o');
        // Marker follows the city's position, not the filtered index.
        assert_eq!(series[1].marker, '+');
        assert_eq!(series[1].points[0], (37.0, 3.0));
    }

    #[test]
    fn empty_plot_has_placeholder() {
        let txt = render_forecast_plot(&[result("A", None)], 20, 8);
        assert_eq!(txt, "Plot: no forecasts to draw\n");
    }
}
