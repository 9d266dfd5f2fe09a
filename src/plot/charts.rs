//! SVG charts rendered with Plotters.
//!
//! Two files are produced:
//! - a 2x2 comparison of predicted totals (pie, bar, histogram, line)
//! - monthly forecast trajectories, one line per city
//!
//! Data preparation is kept outside the draw calls so it can be tested
//! without touching the filesystem.

use std::error::Error;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::element::Pie;
use plotters::prelude::*;

use crate::domain::CityResult;
use crate::error::ChartError;

pub const COMPARISON_FILE: &str = "predicted_crimes_comparison.svg";
pub const MONTHLY_FILE: &str = "monthly_predicted_crimes.svg";

pub const COMPARISON_TITLE: &str = "Predicted Crime Comparison Across Cities";
pub const MONTHLY_TITLE: &str = "Monthly Predicted Crimes (Next 12 Months)";

/// Number of histogram bins for the distribution of totals.
pub const HISTOGRAM_BINS: usize = 6;

const PALETTE: [RGBColor; 6] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
];
const BAR_COLOR: RGBColor = RGBColor(135, 206, 235);
const HIST_COLOR: RGBColor = RGBColor(240, 128, 128);
const LINE_COLOR: RGBColor = RGBColor(128, 0, 128);

/// One histogram bin: `[lo, hi)` (the last bin is closed) and its count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

/// `(city, total)` for every city with a forecast, in city order.
pub fn totals_by_city(results: &[CityResult]) -> Vec<(&str, f64)> {
    results
        .iter()
        .filter_map(|r| r.summary.total.map(|t| (r.city(), t)))
        .collect()
}

/// Equal-width bins spanning `[min, max]` of `values`.
///
/// A degenerate range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut out: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            lo: lo + width * i as f64,
            hi: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Render both chart files into `out_dir`; returns the written paths.
pub fn render_charts(results: &[CityResult], out_dir: &Path, size: (u32, u32)) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(out_dir).map_err(|e| chart_error(out_dir, Box::new(e)))?;

    let comparison = out_dir.join(COMPARISON_FILE);
    draw_comparison(results, &comparison, size).map_err(|e| chart_error(&comparison, e))?;

    let monthly = out_dir.join(MONTHLY_FILE);
    draw_monthly(results, &monthly, (size.0, size.1 / 2)).map_err(|e| chart_error(&monthly, e))?;

    Ok(vec![comparison, monthly])
}

fn chart_error(path: &Path, err: Box<dyn Error>) -> ChartError {
    ChartError {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn draw_comparison(results: &[CityResult], path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let totals = totals_by_city(results);
    if totals.is_empty() {
        return Err("no city has a predicted total".into());
    }

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(COMPARISON_TITLE, ("sans-serif", 28))?;
    let panels = root.split_evenly((2, 2));

    draw_pie(&panels[0], &totals)?;
    draw_bar(&panels[1], &totals)?;
    draw_histogram(&panels[2], &totals)?;
    draw_line(&panels[3], &totals)?;

    root.present()?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, totals: &[(&str, f64)]) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let area = area.titled("Pie Chart", ("sans-serif", 20))?;
    // Pie slices need positive sizes.
    let slices: Vec<(&str, f64)> = totals.iter().copied().filter(|(_, t)| *t > 0.0).collect();
    if slices.is_empty() {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let sizes: Vec<f64> = slices.iter().map(|(_, t)| *t).collect();
    let colors: Vec<RGBColor> = (0..slices.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
    let labels: Vec<String> = slices.iter().map(|(c, _)| c.to_string()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(140.0);
    pie.label_style(("sans-serif", 14).into_font());
    pie.percentages(("sans-serif", 12).into_font().color(&WHITE));
    area.draw(&pie)?;
    Ok(())
}

fn draw_bar<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, totals: &[(&str, f64)]) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let y_max = totals.iter().map(|(_, t)| *t).fold(0.0, f64::max) * 1.1;
    let mut chart = index_chart(area, "Bar Chart", totals.len(), 0.0..y_max.max(1.0))?;
    configure_city_mesh(&mut chart, totals)?;

    chart.draw_series(totals.iter().enumerate().map(|(i, (_, t))| {
        let x = i as f64;
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *t)], BAR_COLOR.filled())
    }))?;
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    totals: &[(&str, f64)],
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let values: Vec<f64> = totals.iter().map(|(_, t)| *t).collect();
    let bins = histogram_bins(&values, HISTOGRAM_BINS);
    let (Some(first), Some(last)) = (bins.first(), bins.last()) else {
        return Ok(());
    };
    let max_count = bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);

    let mut chart = ChartBuilder::on(area)
        .caption("Histogram", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(first.lo..last.hi, 0.0..(max_count as f64 + 0.5))?;
    chart
        .configure_mesh()
        .x_desc("Total Predicted Crimes")
        .y_desc("Cities")
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], HIST_COLOR.filled())
    }))?;
    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.lo, 0.0), (b.hi, b.count as f64)], BLACK.stroke_width(1))),
    )?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, totals: &[(&str, f64)]) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let lo = totals.iter().map(|(_, t)| *t).fold(f64::INFINITY, f64::min);
    let hi = totals.iter().map(|(_, t)| *t).fold(f64::NEG_INFINITY, f64::max);
    let pad = ((hi - lo) * 0.1).max(1.0);
    let mut chart = index_chart(area, "Line Plot", totals.len(), (lo - pad)..(hi + pad))?;
    configure_city_mesh(&mut chart, totals)?;

    let points: Vec<(f64, f64)> = totals.iter().enumerate().map(|(i, (_, t))| (i as f64, *t)).collect();
    chart.draw_series(LineSeries::new(points.iter().copied(), &LINE_COLOR))?;
    chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, LINE_COLOR.filled())))?;
    Ok(())
}

/// Cartesian chart whose x axis is the city index.
fn index_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    caption: &str,
    n: usize,
    y: std::ops::Range<f64>,
) -> Result<ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>, Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(n as f64 - 0.5), y)?;
    Ok(chart)
}

fn configure_city_mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    totals: &[(&str, f64)],
) -> Result<(), Box<dyn Error>>
where
    DB::ErrorType: 'static,
{
    let city_label = |v: &f64| {
        let i = v.round();
        if (v - i).abs() > 1e-6 || i < 0.0 {
            return String::new();
        }
        totals.get(i as usize).map(|(c, _)| c.to_string()).unwrap_or_default()
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(totals.len() + 1)
        .x_label_formatter(&city_label)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;
    Ok(())
}

fn draw_monthly(results: &[CityResult], path: &Path, size: (u32, u32)) -> Result<(), Box<dyn Error>> {
    let series: Vec<(usize, &str, Vec<(f64, f64)>)> = results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| {
            let f = r.forecast.as_ref()?;
            Some((i, r.city(), f.points().into_iter().map(|(t, v)| (t as f64, v)).collect()))
        })
        .collect();
    if series.is_empty() {
        return Err("no city has a forecast".into());
    }

    let all = series.iter().flat_map(|(_, _, p)| p.iter());
    let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in all {
        x_lo = x_lo.min(x);
        x_hi = x_hi.max(x);
        y_lo = y_lo.min(y);
        y_hi = y_hi.max(y);
    }
    let y_pad = ((y_hi - y_lo) * 0.05).max(1.0);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(MONTHLY_TITLE, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_lo - 0.5)..(x_hi + 0.5), (y_lo - y_pad)..(y_hi + y_pad))?;

    chart
        .configure_mesh()
        .x_desc("Month")
        .y_desc("Predicted Crimes")
        .x_label_formatter(&|v| format!("{v:.0}"))
        .y_label_formatter(&|v| format!("{v:.0}"))
        .draw()?;

    for (i, city, points) in &series {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(*city)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 3, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CitySummary, Forecast, TimeSeries};
    use tempfile::tempdir;

    fn result(city: &str, total: Option<f64>) -> CityResult {
        let forecast = total.map(|t| {
            let values: Vec<f64> = (0..12).map(|i| t / 12.0 + i as f64 - 5.5).collect();
            Forecast {
                start_period: 37,
                lower: values.iter().map(|v| v - 5.0).collect(),
                upper: values.iter().map(|v| v + 5.0).collect(),
                values,
            }
        });
        CityResult {
            series: TimeSeries {
                city: city.to_string(),
                values: vec![],
            },
            model: None,
            forecast,
            summary: CitySummary {
                city: city.to_string(),
                total,
                growth: None,
                note: None,
            },
        }
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [1000.0, 1100.0, 1200.0, 1300.0, 1400.0, 1600.0];
        let bins = histogram_bins(&values, 6);
        assert_eq!(bins.len(), 6);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert!((bins[0].lo - 1000.0).abs() < 1e-9);
        assert!((bins[5].hi - 1600.0).abs() < 1e-9);
        // Max lands in the closed last bin.
        assert_eq!(bins[5].count, 1);
        assert_eq!(bins[0].count, 1);
    }

    #[test]
    fn histogram_of_identical_values_is_widened() {
        let bins = histogram_bins(&[5.0, 5.0], 6);
        assert!((bins[0].lo - 4.5).abs() < 1e-12);
        assert!((bins[5].hi - 5.5).abs() < 1e-12);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(histogram_bins(&[], 6).is_empty());
    }

    #[test]
    fn totals_skip_unavailable_cities() {
        let results = vec![result("A", Some(1200.0)), result("B", None), result("C", Some(2400.0))];
        assert_eq!(totals_by_city(&results), vec![("A", 1200.0), ("C", 2400.0)]);
    }

    #[test]
    fn renders_both_svg_files() {
        let dir = tempdir().unwrap();
        let results = vec![
            result("Ballari", Some(2200.0)),
            result("Bengaluru", Some(5600.0)),
            result("Flat", None),
        ];
        let paths = render_charts(&results, dir.path(), (1200, 900)).unwrap();
        assert_eq!(paths.len(), 2);
        for p in &paths {
            let svg = std::fs::read_to_string(p).unwrap();
            assert!(svg.contains("<svg"));
        }
    }

    #[test]
    fn nothing_to_chart_is_an_error() {
        let dir = tempdir().unwrap();
        let err = render_charts(&[result("Flat", None)], dir.path(), (800, 600)).unwrap_err();
        assert!(err.path.ends_with(COMPARISON_FILE));
    }
}
