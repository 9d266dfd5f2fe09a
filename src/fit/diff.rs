//! Differencing, integration and the choice of differencing order.

use crate::math::{KPSS_CRITICAL_5PCT, is_constant, kpss_level};

/// Apply first differences `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut out = series.to_vec();
    for _ in 0..d {
        if out.len() <= 1 {
            return Vec::new();
        }
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Last value of the series at each differencing level `0..d`.
///
/// `tails[k]` is the final element of `difference(series, k)`; these are the
/// starting points needed to undo `d` rounds of differencing.
pub fn diff_tails(series: &[f64], d: usize) -> Vec<f64> {
    let mut tails = Vec::with_capacity(d);
    let mut level = series.to_vec();
    for _ in 0..d {
        tails.push(level.last().copied().unwrap_or(0.0));
        level = difference(&level, 1);
    }
    tails
}

/// Undo differencing of a forecast made on the `tails.len()`-times differenced
/// scale, continuing from the observed tails.
pub fn integrate(forecast_diff: &[f64], tails: &[f64]) -> Vec<f64> {
    let mut out = forecast_diff.to_vec();
    for &start in tails.iter().rev() {
        let mut acc = start;
        for v in out.iter_mut() {
            acc += *v;
            *v = acc;
        }
    }
    out
}

/// Number of first differences needed for level stationarity.
///
/// Differences while the KPSS statistic exceeds its 5% critical value, up to
/// `max_d` times. A (differenced) series with no variation is stationary.
pub fn ndiffs(series: &[f64], max_d: usize) -> usize {
    let mut d = 0;
    let mut level = series.to_vec();
    while d < max_d {
        if level.len() < 3 || is_constant(&level) || kpss_level(&level) <= KPSS_CRITICAL_5PCT {
            break;
        }
        level = difference(&level, 1);
        d += 1;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difference_orders() {
        let series = [1.0, 3.0, 6.0, 10.0, 15.0];
        assert_eq!(difference(&series, 0), series.to_vec());
        assert_eq!(difference(&series, 1), vec![2.0, 3.0, 4.0, 5.0]);
        assert_eq!(difference(&series, 2), vec![1.0, 1.0, 1.0]);
        assert!(difference(&[1.0], 1).is_empty());
    }

    #[test]
    fn integrate_continues_from_tails() {
        let series = [10.0, 12.0, 15.0, 19.0, 24.0];
        let tails = diff_tails(&series, 1);
        assert_eq!(tails, vec![24.0]);
        assert_eq!(integrate(&[6.0, 7.0], &tails), vec![30.0, 37.0]);
    }

    #[test]
    fn integrate_second_order() {
        // Quadratic: second differences are constant 1.
        let series = [1.0, 3.0, 6.0, 10.0, 15.0];
        let tails = diff_tails(&series, 2);
        assert_eq!(tails, vec![15.0, 5.0]);
        // Next first differences 6, 7 -> values 21, 28.
        assert_eq!(integrate(&[1.0, 1.0], &tails), vec![21.0, 28.0]);
    }

    #[test]
    fn ndiffs_linear_trend_needs_one() {
        let series: Vec<f64> = (0..36).map(|i| 100.0 + 2.0 * i as f64).collect();
        assert_eq!(ndiffs(&series, 2), 1);
    }

    #[test]
    fn ndiffs_respects_max_d() {
        let series: Vec<f64> = (0..36).map(|i| 100.0 + 2.0 * i as f64).collect();
        assert_eq!(ndiffs(&series, 0), 0);
    }

    #[test]
    fn ndiffs_constant_needs_none() {
        assert_eq!(ndiffs(&[7.0; 36], 2), 0);
    }
}
