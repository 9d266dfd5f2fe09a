//! Descriptive statistics and the KPSS stationarity test.

/// Tolerance below which a series' spread counts as zero.
const CONSTANT_EPS: f64 = 1e-12;

/// Critical value of the KPSS level-stationarity statistic at the 5% level
/// (Kwiatkowski et al., 1992, Table 1).
pub const KPSS_CRITICAL_5PCT: f64 = 0.463;

pub fn mean(x: &[f64]) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    x.iter().sum::<f64>() / x.len() as f64
}

/// True if every value equals the first (within a relative tolerance).
pub fn is_constant(x: &[f64]) -> bool {
    let Some(&first) = x.first() else {
        return true;
    };
    let scale = first.abs().max(1.0);
    x.iter().all(|v| (v - first).abs() <= CONSTANT_EPS * scale)
}

/// KPSS statistic for level stationarity.
///
/// `η = Σ S_t² / (n² · σ̂²_LR)` where `S_t` are partial sums of the demeaned
/// series and `σ̂²_LR` is the Newey–West long-run variance with
/// `l = trunc(4 (n/100)^¼)` Bartlett-weighted lags.
///
/// Returns `0.0` (stationary) when the long-run variance vanishes.
pub fn kpss_level(x: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return 0.0;
    }

    let m = mean(x);
    let resid: Vec<f64> = x.iter().map(|v| v - m).collect();

    let mut partial = 0.0;
    let mut eta = 0.0;
    for e in &resid {
        partial += e;
        eta += partial * partial;
    }
    let nf = n as f64;
    eta /= nf * nf;

    let lags = (4.0 * (nf / 100.0).powf(0.25)).trunc() as usize;
    let mut s2 = resid.iter().map(|e| e * e).sum::<f64>() / nf;
    for l in 1..=lags.min(n - 1) {
        let weight = 1.0 - l as f64 / (lags as f64 + 1.0);
        let cov: f64 = (l..n).map(|t| resid[t] * resid[t - l]).sum();
        s2 += 2.0 * weight * cov / nf;
    }

    if !(s2.is_finite() && s2 > CONSTANT_EPS) {
        return 0.0;
    }
    eta / s2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_basic() {
        assert!((mean(&[1.0, 2.0, 3.0, 4.0]) - 2.5).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
    }

    #[test]
    fn constant_detection() {
        assert!(is_constant(&[5.0; 10]));
        assert!(!is_constant(&[5.0, 5.0, 5.1]));
        assert!(is_constant(&[]));
    }

    #[test]
    fn kpss_flags_trend_but_not_mean_reverting_blocks() {
        let trend: Vec<f64> = (0..36).map(|i| 100.0 + 2.0 * i as f64).collect();
        assert!(kpss_level(&trend) > KPSS_CRITICAL_5PCT);

        // +1,+1,+1,-1,-1,-1,... : partial sums never exceed 3.
        let blocks: Vec<f64> = (0..36).map(|i| if (i / 3) % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let stat = kpss_level(&blocks);
        assert!(stat < KPSS_CRITICAL_5PCT, "stat={stat}");
    }

    #[test]
    fn kpss_of_constant_is_zero() {
        assert_eq!(kpss_level(&[3.0; 20]), 0.0);
    }
}
