//! Low-level fitting routines for a single ARIMA order.
//!
//! Given a series and an order `(p, d, q)` with or without a constant, we:
//! - difference the series `d` times (`w_t`)
//! - estimate innovations with a long autoregression (only when `q > 0`)
//! - regress `w_t` on `[1, w_{t-1..t-p}, ê_{t-1..t-q}]` (Hannan–Rissanen)
//! - recompute residuals recursively with the fitted coefficients (CSS)
//! - score the fit with the configured information criterion
//!
//! Scores are only comparable between fits that share a scoring window, so
//! callers pass the number of leading observations to condition on. The
//! search uses the largest admissible `p` for every candidate at a given `d`.
//!
//! Every step is a closed-form least squares solve, so the fit is
//! deterministic and cheap enough to evaluate dozens of orders per city.

use serde::{Deserialize, Serialize};

use crate::domain::{Forecast, InfoCriterion, ModelDescription};
use crate::fit::diff::{diff_tails, difference, integrate};
use crate::math::{integrated_ar, max_inverse_root, mean, psi_weights, regress};
use crate::models::{FittedModel, arma_predict};

/// Residual variance floor, relative to the mean square of the differenced
/// series. Keeps exact fits (noise-free trends) finitely scored.
const SIGMA2_FLOOR_REL: f64 = 1e-10;

/// AR and MA polynomial roots must lie at least this far outside the unit circle.
const MIN_ROOT_MODULUS: f64 = 1.01;

/// Rows required beyond the number of regression coefficients.
const MIN_DOF: usize = 3;

/// Two-sided 95% standard normal quantile.
const Z_95: f64 = 1.959_963_984_540_054;

/// A non-seasonal ARIMA order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
    /// Mean (d = 0) or drift (d = 1) term.
    pub constant: bool,
}

impl ArimaOrder {
    pub fn new(p: usize, d: usize, q: usize, constant: bool) -> Self {
        Self { p, d, q, constant }
    }

    /// Estimated parameters, including the innovation variance.
    pub fn param_count(&self) -> usize {
        self.p + self.q + usize::from(self.constant) + 1
    }

    pub fn label(&self) -> String {
        let base = format!("ARIMA({},{},{})", self.p, self.d, self.q);
        match (self.constant, self.d) {
            (false, _) => base,
            (true, 0) => format!("{base} with non-zero mean"),
            (true, 1) => format!("{base} with drift"),
            (true, _) => format!("{base} with constant"),
        }
    }
}

/// A fitted ARIMA model.
#[derive(Debug, Clone)]
pub struct FittedArima {
    pub order: ArimaOrder,
    pub intercept: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub sigma2: f64,
    pub loglik: f64,
    pub criterion: InfoCriterion,
    pub score: f64,
    /// Length of the original (undifferenced) series.
    pub n_obs: usize,
    /// Number of orders evaluated by the search that produced this fit.
    pub candidates_tried: usize,
    differenced: Vec<f64>,
    residuals: Vec<f64>,
    tails: Vec<f64>,
}

/// Fit one order, scoring it on the differenced observations after the first
/// `cond` (raised to `p` when smaller).
///
/// Returns `None` when the order is not estimable on this series or the
/// estimate is non-stationary / non-invertible.
pub fn fit_order(
    series: &[f64],
    order: ArimaOrder,
    criterion: InfoCriterion,
    cond: usize,
) -> Option<FittedArima> {
    let ArimaOrder { p, d, q, constant } = order;
    let cond = cond.max(p);

    let w = difference(series, d);
    let n = w.len();
    let k_reg = p + q + usize::from(constant);

    let (innovations, start) = if q > 0 {
        let m = long_ar_order(n, p, q);
        (long_ar_residuals(&w, m)?, (m + q).max(p))
    } else {
        (vec![0.0; n], p)
    };

    if n < start.max(cond) + k_reg + MIN_DOF {
        return None;
    }

    let coeffs = if k_reg == 0 {
        Vec::new()
    } else {
        let rows: Vec<Vec<f64>> = (start..n)
            .map(|t| {
                let mut row = Vec::with_capacity(k_reg);
                if constant {
                    row.push(1.0);
                }
                row.extend((1..=p).map(|i| w[t - i]));
                row.extend((1..=q).map(|j| innovations[t - j]));
                row
            })
            .collect();
        regress(&rows, &w[start..])?
    };

    let (intercept, rest) = if constant {
        (coeffs[0], &coeffs[1..])
    } else {
        (0.0, &coeffs[..])
    };
    let ar = rest[..p].to_vec();
    let ma = rest[p..].to_vec();

    // Stationary AR, invertible MA.
    let limit = 1.0 / MIN_ROOT_MODULUS;
    if max_inverse_root(&ar) >= limit {
        return None;
    }
    let neg_ma: Vec<f64> = ma.iter().map(|t| -t).collect();
    if max_inverse_root(&neg_ma) >= limit {
        return None;
    }

    // Residuals run from the first fully-lagged observation; the conditional
    // sum of squares only covers the shared window.
    let mut residuals = vec![0.0; n];
    for t in p..n {
        residuals[t] = w[t] - arma_predict(intercept, &ar, &ma, &w, &residuals, t);
    }
    let n_used = n - cond;
    let css: f64 = residuals[cond..].iter().map(|r| r * r).sum();

    let scale = mean(&w.iter().map(|v| v * v).collect::<Vec<_>>()).max(1.0);
    let sigma2 = (css / n_used as f64).max(SIGMA2_FLOOR_REL * scale);
    let loglik = -0.5 * n_used as f64 * (1.0 + (2.0 * std::f64::consts::PI).ln() + sigma2.ln());
    let score = criterion.score(loglik, order.param_count(), n_used);
    if !score.is_finite() {
        return None;
    }

    Some(FittedArima {
        order,
        intercept,
        ar,
        ma,
        sigma2,
        loglik,
        criterion,
        score,
        n_obs: series.len(),
        candidates_tried: 1,
        differenced: w,
        residuals,
        tails: diff_tails(series, d),
    })
}

/// Order of the long autoregression used to estimate innovations.
fn long_ar_order(n: usize, p: usize, q: usize) -> usize {
    let by_len = (n as f64).ln().ceil() as usize;
    (p + q + 2).max(by_len).min(n / 3).max(1)
}

/// Residuals of an AR(m) with intercept fitted by least squares; zero for the
/// first `m` positions.
fn long_ar_residuals(w: &[f64], m: usize) -> Option<Vec<f64>> {
    let n = w.len();
    if n < 2 * m + 1 + MIN_DOF {
        return None;
    }

    let rows: Vec<Vec<f64>> = (m..n)
        .map(|t| {
            let mut row = Vec::with_capacity(m + 1);
            row.push(1.0);
            row.extend((1..=m).map(|i| w[t - i]));
            row
        })
        .collect();
    let beta = regress(&rows, &w[m..])?;

    let mut e = vec![0.0; n];
    for (t, row) in (m..n).zip(&rows) {
        let fitted: f64 = row.iter().zip(&beta).map(|(x, b)| x * b).sum();
        e[t] = w[t] - fitted;
    }
    Some(e)
}

impl FittedModel for FittedArima {
    fn forecast(&self, horizon: usize) -> Forecast {
        let n = self.differenced.len();
        let mut w = self.differenced.clone();
        let mut e = self.residuals.clone();

        // Future innovations have zero expectation.
        for t in n..n + horizon {
            let pred = arma_predict(self.intercept, &self.ar, &self.ma, &w, &e, t);
            w.push(pred);
            e.push(0.0);
        }
        let values = integrate(&w[n..], &self.tails);

        let psi = psi_weights(&integrated_ar(&self.ar, self.order.d), &self.ma, horizon);
        let sigma = self.sigma2.sqrt();
        let mut lower = Vec::with_capacity(horizon);
        let mut upper = Vec::with_capacity(horizon);
        let mut acc = 0.0;
        for (v, psi_j) in values.iter().zip(&psi) {
            acc += psi_j * psi_j;
            let half = Z_95 * sigma * acc.sqrt();
            lower.push(v - half);
            upper.push(v + half);
        }

        Forecast {
            start_period: self.n_obs + 1,
            values,
            lower,
            upper,
        }
    }

    fn describe(&self) -> ModelDescription {
        let mut coefficients = Vec::with_capacity(self.order.param_count());
        if self.order.constant {
            coefficients.push(self.intercept);
        }
        coefficients.extend(&self.ar);
        coefficients.extend(&self.ma);

        ModelDescription {
            label: self.order.label(),
            criterion: self.criterion,
            score: self.score,
            sigma2: self.sigma2,
            coefficients,
            candidates_tried: self.candidates_tried,
        }
    }
}
