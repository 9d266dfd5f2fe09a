//! Automatic ARIMA order selection.
//!
//! The search:
//! 1. Rejects series that cannot support any model (too short, non-finite, constant)
//! 2. Chooses the differencing order `d` with repeated KPSS tests
//! 3. Evaluates candidate `(p, q, constant)` orders, either stepwise from a few
//!    starting points or exhaustively, within a fixed fit budget
//! 4. Keeps the candidate with the lowest information criterion
//!
//! Candidates within one round are fitted in parallel; ties are broken by
//! candidate order, so the selected model does not depend on thread timing.

use std::collections::HashSet;

use rayon::prelude::*;

use crate::domain::{SearchConfig, SearchMode};
use crate::error::ModelFitError;
use crate::fit::diff::ndiffs;
use crate::fit::fitter::{ArimaOrder, FittedArima, fit_order};
use crate::fit::order_grid::{OrderLimits, exhaustive_grid, neighbours, stepwise_start};
use crate::math::is_constant;
use crate::models::Fittable;

/// Shortest series the search will attempt.
pub const MIN_SERIES_LEN: usize = 10;

/// Output of an order search.
#[derive(Debug, Clone)]
pub struct OrderSearch {
    pub best: FittedArima,
    /// Differencing order chosen before the search.
    pub d: usize,
    /// Every evaluated order with its score (`None` if rejected), in evaluation order.
    pub evaluated: Vec<(ArimaOrder, Option<f64>)>,
}

/// Non-seasonal automatic ARIMA.
#[derive(Debug, Clone, Default)]
pub struct AutoArima {
    config: SearchConfig,
}

impl AutoArima {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Run the full search and return the best fit plus diagnostics.
    pub fn search(&self, series: &[f64]) -> Result<OrderSearch, ModelFitError> {
        validate_series(series)?;

        let d = ndiffs(series, self.config.max_d);
        let limits = OrderLimits::new(&self.config, d);

        let mut evaluated = Vec::new();
        let best = match self.config.mode {
            SearchMode::Stepwise => self.stepwise(series, &limits, &mut evaluated),
            SearchMode::Exhaustive => {
                let mut grid = exhaustive_grid(&limits);
                grid.truncate(self.config.max_models);
                self.evaluate_round(series, &grid, &limits, &mut evaluated)
            }
        };

        let Some(mut best) = best else {
            return Err(ModelFitError::NoAdmissibleModel {
                tried: evaluated.len(),
            });
        };
        best.candidates_tried = evaluated.len();

        log::debug!(
            "selected {} ({}={:.3}) after {} candidates",
            best.order.label(),
            best.criterion.display_name(),
            best.score,
            evaluated.len()
        );

        Ok(OrderSearch { best, d, evaluated })
    }

    fn stepwise(
        &self,
        series: &[f64],
        limits: &OrderLimits,
        evaluated: &mut Vec<(ArimaOrder, Option<f64>)>,
    ) -> Option<FittedArima> {
        let mut visited = HashSet::new();

        let start = self.take_unvisited(stepwise_start(limits), &mut visited, evaluated.len());
        let mut best = self.evaluate_round(series, &start, limits, evaluated);

        loop {
            let (order, score) = match &best {
                Some(b) => (b.order, b.score),
                None => break,
            };

            let round = self.take_unvisited(neighbours(order, limits), &mut visited, evaluated.len());
            if round.is_empty() {
                break;
            }

            match self.evaluate_round(series, &round, limits, evaluated) {
                Some(candidate) if candidate.score < score => best = Some(candidate),
                _ => break,
            }
        }

        best
    }

    /// Drop already-evaluated orders and cap the round at the remaining budget.
    fn take_unvisited(
        &self,
        orders: Vec<ArimaOrder>,
        visited: &mut HashSet<ArimaOrder>,
        used: usize,
    ) -> Vec<ArimaOrder> {
        let remaining = self.config.max_models.saturating_sub(used);
        let round: Vec<ArimaOrder> = orders
            .into_iter()
            .filter(|o| !visited.contains(o))
            .take(remaining)
            .collect();
        visited.extend(round.iter().copied());
        round
    }

    /// Fit every order in parallel and return the lowest-scoring fit.
    fn evaluate_round(
        &self,
        series: &[f64],
        orders: &[ArimaOrder],
        limits: &OrderLimits,
        evaluated: &mut Vec<(ArimaOrder, Option<f64>)>,
    ) -> Option<FittedArima> {
        let criterion = self.config.criterion;
        let cond = limits.scoring_offset();
        let fits: Vec<Option<FittedArima>> = orders
            .par_iter()
            .map(|&order| fit_order(series, order, criterion, cond))
            .collect();

        // Deterministic selection: strict improvement only, so ties keep the earlier candidate.
        let mut best: Option<FittedArima> = None;
        for (order, fit) in orders.iter().zip(fits) {
            evaluated.push((*order, fit.as_ref().map(|f| f.score)));
            match &fit {
                Some(f) => log::debug!("  {:<32} {}={:.3}", order.label(), criterion.display_name(), f.score),
                None => log::debug!("  {:<32} rejected", order.label()),
            }

            let Some(fit) = fit else { continue };
            let better = match &best {
                Some(b) => fit.score < b.score,
                None => true,
            };
            if better {
                best = Some(fit);
            }
        }
        best
    }
}

impl Fittable for AutoArima {
    type Fitted = FittedArima;

    fn fit(&self, series: &[f64]) -> Result<FittedArima, ModelFitError> {
        self.search(series).map(|s| s.best)
    }
}

fn validate_series(series: &[f64]) -> Result<(), ModelFitError> {
    if series.len() < MIN_SERIES_LEN {
        return Err(ModelFitError::InsufficientData {
            needed: MIN_SERIES_LEN,
            got: series.len(),
        });
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(ModelFitError::NonFinite);
    }
    if is_constant(series) {
        return Err(ModelFitError::ConstantSeries { value: series[0] });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InfoCriterion, SERIES_LEN};
    use crate::models::FittedModel;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rand_distr::{Distribution, Normal};
    use std::collections::HashMap;

    const RECOVERY_SEEDS: u64 = 30;

    fn noisy_trend(seed: u64, base: f64, step: f64, noise: i64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..SERIES_LEN)
            .map(|i| base + step * i as f64 + rng.gen_range(-noise..=noise) as f64)
            .collect()
    }

    fn white_noise(seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Normal::new(100.0, 10.0).unwrap();
        (0..SERIES_LEN).map(|_| dist.sample(&mut rng)).collect()
    }

    fn drifting_walk(seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        let step = Normal::new(2.0, 5.0).unwrap();
        let mut level = 200.0;
        (0..SERIES_LEN)
            .map(|_| {
                level += step.sample(&mut rng);
                level
            })
            .collect()
    }

    fn selected_orders(mode: SearchMode, make: fn(u64) -> Vec<f64>) -> Vec<ArimaOrder> {
        let search = AutoArima::new(SearchConfig {
            mode,
            ..SearchConfig::default()
        });
        (0..RECOVERY_SEEDS)
            .map(|seed| search.fit(&make(seed)).unwrap().order)
            .collect()
    }

    fn assert_white_noise_is_mean_only(mode: SearchMode) {
        let orders = selected_orders(mode, white_noise);
        let mut counts: HashMap<String, usize> = HashMap::new();
        for o in &orders {
            *counts.entry(o.label()).or_default() += 1;
        }
        let mean_only = ArimaOrder::new(0, 0, 0, true).label();
        let hits = counts.get(&mean_only).copied().unwrap_or(0);
        assert!(counts.values().all(|&c| c <= hits), "{mode:?}: {counts:?}");
        assert!(hits >= 10, "{mode:?}: {counts:?}");

        let low_ar = orders.iter().filter(|o| o.p <= 1).count();
        assert!(low_ar >= 20, "{mode:?}: {counts:?}");
    }

    fn assert_walk_has_low_ar_order(mode: SearchMode) {
        let orders = selected_orders(mode, drifting_walk);
        let low_ar = orders.iter().filter(|o| o.p <= 1).count();
        assert!(low_ar >= 20, "{mode:?}: {orders:?}");
    }

    #[test]
    fn linear_series_forecast_continues_trend() {
        let series: Vec<f64> = (0..SERIES_LEN).map(|i| 100.0 + 2.0 * i as f64).collect();
        let fit = AutoArima::default().fit(&series).unwrap();
        assert_eq!(fit.order.d, 1);

        let fc = fit.forecast(12);
        for (h, v) in fc.values.iter().enumerate() {
            let expected = 172.0 + 2.0 * h as f64;
            assert!((v - expected).abs() < 1e-3, "h={h}: {v} vs {expected}");
        }
    }

    #[test]
    fn constant_series_is_a_fit_error() {
        let err = AutoArima::default().fit(&[42.0; SERIES_LEN]).unwrap_err();
        assert_eq!(err, ModelFitError::ConstantSeries { value: 42.0 });
    }

    #[test]
    fn short_and_non_finite_series_are_rejected() {
        let err = AutoArima::default().fit(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, ModelFitError::InsufficientData { needed: MIN_SERIES_LEN, got: 3 });

        let mut series: Vec<f64> = (0..20).map(f64::from).collect();
        series[5] = f64::NAN;
        assert_eq!(AutoArima::default().fit(&series).unwrap_err(), ModelFitError::NonFinite);
    }

    #[test]
    fn search_is_deterministic() {
        let series = noisy_trend(42, 320.0, 3.0, 8);
        let a = AutoArima::default().search(&series).unwrap();
        let b = AutoArima::default().search(&series).unwrap();
        assert_eq!(a.best.order, b.best.order);
        assert_eq!(a.evaluated, b.evaluated);
        assert_eq!(a.best.forecast(12), b.best.forecast(12));
    }

    #[test]
    fn noisy_trend_forecast_keeps_rising() {
        let series = noisy_trend(7, 150.0, 1.0, 4);
        let fit = AutoArima::default().fit(&series).unwrap();
        let fc = fit.forecast(12);
        let last12: f64 = series[SERIES_LEN - 12..].iter().sum();
        let total: f64 = fc.values.iter().sum();
        assert!(total > last12, "total={total} last12={last12}");
        assert!(fc.values.iter().all(|v| *v > 0.0));
    }

    #[test]
    fn budget_caps_evaluations() {
        let series = noisy_trend(1, 100.0, 2.0, 5);
        let config = SearchConfig {
            max_models: 3,
            ..SearchConfig::default()
        };
        let search = AutoArima::new(config).search(&series).unwrap();
        assert!(search.evaluated.len() <= 3);
        assert_eq!(search.best.candidates_tried, search.evaluated.len());
    }

    #[test]
    fn exhaustive_is_no_worse_than_stepwise() {
        let series = noisy_trend(3, 180.0, 1.5, 6);
        let stepwise = AutoArima::default().search(&series).unwrap();
        let exhaustive = AutoArima::new(SearchConfig {
            mode: SearchMode::Exhaustive,
            ..SearchConfig::default()
        })
        .search(&series)
        .unwrap();
        assert_eq!(stepwise.d, exhaustive.d);
        assert!(exhaustive.best.score <= stepwise.best.score + 1e-9);
    }

    #[test]
    fn criterion_is_carried_into_fit() {
        let series = noisy_trend(5, 140.0, 2.2, 5);
        let fit = AutoArima::new(SearchConfig {
            criterion: InfoCriterion::Bic,
            ..SearchConfig::default()
        })
        .fit(&series)
        .unwrap();
        assert_eq!(fit.criterion, InfoCriterion::Bic);
    }

    #[test]
    fn white_noise_selects_mean_only_stepwise() {
        assert_white_noise_is_mean_only(SearchMode::Stepwise);
    }

    #[test]
    fn white_noise_selects_mean_only_exhaustive() {
        assert_white_noise_is_mean_only(SearchMode::Exhaustive);
    }

    #[test]
    fn drifting_walk_selects_low_ar_order_stepwise() {
        assert_walk_has_low_ar_order(SearchMode::Stepwise);
    }

    #[test]
    fn drifting_walk_selects_low_ar_order_exhaustive() {
        assert_walk_has_low_ar_order(SearchMode::Exhaustive);
    }

    #[test]
    fn candidates_share_one_scoring_window() {
        let series = white_noise(4);
        let search = AutoArima::new(SearchConfig {
            mode: SearchMode::Exhaustive,
            ..SearchConfig::default()
        })
        .search(&series)
        .unwrap();
        let limits = OrderLimits::new(&SearchConfig::default(), search.d);
        let cond = limits.scoring_offset();

        for (order, score) in &search.evaluated {
            let refit = fit_order(&series, *order, InfoCriterion::Aic, cond).map(|f| f.score);
            assert_eq!(*score, refit, "{}", order.label());
        }
    }
}
