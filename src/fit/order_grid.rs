//! Candidate ARIMA order generation.
//!
//! Orders are enumerated in a fixed sequence so that, together with index
//! tie-breaking during selection, the chosen model is deterministic.

use crate::domain::SearchConfig;
use crate::fit::fitter::ArimaOrder;

/// Admissible region of `(p, q, constant)` for a fixed differencing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLimits {
    pub d: usize,
    pub max_p: usize,
    pub max_q: usize,
    pub max_order: usize,
    /// Constants are only estimated for `d <= 1`.
    pub allow_constant: bool,
}

impl OrderLimits {
    pub fn new(config: &SearchConfig, d: usize) -> Self {
        Self {
            d,
            max_p: config.max_p,
            max_q: config.max_q,
            max_order: config.max_order,
            allow_constant: d <= 1,
        }
    }

    /// Leading differenced observations every candidate conditions on, so all
    /// scores at this `d` cover the same window.
    pub fn scoring_offset(&self) -> usize {
        self.max_p.min(self.max_order)
    }

    pub fn admits(&self, order: &ArimaOrder) -> bool {
        order.d == self.d
            && order.p <= self.max_p
            && order.q <= self.max_q
            && order.p + order.q <= self.max_order
            && (self.allow_constant || !order.constant)
    }
}

/// Starting orders for the stepwise search: `(2,d,2)`, `(0,d,0)`, `(1,d,0)`,
/// `(0,d,1)` (with a constant when allowed), then `(0,d,0)` without one.
pub fn stepwise_start(limits: &OrderLimits) -> Vec<ArimaOrder> {
    let c = limits.allow_constant;
    let d = limits.d;
    let mut out = vec![
        ArimaOrder::new(2, d, 2, c),
        ArimaOrder::new(0, d, 0, c),
        ArimaOrder::new(1, d, 0, c),
        ArimaOrder::new(0, d, 1, c),
    ];
    if c {
        out.push(ArimaOrder::new(0, d, 0, false));
    }
    admissible_unique(out, limits)
}

/// Orders adjacent to `order`: `p ± 1`, `q ± 1`, both at once, and the
/// constant toggled.
pub fn neighbours(order: ArimaOrder, limits: &OrderLimits) -> Vec<ArimaOrder> {
    const DELTAS: [(isize, isize); 8] = [
        (-1, 0),
        (1, 0),
        (0, -1),
        (0, 1),
        (-1, -1),
        (1, 1),
        (-1, 1),
        (1, -1),
    ];

    let mut out = Vec::with_capacity(DELTAS.len() + 1);
    for (dp, dq) in DELTAS {
        let (Some(p), Some(q)) = (order.p.checked_add_signed(dp), order.q.checked_add_signed(dq)) else {
            continue;
        };
        out.push(ArimaOrder::new(p, order.d, q, order.constant));
    }
    if limits.allow_constant {
        out.push(ArimaOrder::new(order.p, order.d, order.q, !order.constant));
    }
    admissible_unique(out, limits)
}

/// Every admissible order, by increasing `p`, then `q`, constant first.
pub fn exhaustive_grid(limits: &OrderLimits) -> Vec<ArimaOrder> {
    let constants: &[bool] = if limits.allow_constant { &[true, false] } else { &[false] };
    let mut out = Vec::new();
    for p in 0..=limits.max_p {
        for q in 0..=limits.max_q {
            for &c in constants {
                out.push(ArimaOrder::new(p, limits.d, q, c));
            }
        }
    }
    admissible_unique(out, limits)
}

fn admissible_unique(orders: Vec<ArimaOrder>, limits: &OrderLimits) -> Vec<ArimaOrder> {
    let mut out: Vec<ArimaOrder> = Vec::with_capacity(orders.len());
    for o in orders {
        if limits.admits(&o) && !out.contains(&o) {
            out.push(o);
        }
    }
    out
}
