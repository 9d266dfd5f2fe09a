//! Lag-polynomial helpers for ARMA stationarity/invertibility checks and
//! ψ-weight expansion.
//!
//! A recursion `x_t = c_1 x_{t-1} + ... + c_k x_{t-k}` is stable iff every
//! eigenvalue of its companion matrix lies strictly inside the unit circle,
//! i.e. iff every root of `1 - c_1 z - ... - c_k z^k` lies outside it.

use nalgebra::DMatrix;

/// Largest modulus among the inverse roots of `1 - c_1 z - ... - c_k z^k`.
///
/// Trailing zero coefficients are ignored. Returns `0.0` for an empty (or
/// all-zero) polynomial.
pub fn max_inverse_root(coeffs: &[f64]) -> f64 {
    let k = coeffs
        .iter()
        .rposition(|c| c.abs() > 0.0)
        .map(|i| i + 1)
        .unwrap_or(0);
    if k == 0 {
        return 0.0;
    }
    if k == 1 {
        return coeffs[0].abs();
    }

    let companion = DMatrix::from_fn(k, k, |i, j| {
        if i == 0 {
            coeffs[j]
        } else if i == j + 1 {
            1.0
        } else {
            0.0
        }
    });

    companion
        .complex_eigenvalues()
        .iter()
        .map(|z| z.norm())
        .fold(0.0, f64::max)
}

/// Multiply two polynomials given as ascending coefficient slices.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// AR coefficients of `φ(B)(1 - B)^d`, in the same `x_t = Σ c_i x_{t-i}`
/// convention as `ar`.
pub fn integrated_ar(ar: &[f64], d: usize) -> Vec<f64> {
    let mut poly = Vec::with_capacity(ar.len() + 1);
    poly.push(1.0);
    poly.extend(ar.iter().map(|c| -c));
    for _ in 0..d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    poly.iter().skip(1).map(|c| -c).collect()
}

/// First `n` ψ-weights of the MA(∞) representation of an ARMA process with AR
/// coefficients `ar` and MA coefficients `ma`.
///
/// `ψ_0 = 1`, `ψ_j = θ_j + Σ_{i=1}^{min(j,p)} φ_i ψ_{j-i}`.
pub fn psi_weights(ar: &[f64], ma: &[f64], n: usize) -> Vec<f64> {
    let mut psi = Vec::with_capacity(n);
    for j in 0..n {
        if j == 0 {
            psi.push(1.0);
            continue;
        }
        let mut v = if j <= ma.len() { ma[j - 1] } else { 0.0 };
        for i in 1..=ar.len().min(j) {
            v += ar[i - 1] * psi[j - i];
        }
        psi.push(v);
    }
    psi
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ar1_root_is_coefficient() {
        assert!((max_inverse_root(&[0.5]) - 0.5).abs() < 1e-12);
        assert!((max_inverse_root(&[-0.9]) - 0.9).abs() < 1e-12);
        assert_eq!(max_inverse_root(&[]), 0.0);
        assert_eq!(max_inverse_root(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn ar2_stability() {
        // x_t = 0.5 x_{t-1} + 0.3 x_{t-2}: stationary.
        assert!(max_inverse_root(&[0.5, 0.3]) < 1.0);
        // x_t = 0.6 x_{t-1} + 0.5 x_{t-2}: 0.6 + 0.5 > 1, explosive.
        assert!(max_inverse_root(&[0.6, 0.5]) > 1.0);
        // Complex pair with modulus sqrt(0.81) = 0.9.
        assert!((max_inverse_root(&[0.0, -0.81]) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn integrated_ar_expands_differencing() {
        // (1 - 0.5B)(1 - B) = 1 - 1.5B + 0.5B^2
        let c = integrated_ar(&[0.5], 1);
        assert!((c[0] - 1.5).abs() < 1e-12);
        assert!((c[1] + 0.5).abs() < 1e-12);
        // (1 - B)^2 = 1 - 2B + B^2
        assert_eq!(integrated_ar(&[], 2), vec![2.0, -1.0]);
    }

    #[test]
    fn random_walk_psi_weights_are_ones() {
        let psi = psi_weights(&integrated_ar(&[], 1), &[], 5);
        assert_eq!(psi, vec![1.0; 5]);
    }

    #[test]
    fn ma1_psi_weights() {
        let psi = psi_weights(&[], &[0.4], 4);
        assert_eq!(psi, vec![1.0, 0.4, 0.0, 0.0]);
    }
}
