//! Least squares solver.
//!
//! Order selection repeatedly solves small regression problems of the form:
//!
//! ```text
//! minimize Σ (w_t - x_t^T β)^2
//! ```
//!
//! where `x_t` holds an optional constant, lagged values and lagged innovation
//! estimates. Two regressions are solved per candidate order (the long AR
//! pre-fit and the ARMA regression itself).
//!
//! Implementation choices:
//! - We use SVD so tall and rank-deficient designs both solve. A noise-free
//!   trend differences to a constant, which makes the constant and lag columns
//!   exactly collinear; SVD returns the minimum-norm solution instead of failing.
//! - Parameter dimension is tiny (at most `max_order + 1` columns), so SVD cost
//!   is negligible.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Build a design matrix from row-major data and solve for the coefficients.
///
/// Returns `None` when there are fewer rows than columns or the solve fails.
pub fn regress(rows: &[Vec<f64>], y: &[f64]) -> Option<Vec<f64>> {
    let n = rows.len();
    let k = rows.first().map(Vec::len)?;
    if n < k || n != y.len() || k == 0 {
        return None;
    }

    let x = DMatrix::from_fn(n, k, |i, j| rows[i][j]);
    let y = DVector::from_column_slice(y);
    solve_least_squares(&x, &y).map(|beta| beta.iter().copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn collinear_design_returns_minimum_norm_solution() {
        // Both columns are constant 1 and 2: any b0 + 2 b1 = 2 fits exactly.
        let rows = vec![vec![1.0, 2.0]; 5];
        let y = vec![2.0; 5];
        let beta = regress(&rows, &y).unwrap();
        assert!((beta[0] + 2.0 * beta[1] - 2.0).abs() < 1e-9);
        // Minimum-norm solution is proportional to (1, 2).
        assert!((beta[1] - 2.0 * beta[0]).abs() < 1e-9);
    }

    #[test]
    fn regress_rejects_underdetermined() {
        let rows = vec![vec![1.0, 0.0, 1.0]];
        assert!(regress(&rows, &[1.0]).is_none());
        assert!(regress(&[], &[]).is_none());
    }
}
