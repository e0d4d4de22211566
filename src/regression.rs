//! Regression engine: simple, multiple and polynomial least squares.
//!
//! All three fits share one pipeline: build a design matrix with a
//! leading intercept column, solve by Householder QR, then derive R²,
//! adjusted R² and the overall F test from the residuals.
//!
//! # Degeneracy
//!
//! - Residual mean square exactly 0: F = +∞ and p = 0.
//! - Constant response: R² = 1 when the fit is exact, otherwise 0.
//! - Collinear predictors: `DegenerateComputation`.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::validate_degree;
use crate::error::{check_same_len, check_sample, StatsError, StatsResult};
use crate::linalg::Matrix;
use crate::special;
use crate::stats;

/// Result of a least-squares fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionResult {
    /// One per predictor (or polynomial term x¹…xᵈ), intercept excluded.
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    pub r_squared: f64,
    pub adjusted_r_squared: f64,
    /// Overall F statistic with (p, n − p − 1) df.
    pub f_statistic: f64,
    pub p_value: f64,
    /// `y[i] − fitted_values[i]`.
    pub residuals: Vec<f64>,
    pub fitted_values: Vec<f64>,
    /// Number of observations.
    pub n: usize,
    /// Number of predictors (polynomial degree for polynomial fits).
    pub p: usize,
}

/// Ordinary least squares with one predictor.
///
/// # Errors
/// - `InsufficientData` for fewer than 3 points.
/// - `MismatchedLength` if `x` and `y` differ in length.
/// - `DegenerateComputation` if `x` is constant.
///
/// # Examples
/// ```
/// use u_statengine::regression::linear;
///
/// let r = linear(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
/// assert!((r.coefficients[0] - 2.0).abs() < 1e-10);
/// assert!(r.intercept.abs() < 1e-10);
/// ```
#[instrument(level = "debug", skip_all, fields(n = x.len()))]
pub fn linear(x: &[f64], y: &[f64]) -> StatsResult<RegressionResult> {
    check_sample("linear regression x", x, 3)?;
    check_sample("linear regression y", y, 3)?;
    check_same_len("linear regression", x.len(), y.len())?;
    if stats::variance(x).unwrap_or(0.0) == 0.0 {
        return Err(StatsError::degenerate(
            "linear regression needs a non-constant predictor",
        ));
    }
    let rows: Vec<Vec<f64>> = x.iter().map(|&v| vec![v]).collect();
    fit(&rows, y, 1)
}

/// Ordinary least squares over `p` predictors; `x` is n rows × p columns.
///
/// # Errors
/// - `InsufficientData` unless n > p + 1.
/// - `MismatchedLength` for ragged rows or `y` of a different length.
/// - `NonFinite` for NaN or ±∞ anywhere in the inputs.
/// - `DegenerateComputation` for collinear or constant predictors.
#[instrument(level = "debug", skip_all, fields(n = x.len(), p = x.first().map_or(0, Vec::len)))]
pub fn multiple(x: &[Vec<f64>], y: &[f64]) -> StatsResult<RegressionResult> {
    let p = x.first().map_or(0, Vec::len);
    if p == 0 {
        return Err(StatsError::InvalidInput(
            "multiple regression needs at least one predictor".into(),
        ));
    }
    check_sample("multiple regression y", y, p + 2)?;
    check_same_len("multiple regression", x.len(), y.len())?;
    for row in x {
        check_same_len("multiple regression row", p, row.len())?;
        if !row.iter().all(|v| v.is_finite()) {
            return Err(StatsError::NonFinite {
                context: "multiple regression x",
            });
        }
    }
    fit(x, y, p)
}

/// Least squares on the polynomial basis `x, x², …, xᵈ`.
///
/// # Errors
/// - `InvalidInput` if `degree` is outside `[1, 10]`.
/// - `InsufficientData` unless n > degree + 1.
/// - `MismatchedLength` if `x` and `y` differ in length.
/// - `DegenerateComputation` with fewer than degree + 1 distinct x values.
#[instrument(level = "debug", skip(x, y), fields(n = x.len()))]
pub fn polynomial(x: &[f64], y: &[f64], degree: usize) -> StatsResult<RegressionResult> {
    validate_degree(degree)?;
    check_sample("polynomial regression x", x, degree + 2)?;
    check_sample("polynomial regression y", y, degree + 2)?;
    check_same_len("polynomial regression", x.len(), y.len())?;

    let distinct = stats::tie_group_sizes(x).len();
    if distinct <= degree {
        return Err(StatsError::degenerate(format!(
            "degree {degree} polynomial needs at least {} distinct x values, got {distinct}",
            degree + 1
        )));
    }

    let rows: Vec<Vec<f64>> = x
        .iter()
        .map(|&v| {
            std::iter::successors(Some(v), |&prev| Some(prev * v))
                .take(degree)
                .collect()
        })
        .collect();
    fit(&rows, y, degree)
}

/// Shared pipeline: QR solve, residuals, goodness of fit, overall F test.
fn fit(rows: &[Vec<f64>], y: &[f64], p: usize) -> StatsResult<RegressionResult> {
    let design = Matrix::with_intercept(rows)?;
    let beta = design.least_squares(y)?;
    let fitted_values = design.mul_vec(&beta)?;
    let residuals: Vec<f64> = y.iter().zip(&fitted_values).map(|(a, b)| a - b).collect();

    let n = y.len();
    let df_res = (n - p - 1) as f64;
    let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
    let ss_tot = stats::sum_squared_deviations(y).unwrap_or(0.0);

    let r_squared = if ss_tot > 0.0 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        let scale: f64 = y.iter().map(|v| v * v).sum();
        if ss_res <= f64::EPSILON * scale {
            1.0
        } else {
            0.0
        }
    };
    let adjusted_r_squared = 1.0 - (1.0 - r_squared) * (n - 1) as f64 / df_res;
    let (f_statistic, p_value) = overall_f_test(r_squared, ss_res, p, df_res);

    debug!(r_squared, f_statistic, p_value, "regression fit complete");
    Ok(RegressionResult {
        coefficients: beta[1..].to_vec(),
        intercept: beta[0],
        r_squared,
        adjusted_r_squared,
        f_statistic,
        p_value,
        residuals,
        fitted_values,
        n,
        p,
    })
}

/// `F = R²(n−p−1) / ((1−R²)p)` with its upper-tail p-value.
fn overall_f_test(r_squared: f64, ss_res: f64, p: usize, df_res: f64) -> (f64, f64) {
    if ss_res == 0.0 || r_squared >= 1.0 {
        warn!(r_squared, "residual mean square is zero; reporting F = +inf, p = 0");
        return (f64::INFINITY, 0.0);
    }
    let pf = p as f64;
    let f = r_squared * df_res / ((1.0 - r_squared) * pf);
    (f, special::f_distribution_sf(f, pf, df_res))
}
