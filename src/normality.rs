//! Shapiro–Wilk W statistic and p-value.
//!
//! Royston's AS R94 approximation of the Shapiro–Wilk test. The
//! coefficient polynomials were fitted for 3 ≤ n ≤ 5000 and are evaluated
//! unchanged above that range, so no upper size limit applies here;
//! callers that need the fitted range enforce it themselves.
//!
//! # References
//! - Royston (1992), "Approximating the Shapiro-Wilk W-test for
//!   non-normality", *Statistics and Computing* 2, 117–119.
//! - Royston (1995), "Remark AS R94", *Applied Statistics* 44(4), 547–551.

use crate::error::{check_sample, StatsError, StatsResult};
use crate::special;
use crate::stats;

const SW_C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const SW_C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const SW_C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const SW_C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const SW_C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const SW_C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const SW_G: [f64; 2] = [-2.273, 0.459];

/// W statistic with its upper-tail p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapiroWilk {
    /// In `(0, 1]`.
    pub w: f64,
    pub p_value: f64,
}

/// Computes Shapiro–Wilk W and its p-value for any `n ≥ 3`.
///
/// n = 3 uses the exact distribution `p = 1 − (6/π)·acos(√W)`.
///
/// # Errors
/// - `InsufficientData` for fewer than 3 values.
/// - `NonFinite` for NaN or ±∞.
/// - `DegenerateComputation` if every value is identical.
///
/// # Examples
/// ```
/// use u_statengine::normality::shapiro_wilk;
///
/// let r = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
/// assert!((r.w - 1.0).abs() < 1e-12);
/// ```
pub fn shapiro_wilk(sample: &[f64]) -> StatsResult<ShapiroWilk> {
    check_sample("shapiro-wilk", sample, 3)?;
    let n = sample.len();
    let x = stats::sorted_copy(sample);
    let ss = stats::sum_squared_deviations(&x).unwrap_or(0.0);
    if x[n - 1] == x[0] || ss <= 0.0 {
        return Err(StatsError::degenerate(
            "shapiro-wilk is undefined when every value is identical",
        ));
    }

    if n == 3 {
        let a = std::f64::consts::FRAC_1_SQRT_2;
        let w = ((a * (x[2] - x[0])).powi(2) / ss).clamp(0.75, 1.0);
        let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
        return Ok(ShapiroWilk {
            w,
            p_value: p.clamp(0.0, 1.0),
        });
    }

    let half = n / 2;
    let a = coefficients(n, half)?;
    let numerator: f64 = (0..half).map(|i| a[i] * (x[n - 1 - i] - x[i])).sum();
    let w = (numerator * numerator / ss).min(1.0);
    Ok(ShapiroWilk {
        w,
        p_value: p_value(w, n).clamp(0.0, 1.0),
    })
}

/// Horner evaluation of `c[0] + c[1]x + c[2]x² + …`.
fn poly(c: &[f64], x: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, &ci| acc * x + ci)
}

/// Antisymmetric weights for the lower half of the order statistics.
fn coefficients(n: usize, half: usize) -> StatsResult<Vec<f64>> {
    let nf = n as f64;
    // Blom scores of the lower order statistics (negative)
    let m: Vec<f64> = (0..half)
        .map(|i| special::inverse_normal_cdf((i as f64 + 0.625) / (nf + 0.25)))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / nf.sqrt();
    let a1 = poly(&SW_C1, rsn) - m[0] / ssumm2;

    // n ≤ 5 corrects only the extreme weight
    let corrected = if n <= 5 { 1 } else { 2 };
    let mut a = vec![0.0; half];
    a[0] = a1;
    let (fac_sq, one_minus) = if corrected == 1 {
        (summ2 - 2.0 * m[0] * m[0], 1.0 - 2.0 * a1 * a1)
    } else {
        let a2 = -m[1] / ssumm2 + poly(&SW_C2, rsn);
        a[1] = a2;
        (
            summ2 - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1],
            1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2,
        )
    };
    if fac_sq <= 0.0 || one_minus <= 0.0 {
        return Err(StatsError::degenerate("shapiro-wilk weights are undefined"));
    }
    let fac = (fac_sq / one_minus).sqrt();
    for i in corrected..half {
        a[i] = -m[i] / fac;
    }
    Ok(a)
}

/// Upper-tail p-value of W through Royston's normalizing transformation.
fn p_value(w: f64, n: usize) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();
    let (z_input, m, s) = if n <= 11 {
        let gamma = poly(&SW_G, nf);
        if y >= gamma {
            return 0.0;
        }
        (-(gamma - y).ln(), poly(&SW_C3, nf), poly(&SW_C4, nf).exp())
    } else {
        let ln_n = nf.ln();
        (y, poly(&SW_C5, ln_n), poly(&SW_C6, ln_n).exp())
    };
    special::standard_normal_sf((z_input - m) / s)
}
