//! Dense row-major matrices and least-squares solving.
//!
//! Only what the regression engine needs: construction, matrix-vector
//! products and a Householder QR least-squares solver. Solving through QR
//! avoids forming `XᵀX`, whose condition number is the square of the
//! design matrix's and which breaks down on polynomial bases.
//!
//! # References
//! Golub & Van Loan (2013), *Matrix Computations*, 4th ed., §5.2–5.3.

use crate::error::{StatsError, StatsResult};

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Creates a `rows × cols` matrix from row-major `data`.
    ///
    /// # Errors
    /// `MismatchedLength` if `data.len() != rows * cols`.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> StatsResult<Self> {
        if data.len() != rows * cols {
            return Err(StatsError::MismatchedLength {
                context: "matrix data",
                expected: rows * cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Design matrix with a leading column of ones followed by `rows[i]`.
    ///
    /// # Errors
    /// `MismatchedLength` if the rows are ragged.
    pub fn with_intercept(rows: &[Vec<f64>]) -> StatsResult<Self> {
        let p = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * (p + 1));
        for row in rows {
            if row.len() != p {
                return Err(StatsError::MismatchedLength {
                    context: "design matrix row",
                    expected: p,
                    actual: row.len(),
                });
            }
            data.push(1.0);
            data.extend_from_slice(row);
        }
        Self::new(rows.len(), p + 1, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Matrix-vector product `A·v`.
    ///
    /// # Errors
    /// `MismatchedLength` if `v.len() != cols`.
    pub fn mul_vec(&self, v: &[f64]) -> StatsResult<Vec<f64>> {
        if v.len() != self.cols {
            return Err(StatsError::MismatchedLength {
                context: "matrix-vector product",
                expected: self.cols,
                actual: v.len(),
            });
        }
        Ok(self
            .data
            .chunks_exact(self.cols)
            .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
            .collect())
    }

    /// Solves `min ‖A·β − b‖₂` by Householder QR.
    ///
    /// # Algorithm
    /// Householder reflections reduce `A` to upper-triangular `R` while the
    /// same reflections are applied to `b`; `β` then follows from
    /// back-substitution on `R·β = (Qᵀb)[..cols]`.
    ///
    /// # Errors
    /// - `MismatchedLength` if `b.len() != rows`.
    /// - `InvalidInput` if the system is underdetermined (`rows < cols`).
    /// - `DegenerateComputation` if `A` is rank deficient.
    pub fn least_squares(&self, b: &[f64]) -> StatsResult<Vec<f64>> {
        let (m, n) = (self.rows, self.cols);
        if b.len() != m {
            return Err(StatsError::MismatchedLength {
                context: "least squares right-hand side",
                expected: m,
                actual: b.len(),
            });
        }
        if m < n {
            return Err(StatsError::InvalidInput(format!(
                "least squares needs at least as many rows as columns, got {m}×{n}"
            )));
        }

        let col_norms: Vec<f64> = (0..n)
            .map(|j| (0..m).map(|i| self.get(i, j).powi(2)).sum::<f64>().sqrt())
            .collect();
        // relative to each column's own scale
        const RANK_TOL: f64 = 1e-12;

        let mut a = self.data.clone();
        let mut rhs = b.to_vec();
        let mut diag = vec![0.0; n];

        for k in 0..n {
            let norm = (k..m).map(|i| a[i * n + k].powi(2)).sum::<f64>().sqrt();
            if norm == 0.0 || norm <= RANK_TOL * col_norms[k] {
                return Err(StatsError::degenerate(
                    "design matrix is singular (collinear or constant columns)",
                ));
            }
            let alpha = if a[k * n + k] > 0.0 { -norm } else { norm };

            let mut v: Vec<f64> = (k..m).map(|i| a[i * n + k]).collect();
            v[0] -= alpha;
            let v_sq: f64 = v.iter().map(|x| x * x).sum();

            if v_sq > 0.0 {
                for j in k..n {
                    let dot: f64 = v.iter().enumerate().map(|(t, vt)| vt * a[(k + t) * n + j]).sum();
                    let f = 2.0 * dot / v_sq;
                    for (t, vt) in v.iter().enumerate() {
                        a[(k + t) * n + j] -= f * vt;
                    }
                }
                let dot: f64 = v.iter().enumerate().map(|(t, vt)| vt * rhs[k + t]).sum();
                let f = 2.0 * dot / v_sq;
                for (t, vt) in v.iter().enumerate() {
                    rhs[k + t] -= f * vt;
                }
            }
            diag[k] = alpha;
        }

        let mut beta = vec![0.0; n];
        for k in (0..n).rev() {
            let tail: f64 = ((k + 1)..n).map(|j| a[k * n + j] * beta[j]).sum();
            beta[k] = (rhs[k] - tail) / diag[k];
        }
        Ok(beta)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn residual_orthogonal_to_columns(
            xs in proptest::collection::vec(-10.0_f64..10.0, 6..30),
            noise in proptest::collection::vec(-1.0_f64..1.0, 30),
        ) {
            let rows: Vec<Vec<f64>> = xs.iter().map(|&v| vec![v]).collect();
            let design = Matrix::with_intercept(&rows).unwrap();
            let y: Vec<f64> = xs.iter().zip(&noise).map(|(x, e)| 3.0 - 0.5 * x + e).collect();
            if let Ok(beta) = design.least_squares(&y) {
                let fitted = design.mul_vec(&beta).unwrap();
                let resid: Vec<f64> = y.iter().zip(&fitted).map(|(a, b)| a - b).collect();
                let sum: f64 = resid.iter().sum();
                let dot: f64 = resid.iter().zip(&xs).map(|(r, x)| r * x).sum();
                prop_assert!(sum.abs() < 1e-8, "Σr = {}", sum);
                prop_assert!(dot.abs() < 1e-7, "Σr·x = {}", dot);
            }
        }
    }
}
