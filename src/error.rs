//! Error types for engine operations.
//!
//! Every engine entry point returns [`StatsResult`]. Validation failures are
//! raised before any numeric work; degeneracy detected mid-computation is
//! either reported as [`StatsError::DegenerateComputation`] or replaced by a
//! documented sentinel (e.g. an infinite F statistic).

use thiserror::Error;

/// Result type for engine operations.
pub type StatsResult<T> = Result<T, StatsError>;

/// Coarse classification of a [`StatsError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or too-short arrays, mismatched lengths, out-of-range parameters.
    InvalidInput,
    /// Unknown distribution, alternative, or comparison method.
    UnsupportedOption,
    /// Zero variance, singular design matrix, all-identical values.
    DegenerateComputation,
}

/// Errors raised by the statistical engines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Generic invalid input or out-of-range parameter.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Input is shorter than the operation's minimum-size contract.
    #[error("insufficient data for {context}: need at least {required} values, got {actual}")]
    InsufficientData {
        /// Operation that rejected the input.
        context: &'static str,
        /// Minimum number of values.
        required: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// Inputs that must be aligned have different lengths.
    #[error("mismatched lengths for {context}: expected {expected}, got {actual}")]
    MismatchedLength {
        /// Operation that rejected the input.
        context: &'static str,
        /// Length of the reference input.
        expected: usize,
        /// Length of the offending input.
        actual: usize,
    },

    /// A sample contains NaN or an infinity.
    #[error("non-finite value in {context}")]
    NonFinite {
        /// Operation that rejected the input.
        context: &'static str,
    },

    /// Distribution name not recognised by the distribution engine.
    #[error("unsupported distribution: {0}")]
    UnsupportedDistribution(String),

    /// Enumerated option outside its recognised set.
    #[error("unsupported {option}: {value}")]
    UnsupportedOption {
        /// Name of the option (e.g. `alternative`).
        option: &'static str,
        /// Value supplied by the caller.
        value: String,
    },

    /// The computation has no defined answer for this input.
    #[error("degenerate computation: {0}")]
    DegenerateComputation(String),
}

impl StatsError {
    /// Maps the error onto its coarse [`ErrorKind`].
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_)
            | Self::InsufficientData { .. }
            | Self::MismatchedLength { .. }
            | Self::NonFinite { .. } => ErrorKind::InvalidInput,
            Self::UnsupportedDistribution(_) | Self::UnsupportedOption { .. } => {
                ErrorKind::UnsupportedOption
            }
            Self::DegenerateComputation(_) => ErrorKind::DegenerateComputation,
        }
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateComputation(msg.into())
    }
}

/// Rejects samples shorter than `required` or containing non-finite values.
pub(crate) fn check_sample(context: &'static str, data: &[f64], required: usize) -> StatsResult<()> {
    if data.len() < required {
        return Err(StatsError::InsufficientData {
            context,
            required,
            actual: data.len(),
        });
    }
    if !data.iter().all(|v| v.is_finite()) {
        return Err(StatsError::NonFinite { context });
    }
    Ok(())
}

/// Rejects aligned inputs whose lengths differ.
pub(crate) fn check_same_len(context: &'static str, expected: usize, actual: usize) -> StatsResult<()> {
    if expected != actual {
        return Err(StatsError::MismatchedLength {
            context,
            expected,
            actual,
        });
    }
    Ok(())
}
