//! Error types shared by the world generator and the evolutionary engine.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TspError>;

/// Errors produced while building a world or evolving tours.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TspError {
    /// The caller supplied a value the algorithm cannot work with
    /// (zero points, duplicate points, out-of-range tunables).
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A bounded "sample until distinct" loop gave up.
    #[error("Capacity exceeded: requested {requested} distinct {what}, reached {reached}")]
    CapacityExceeded {
        what: &'static str,
        requested: usize,
        reached: usize,
    },

    /// A genetic operator produced something that is not a permutation.
    ///
    /// This always indicates a logic defect and is never retried.
    #[error("Invariant violation in {operator}: {reason}")]
    InvariantViolation {
        operator: &'static str,
        reason: String,
    },
}

impl TspError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        TspError::InvalidInput {
            reason: reason.into(),
        }
    }
}
