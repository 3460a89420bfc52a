//! Error types for selectv2

use crate::dtype::DType;
use thiserror::Error;

/// Result type alias using selectv2's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or executing the select operator
#[derive(Error, Debug)]
pub enum Error {
    /// An operand's rank exceeds the supported dimension count
    #[error("Shape rank {rank} exceeds the supported maximum of {max} dimensions")]
    ShapeRankExceeded {
        /// Rank of the offending shape
        rank: usize,
        /// Maximum supported rank
        max: usize,
    },

    /// A dimension extent does not fit the compact parameter-block layout
    #[error("Extent {extent} in dimension {dim} exceeds the compact limit of 65535")]
    ExtentOverflow {
        /// Dimension index (0 = fastest-varying)
        dim: usize,
        /// The oversized extent
        extent: usize,
    },

    /// Shapes cannot be broadcast together
    #[error("Cannot broadcast shapes {lhs:?} and {rhs:?}")]
    BroadcastError {
        /// Left-hand side shape
        lhs: Vec<usize>,
        /// Right-hand side shape
        rhs: Vec<usize>,
    },

    /// Unsupported dtype for an operation
    #[error("Unsupported dtype {dtype:?} for operation '{op}'")]
    UnsupportedDType {
        /// The unsupported dtype
        dtype: DType,
        /// The operation name
        op: &'static str,
    },

    /// Invalid argument provided to an operation
    #[error("Invalid argument '{arg}': {reason}")]
    InvalidArgument {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// A contract the planner guarantees by construction was violated.
    ///
    /// Seeing this means a malformed parameter block or buffer set reached
    /// the executor; it is a programming error, not a recoverable runtime
    /// condition.
    #[error("Precondition violation: {reason}")]
    PreconditionViolation {
        /// What was violated
        reason: String,
    },
}

impl Error {
    /// Create a broadcast error
    pub fn broadcast(lhs: &[usize], rhs: &[usize]) -> Self {
        Self::BroadcastError {
            lhs: lhs.to_vec(),
            rhs: rhs.to_vec(),
        }
    }

    /// Create an unsupported dtype error
    pub fn unsupported_dtype(dtype: DType, op: &'static str) -> Self {
        Self::UnsupportedDType { dtype, op }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            arg,
            reason: reason.into(),
        }
    }

    /// Create a precondition violation
    pub fn precondition(reason: impl Into<String>) -> Self {
        Self::PreconditionViolation {
            reason: reason.into(),
        }
    }
}
