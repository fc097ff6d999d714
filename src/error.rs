//! Error types for investlp.

use thiserror::Error;

/// Error type for investlp operations.
#[derive(Debug, Error)]
pub enum LpError {
    /// A generator produced a constraint with neither capacity nor production terms.
    #[error("Malformed constraint: {0}")]
    MalformedConstraint(String),

    /// No generator is registered under the requested name.
    #[error("Unregistered constraint: {name}")]
    UnregisteredConstraint { name: String },

    /// An axis shared by two tensors carries different labels.
    #[error("Axis mismatch on '{axis}': expected {expected}, got {got}")]
    AxisMismatch {
        axis: String,
        expected: String,
        got: String,
    },

    /// An operation referred to an axis the tensor does not have.
    #[error("Missing axis '{0}'")]
    MissingAxis(String),

    /// A selection referred to a label absent from the axis.
    #[error("Missing label {label} on axis '{axis}'")]
    MissingLabel { axis: String, label: String },

    /// Dimensional precondition violated by the caller.
    #[error("Precondition violated: {0}")]
    Precondition(String),

    /// Inputs are individually valid but do not form a meaningful problem.
    #[error("Inconsistent problem: {0}")]
    Inconsistent(String),

    /// Interpolation target could not be evaluated.
    #[error("Interpolation error: {0}")]
    Interpolation(String),

    /// Shape mismatch.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Solver error.
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Configuration could not be decoded.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for investlp operations.
pub type Result<T> = std::result::Result<T, LpError>;
