//! Error types for cvxcanon.

use thiserror::Error;

use crate::expr::VarId;

/// Error type for canonicalization and solver setup.
///
/// Solver exit codes are not errors; they are reported through
/// [`SolveStatus`](crate::solver::SolveStatus).
#[derive(Debug, Error)]
pub enum CanonError {
    /// A node's declared shape disagrees with its operator or children.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Structurally invalid expression tree.
    #[error("Invalid expression: {0}")]
    InvalidExpression(String),

    /// A variable leaf has no column offset.
    #[error("Variable {0:?} has no column offset")]
    UnknownVariable(VarId),

    /// Variable offsets overlap or leave gaps.
    #[error("Invalid variable offsets: {0}")]
    InvalidOffsets(String),

    /// Cone dimensions disagree with the formatted constraints.
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// The external solver could not be set up.
    #[error("Solver error: {0}")]
    SolverError(String),

    /// Operation exists in the interface but is not supported yet.
    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),
}

/// Result type for cvxcanon operations.
pub type Result<T> = std::result::Result<T, CanonError>;
