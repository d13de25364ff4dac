//! Solver interface for cvxcanon.
//!
//! This module provides:
//! - Matrix stuffing into the `(c, A, b, G, h)` arrays and cone dimensions
//! - The [`ConeSolver`] seam and its Clarabel implementation
//! - The problem record that binds assembled data to a solver handle

pub mod backend;
pub mod clarabel;
pub mod ecos;
pub mod settings;
pub mod status;
pub mod stuffing;

pub use self::clarabel::ClarabelSolver;
pub use backend::{ConeSolver, SolverOutcome};
pub use ecos::{EcosProblem, ProblemState, Solution};
pub use settings::{Settings, SolverOptions};
pub use status::{exit_code, SolveStatus};
pub use stuffing::{EcosData, Sense};
