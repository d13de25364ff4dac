//! # cvxcanon
//!
//! Canonicalization of affine expression trees into conic standard form.
//!
//! cvxcanon turns an objective and a set of constraints, each given as a
//! tree of linear operators over variables and constants, into the sparse
//! arrays of
//!
//! ```text
//! minimize    c'x
//! subject to  A x  = b
//!             G x <=_K h
//! ```
//!
//! where `K` is a product of a nonnegative orthant, second-order cones and
//! exponential cones, and hands them to a conic interior point solver.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cvxcanon::prelude::*;
//!
//! let x = variable(());
//! let solution = Problem::minimize(x.clone())
//!     .subject_to([x.geq(constant(1.0))])
//!     .solve()
//!     .unwrap();
//!
//! assert_eq!(solution.status, SolveStatus::Optimal);
//! println!("Optimal value: {}", solution.optimal_value);
//! ```
//!
//! ## Layers
//!
//! - **Expression trees** (`expr`): `LinOp` nodes over a closed `OpKind` set,
//!   values vectorised column-major
//! - **Coefficient extraction** (`canon`): each tree becomes per-variable
//!   sparse blocks plus a constant, accumulated row by row
//! - **Cone formatting** (`canon::format`): sign conventions and the
//!   interleaved exponential cone layout
//! - **Assembly and solving** (`solver`): `EcosData` arrays, a
//!   `ConeSolver` seam and the Clarabel backend
//! - **Builder** (`problem`): `Problem::minimize(..).subject_to(..)`

pub mod canon;
pub mod constraints;
pub mod error;
pub mod expr;
pub mod problem;
pub mod solver;
pub mod sparse;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cvxcanon::prelude::*;
/// ```
pub mod prelude {
    // Expression types
    pub use crate::expr::{
        constant, constant_dmatrix, constant_matrix, constant_sparse, constant_vec, ones,
        variable, variable_with_id, zeros, Array, LinOp, OpKind, Shape, VarId,
    };

    // Constraints
    pub use crate::constraints::{Constraint, ConstraintDims, ConstraintExt, ConstraintSet};

    // Problem
    pub use crate::problem::{Objective, Problem, ProblemBuilder};

    // Solver
    pub use crate::solver::{
        EcosData, EcosProblem, ProblemState, Sense, Settings, Solution, SolveStatus,
        SolverOptions,
    };

    // Errors
    pub use crate::error::{CanonError, Result};
}

// Re-export main types at crate root
pub use error::{CanonError, Result};
pub use problem::Problem;
pub use solver::{EcosProblem, Solution, SolveStatus};
