//! Canonical solve status and the solver exit codes it is derived from.

/// Exit codes of the array-based solver contract.
pub mod exit_code {
    /// Optimal solution found.
    pub const OPTIMAL: i64 = 0;
    /// Certificate of primal infeasibility found.
    pub const PRIMAL_INFEASIBLE: i64 = 1;
    /// Certificate of dual infeasibility (unboundedness) found.
    pub const DUAL_INFEASIBLE: i64 = 2;
    /// Offset added to the three codes above at reduced accuracy.
    pub const INACCURATE_OFFSET: i64 = 10;
    /// Iteration or time limit reached.
    pub const MAX_ITERATIONS: i64 = -1;
    /// Numerical problems.
    pub const NUMERICS: i64 = -2;
    /// Iterates left the cone.
    pub const OUT_OF_CONE: i64 = -3;
    /// Interrupted.
    pub const INTERRUPTED: i64 = -4;
    /// Unrecoverable failure.
    pub const FATAL: i64 = -7;
}

/// Solution status reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Optimal to reduced accuracy.
    OptimalInaccurate,
    /// Infeasible to reduced accuracy.
    InfeasibleInaccurate,
    /// Unbounded to reduced accuracy.
    UnboundedInaccurate,
    /// Solver failed; no usable result.
    SolverError,
}

impl SolveStatus {
    /// Map a solver exit code to a status; unknown codes are solver errors.
    pub fn from_exit_code(code: i64) -> Self {
        match code {
            0 => SolveStatus::Optimal,
            1 => SolveStatus::Infeasible,
            2 => SolveStatus::Unbounded,
            10 => SolveStatus::OptimalInaccurate,
            11 => SolveStatus::InfeasibleInaccurate,
            12 => SolveStatus::UnboundedInaccurate,
            _ => SolveStatus::SolverError,
        }
    }

    /// Check if the objective value is meaningful (optimal, at any accuracy).
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal | SolveStatus::OptimalInaccurate)
    }

    /// Check if this is one of the reduced-accuracy statuses.
    pub fn is_inaccurate(&self) -> bool {
        matches!(
            self,
            SolveStatus::OptimalInaccurate
                | SolveStatus::InfeasibleInaccurate
                | SolveStatus::UnboundedInaccurate
        )
    }
}
