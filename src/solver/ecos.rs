//! The problem record: assembled data bound to a solver handle.

use log::{info, warn};

use super::backend::{ConeSolver, SolverOutcome};
use super::clarabel::ClarabelSolver;
use super::settings::{Settings, SolverOptions};
use super::status::SolveStatus;
use super::stuffing::{EcosData, Sense};
use crate::canon::VariableOffsets;
use crate::constraints::{ConstraintDims, ConstraintSet};
use crate::error::{CanonError, Result};
use crate::expr::LinOp;

/// Lifecycle of a problem record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemState {
    /// Constructed, never solved.
    Unsolved,
    /// Solved at least once.
    Solved,
}

/// Result of a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Solution status.
    pub status: SolveStatus,
    /// Objective value in the caller's sense, offset included.
    ///
    /// Only meaningful when `status.is_optimal()`.
    pub optimal_value: f64,
}

impl Solution {
    /// Combine a raw solver outcome with the objective bookkeeping.
    ///
    /// Only `c` is negated for maximization, so only the solver's cost is
    /// flipped back; the offset is added unchanged in both senses.
    pub fn from_outcome(outcome: SolverOutcome, sense: Sense, offset: f64) -> Self {
        let cost = match sense {
            Sense::Minimize => outcome.pcost,
            Sense::Maximize => -outcome.pcost,
        };
        Solution {
            status: SolveStatus::from_exit_code(outcome.exit_code),
            optimal_value: cost + offset,
        }
    }

    /// The optimal value, if the status says it is meaningful.
    pub fn value(&self) -> Option<f64> {
        self.status.is_optimal().then_some(self.optimal_value)
    }
}

/// A problem assembled into solver arrays with a live solver handle.
#[derive(Debug)]
pub struct EcosProblem<S: ConeSolver = ClarabelSolver> {
    sense: Sense,
    data: EcosData,
    solver: S,
    state: ProblemState,
    last: Option<Solution>,
}

impl EcosProblem<ClarabelSolver> {
    /// Assemble and set up with default settings.
    pub fn new(
        sense: Sense,
        objective: &LinOp,
        constraints: ConstraintSet,
        dims: &ConstraintDims,
        offsets: &VariableOffsets,
        n: usize,
    ) -> Result<Self> {
        Self::with_settings(
            sense,
            objective,
            constraints,
            dims,
            offsets,
            n,
            &Settings::default(),
        )
    }
}

impl<S: ConeSolver> EcosProblem<S> {
    /// Assemble and set up with explicit settings.
    pub fn with_settings(
        sense: Sense,
        objective: &LinOp,
        constraints: ConstraintSet,
        dims: &ConstraintDims,
        offsets: &VariableOffsets,
        n: usize,
        settings: &Settings,
    ) -> Result<Self> {
        let data = EcosData::assemble(sense, objective, constraints, dims, offsets, n)?;
        Self::from_data(sense, data, settings)
    }

    /// Set up the solver on already assembled data.
    ///
    /// The record is checked for consistency first, so hand-built data with
    /// mismatched sizes is rejected before reaching the solver.
    pub fn from_data(sense: Sense, data: EcosData, settings: &Settings) -> Result<Self> {
        data.check()?;
        let solver = S::setup(&data, settings)?;
        Ok(EcosProblem {
            sense,
            data,
            solver,
            state: ProblemState::Unsolved,
            last: None,
        })
    }

    /// Run the solver once.
    ///
    /// `options` are not applied; each one is logged and skipped. Calling
    /// this again reruns the solver on the same handle.
    pub fn solve(&mut self, options: &SolverOptions) -> Solution {
        for (name, value) in options {
            warn!("ignoring solver option {} = {}", name, value);
        }

        info!(
            "solving: n={} m={} p={}",
            self.data.n, self.data.m, self.data.p
        );
        let outcome = self.solver.solve();
        let solution = Solution::from_outcome(outcome, self.sense, self.data.offset);
        info!(
            "exit code {} -> {:?}, value {}",
            outcome.exit_code, solution.status, solution.optimal_value
        );

        self.state = ProblemState::Solved;
        self.last = Some(solution);
        solution
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ProblemState {
        self.state
    }

    /// The assembled solver arrays.
    pub fn data(&self) -> &EcosData {
        &self.data
    }

    /// Objective sense.
    pub fn sense(&self) -> Sense {
        self.sense
    }

    /// Result of the most recent solve.
    pub fn last_solution(&self) -> Option<&Solution> {
        self.last.as_ref()
    }

    /// Primal variable values.
    pub fn variable_values(&self) -> Result<Vec<f64>> {
        Err(CanonError::NotImplemented("primal variable extraction"))
    }

    /// Dual variable values.
    pub fn dual_values(&self) -> Result<Vec<f64>> {
        Err(CanonError::NotImplemented("dual variable extraction"))
    }
}
