//! Clarabel solver integration.
//!
//! Clarabel solves `min q'x  s.t.  A x + s = b, s in K` with the cone
//! product `K` listed in row order. The equality rows become a zero cone
//! stacked above the inequality rows, and each exponential triple is
//! permuted from `(x, z, y)` to Clarabel's `(x, y, z)`.

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use log::debug;
use nalgebra_sparse::{CooMatrix, CscMatrix};

use super::backend::{ConeSolver, SolverOutcome};
use super::settings::Settings;
use super::status::exit_code;
use super::stuffing::EcosData;
use crate::error::{CanonError, Result};

/// Map a Clarabel status to the equivalent exit code.
pub fn status_to_exit_code(status: SolverStatus) -> i64 {
    match status {
        SolverStatus::Solved => exit_code::OPTIMAL,
        SolverStatus::PrimalInfeasible => exit_code::PRIMAL_INFEASIBLE,
        SolverStatus::DualInfeasible => exit_code::DUAL_INFEASIBLE,
        SolverStatus::AlmostSolved => exit_code::OPTIMAL + exit_code::INACCURATE_OFFSET,
        SolverStatus::AlmostPrimalInfeasible => {
            exit_code::PRIMAL_INFEASIBLE + exit_code::INACCURATE_OFFSET
        }
        SolverStatus::AlmostDualInfeasible => {
            exit_code::DUAL_INFEASIBLE + exit_code::INACCURATE_OFFSET
        }
        SolverStatus::MaxIterations | SolverStatus::MaxTime => exit_code::MAX_ITERATIONS,
        SolverStatus::NumericalError | SolverStatus::InsufficientProgress => exit_code::NUMERICS,
        _ => exit_code::FATAL,
    }
}

/// Clarabel-backed [`ConeSolver`].
///
/// A problem with no variables and no constraint rows never reaches
/// Clarabel: its only point is the empty vector, so it is optimal with cost
/// zero. No variables under constraint rows is a setup error.
pub struct ClarabelSolver {
    solver: Option<DefaultSolver<f64>>,
}

impl std::fmt::Debug for ClarabelSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClarabelSolver")
            .field("status", &self.solver.as_ref().map(|s| s.solution.status))
            .finish()
    }
}

impl ConeSolver for ClarabelSolver {
    fn setup(data: &EcosData, settings: &Settings) -> Result<Self> {
        let n = data.n;
        if n == 0 {
            let rows = data.p + data.m;
            if rows > 0 {
                return Err(CanonError::SolverError(format!(
                    "{} constraint rows over no variables",
                    rows
                )));
            }
            debug!("clarabel setup skipped: empty problem");
            return Ok(ClarabelSolver { solver: None });
        }
        let p = ClarabelCsc::<f64>::spalloc((n, n), 0);
        let a = to_clarabel_csc(&stack_constraints(data));
        let b = stack_rhs(data);
        let cones = to_clarabel_cones(data);

        let clarabel_settings = DefaultSettingsBuilder::default()
            .verbose(settings.verbose)
            .max_iter(settings.max_iter)
            .time_limit(settings.time_limit)
            .tol_gap_abs(settings.tol_gap_abs)
            .tol_gap_rel(settings.tol_gap_rel)
            .build()
            .map_err(|e| CanonError::SolverError(e.to_string()))?;

        debug!(
            "clarabel setup: n={} rows={} cones={}",
            n,
            b.len(),
            cones.len()
        );
        let solver = DefaultSolver::new(&p, &data.c, &a, &b, &cones, clarabel_settings)
            .map_err(|e| CanonError::SolverError(e.to_string()))?;
        Ok(ClarabelSolver {
            solver: Some(solver),
        })
    }

    fn solve(&mut self) -> SolverOutcome {
        let Some(solver) = self.solver.as_mut() else {
            return SolverOutcome {
                exit_code: exit_code::OPTIMAL,
                pcost: 0.0,
            };
        };
        solver.solve();
        let solution = &solver.solution;
        debug!(
            "clarabel finished: {:?} after {} iterations",
            solution.status, solution.iterations
        );
        SolverOutcome {
            exit_code: status_to_exit_code(solution.status),
            pcost: solution.obj_val,
        }
    }
}

/// Row of the stacked constraint matrix that inequality row `row` lands on.
fn inequality_target(data: &EcosData, row: usize) -> usize {
    let exp_start = data.m - 3 * data.e;
    let row = if row >= exp_start {
        match (row - exp_start) % 3 {
            1 => row + 1,
            2 => row - 1,
            _ => row,
        }
    } else {
        row
    };
    data.p + row
}

/// Stack `[A; G]` with exponential triples reordered.
fn stack_constraints(data: &EcosData) -> CscMatrix<f64> {
    let mut coo = CooMatrix::new(data.p + data.m, data.n);
    for (row, col, val) in data.a.triplet_iter() {
        coo.push(row, col, *val);
    }
    for (row, col, val) in data.g.triplet_iter() {
        coo.push(inequality_target(data, row), col, *val);
    }
    CscMatrix::from(&coo)
}

/// Stack `[b; h]` with exponential triples reordered.
fn stack_rhs(data: &EcosData) -> Vec<f64> {
    let mut rhs = vec![0.0; data.p + data.m];
    rhs[..data.p].copy_from_slice(&data.b);
    for (row, &val) in data.h.iter().enumerate() {
        rhs[inequality_target(data, row)] = val;
    }
    rhs
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}

/// Convert cone dimensions to Clarabel cones.
fn to_clarabel_cones(data: &EcosData) -> Vec<SupportedConeT<f64>> {
    let mut cones = Vec::new();

    if data.p > 0 {
        cones.push(SupportedConeT::ZeroConeT(data.p));
    }

    if data.l > 0 {
        cones.push(SupportedConeT::NonnegativeConeT(data.l));
    }

    for &soc_dim in &data.q {
        cones.push(SupportedConeT::SecondOrderConeT(soc_dim));
    }

    for _ in 0..data.e {
        cones.push(SupportedConeT::ExponentialConeT());
    }

    cones
}
