//! Matrix stuffing: converts grouped constraint trees into solver arrays.
//!
//! This module builds the objective vector `c`, the equality data `(A, b)`,
//! the inequality data `(G, h)` and the cone dimensions consumed by the
//! external solver, which solves
//!
//! ```text
//! minimize    c'x
//! subject to  A x  = b
//!             G x <=_K h
//! ```
//!
//! Rows of `G` are laid out as linear inequalities, then second-order cones,
//! then exponential cone triples in `(x, z, y)` order.

use log::{debug, trace};
use nalgebra_sparse::CscMatrix;

use crate::canon::{
    build_matrix, format_affine_constrs, format_exp_constrs, format_soc_constrs,
    VariableOffsets,
};
use crate::constraints::{ConstraintDims, ConstraintSet};
use crate::error::{CanonError, Result};
use crate::expr::LinOp;

/// Objective sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sense {
    /// Minimize the objective.
    #[default]
    Minimize,
    /// Maximize the objective.
    Maximize,
}

/// Solver-ready problem data.
#[derive(Debug, Clone)]
pub struct EcosData {
    /// Number of variables.
    pub n: usize,
    /// Number of inequality rows.
    pub m: usize,
    /// Number of equality rows.
    pub p: usize,
    /// Number of linear inequality rows.
    pub l: usize,
    /// Number of second-order cones.
    pub ncones: usize,
    /// Size of each second-order cone.
    pub q: Vec<usize>,
    /// Number of exponential cone triples.
    pub e: usize,
    /// Inequality matrix (m x n).
    pub g: CscMatrix<f64>,
    /// Inequality right-hand side (m).
    pub h: Vec<f64>,
    /// Equality matrix (p x n).
    pub a: CscMatrix<f64>,
    /// Equality right-hand side (p).
    pub b: Vec<f64>,
    /// Objective vector (n), already negated for maximization.
    pub c: Vec<f64>,
    /// Constant term of the objective, never negated.
    pub offset: f64,
}

impl EcosData {
    /// Build the solver arrays from an objective and grouped constraints.
    ///
    /// The objective and every constraint are validated first. `dims` must
    /// agree with the formatted constraints and `offsets` must tile `[0, n)`;
    /// otherwise an error is returned before any solver is touched.
    pub fn assemble(
        sense: Sense,
        objective: &LinOp,
        constraints: ConstraintSet,
        dims: &ConstraintDims,
        offsets: &VariableOffsets,
        n: usize,
    ) -> Result<Self> {
        offsets.validate(n)?;
        if objective.size() != 1 {
            return Err(CanonError::ShapeMismatch {
                expected: "scalar objective".to_string(),
                got: format!("{}", objective.shape),
            });
        }
        objective.check()?;
        constraints.check()?;

        let ConstraintSet { eq, leq, soc, exp } = constraints;
        let eq_rows = format_affine_constrs(eq);
        let leq_rows = format_affine_constrs(leq);
        let soc_rows = format_soc_constrs(soc);
        let exp_rows = format_exp_constrs(exp);

        let counts = RowCounts {
            eq: row_count(&eq_rows),
            leq: row_count(&leq_rows),
            soc: row_count(&soc_rows),
            exp: row_count(&exp_rows),
        };
        trace!(
            "formatted rows: eq={} leq={} soc={} exp={}",
            counts.eq,
            counts.leq,
            counts.soc,
            counts.exp
        );
        counts.check(dims)?;

        let mut ineq_rows = leq_rows;
        ineq_rows.extend(soc_rows);
        ineq_rows.extend(exp_rows);

        let obj_data = build_matrix(std::slice::from_ref(objective), offsets)?;
        let eq_data = build_matrix(&eq_rows, offsets)?;
        let ineq_data = build_matrix(&ineq_rows, offsets)?;

        let mut c = obj_data.dense_row(0, n)?;
        if sense == Sense::Maximize {
            c.iter_mut().for_each(|ci| *ci = -*ci);
        }
        let offset = obj_data.const_vec.first().copied().unwrap_or(0.0);

        let data = EcosData {
            n,
            m: ineq_data.num_constraints,
            p: eq_data.num_constraints,
            l: dims.leq,
            ncones: dims.soc.len(),
            q: dims.soc.clone(),
            e: dims.exp,
            g: ineq_data.to_csc(n)?,
            h: ineq_data.const_vec.iter().map(|v| -v).collect(),
            a: eq_data.to_csc(n)?,
            b: eq_data.const_vec.iter().map(|v| -v).collect(),
            c,
            offset,
        };

        debug!(
            "assembled: n={} m={} p={} l={} ncones={} q={:?} e={} offset={}",
            data.n, data.m, data.p, data.l, data.ncones, data.q, data.e, data.offset
        );

        Ok(data)
    }

    /// Check that sizes, cone dimensions and array lengths agree.
    ///
    /// Always holds for data from [`EcosData::assemble`]; records built by
    /// hand are checked before a solver is set up on them.
    pub fn check(&self) -> Result<()> {
        let mismatch = |what: &str, expected: usize, got: usize| {
            Err(CanonError::DimensionMismatch(format!(
                "{}: expected {}, got {}",
                what, expected, got
            )))
        };
        let expected_m = self.dims().inequality_rows();
        if self.m != expected_m {
            return mismatch("inequality rows", expected_m, self.m);
        }
        if self.ncones != self.q.len() {
            return mismatch("second-order cone count", self.q.len(), self.ncones);
        }
        if self.g.nrows() != self.m || self.h.len() != self.m {
            return mismatch("G and h rows", self.m, self.g.nrows().max(self.h.len()));
        }
        if self.a.nrows() != self.p || self.b.len() != self.p {
            return mismatch("A and b rows", self.p, self.a.nrows().max(self.b.len()));
        }
        let columns = [
            ("c", self.c.len()),
            ("G columns", self.g.ncols()),
            ("A columns", self.a.ncols()),
        ];
        for (what, cols) in columns {
            if cols != self.n {
                return mismatch(what, self.n, cols);
            }
        }
        Ok(())
    }

    /// Cone dimensions of this data.
    pub fn dims(&self) -> ConstraintDims {
        ConstraintDims {
            eq: self.p,
            leq: self.l,
            soc: self.q.clone(),
            exp: self.e,
        }
    }
}

/// Formatted row counts per class.
struct RowCounts {
    eq: usize,
    leq: usize,
    soc: usize,
    exp: usize,
}

impl RowCounts {
    fn check(&self, dims: &ConstraintDims) -> Result<()> {
        let soc_dims: usize = dims.soc.iter().sum();
        let pairs = [
            ("equality", dims.eq, self.eq),
            ("linear inequality", dims.leq, self.leq),
            ("second-order cone", soc_dims, self.soc),
            ("exponential cone", 3 * dims.exp, self.exp),
        ];
        for (class, declared, formatted) in pairs {
            if declared != formatted {
                return Err(CanonError::DimensionMismatch(format!(
                    "{} rows: dims declare {}, constraints format to {}",
                    class, declared, formatted
                )));
            }
        }
        Ok(())
    }
}

fn row_count(rows: &[LinOp]) -> usize {
    rows.iter().map(LinOp::size).sum()
}
