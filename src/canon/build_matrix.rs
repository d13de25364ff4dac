//! Accumulation of many expression trees into one sparse coefficient matrix.
//!
//! Trees are evaluated in order; tree `k` occupies the rows following tree
//! `k - 1`, and each variable's block lands at its column offset. The
//! result is kept in triplet form until [`ProblemData::to_csc`].

use log::trace;
use nalgebra_sparse::CscMatrix;

use super::coefficients::get_coefficients;
use super::offsets::VariableOffsets;
use crate::error::{CanonError, Result};
use crate::expr::LinOp;
use crate::sparse::{csc_from_triplets, Triplets};

/// Triplet-form coefficients plus a row-aligned constant vector.
#[derive(Debug, Clone, Default)]
pub struct ProblemData {
    /// Coefficient entries at global (row, variable column) positions.
    ///
    /// The matrix dimensions are fixed only when compacting.
    pub coeffs: Triplets,
    /// Constant term of every row.
    pub const_vec: Vec<f64>,
    /// Number of rows accumulated.
    pub num_constraints: usize,
}

impl ProblemData {
    /// Compact into an `num_constraints x num_variables` CSC matrix.
    ///
    /// Duplicate (row, col) entries are summed. An entry in a column at or
    /// past `num_variables` is reported, never dropped.
    pub fn to_csc(&self, num_variables: usize) -> Result<CscMatrix<f64>> {
        csc_from_triplets(
            self.num_constraints,
            num_variables,
            self.coeffs.rows(),
            self.coeffs.cols(),
            self.coeffs.vals(),
        )
        .map_err(|e| {
            CanonError::InvalidOffsets(format!(
                "coefficients do not fit {} columns: {}",
                num_variables, e
            ))
        })
    }

    /// Dense row `row` of the coefficients, length `num_variables`.
    ///
    /// Used for the objective, which is a single row.
    pub fn dense_row(&self, row: usize, num_variables: usize) -> Result<Vec<f64>> {
        let mut out = vec![0.0; num_variables];
        let entries = self
            .coeffs
            .rows()
            .iter()
            .zip(self.coeffs.cols())
            .zip(self.coeffs.vals());
        for ((&r, &c), &v) in entries {
            if r != row {
                continue;
            }
            let slot = out.get_mut(c).ok_or_else(|| {
                CanonError::InvalidOffsets(format!(
                    "column {} is outside the {} problem columns",
                    c, num_variables
                ))
            })?;
            *slot += v;
        }
        Ok(out)
    }
}

/// Accumulate `exprs` into one triplet matrix and constant vector.
///
/// Rows are concatenated in input order; the row count is the sum of each
/// tree's `rows * cols`. Every leaf must span exactly the columns its offset
/// entry registers.
pub fn build_matrix(exprs: &[LinOp], offsets: &VariableOffsets) -> Result<ProblemData> {
    let mut data = ProblemData::default();

    for expr in exprs {
        let row_offset = data.num_constraints;
        let lin = get_coefficients(expr);

        for var_id in lin.variables() {
            let (col_offset, size) = offsets
                .get(var_id)
                .ok_or(CanonError::UnknownVariable(var_id))?;
            let block = &lin.coeffs[&var_id];
            if block.ncols() != size {
                return Err(CanonError::InvalidOffsets(format!(
                    "variable {:?} spans {} columns but {} are registered",
                    var_id,
                    block.ncols(),
                    size
                )));
            }
            data.coeffs.extend_shifted(block, row_offset, col_offset);
        }

        data.const_vec.extend_from_slice(&lin.constant);
        data.num_constraints += expr.size();
    }

    trace!(
        "built {} rows with {} entries from {} expressions",
        data.num_constraints,
        data.coeffs.len(),
        exprs.len()
    );
    Ok(data)
}
