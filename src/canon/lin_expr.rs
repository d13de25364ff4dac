//! Affine expressions in coefficient form.
//!
//! A vectorised node of size `k` is represented as
//! `sum_i(A_i * vec(x_i)) + c`, where each `A_i` is a sparse `k x size(x_i)`
//! block keyed by variable ID and `c` is a dense vector of length `k`.

use std::collections::HashMap;

use nalgebra_sparse::CscMatrix;

use crate::expr::VarId;
use crate::sparse::{csc_add, csc_matmul, csc_matvec, csc_neg, csc_scale};

/// An affine expression: sum_i(A_i * x_i) + c
#[derive(Debug, Clone)]
pub struct LinExpr {
    /// Coefficient matrices for each variable: var_id -> coefficient matrix.
    /// The coefficient matrix A_i has shape (size, var_size).
    pub coeffs: HashMap<VarId, CscMatrix<f64>>,
    /// Constant term, one entry per output row.
    pub constant: Vec<f64>,
}

impl LinExpr {
    /// Create a zero expression with `size` rows.
    pub fn zeros(size: usize) -> Self {
        LinExpr {
            coeffs: HashMap::new(),
            constant: vec![0.0; size],
        }
    }

    /// Create the expression for a variable (identity coefficient).
    pub fn variable(var_id: VarId, size: usize) -> Self {
        let mut coeffs = HashMap::new();
        coeffs.insert(var_id, CscMatrix::identity(size));
        LinExpr {
            coeffs,
            constant: vec![0.0; size],
        }
    }

    /// Create a constant expression from column-major values.
    pub fn constant(values: Vec<f64>) -> Self {
        LinExpr {
            coeffs: HashMap::new(),
            constant: values,
        }
    }

    /// Check if this is a constant (no variables).
    pub fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Number of output rows.
    pub fn size(&self) -> usize {
        self.constant.len()
    }

    /// Add two expressions with the same number of rows.
    pub fn add(mut self, other: LinExpr) -> LinExpr {
        for (var_id, coeff) in other.coeffs {
            match self.coeffs.get_mut(&var_id) {
                Some(existing) => *existing = csc_add(existing, &coeff),
                None => {
                    self.coeffs.insert(var_id, coeff);
                }
            }
        }
        for (c, o) in self.constant.iter_mut().zip(&other.constant) {
            *c += o;
        }
        self
    }

    /// Negate every coefficient and constant.
    pub fn neg(self) -> LinExpr {
        LinExpr {
            coeffs: self.coeffs.iter().map(|(k, v)| (*k, csc_neg(v))).collect(),
            constant: self.constant.iter().map(|c| -c).collect(),
        }
    }

    /// Scale by a scalar.
    pub fn scale(self, scalar: f64) -> LinExpr {
        LinExpr {
            coeffs: self
                .coeffs
                .iter()
                .map(|(k, v)| (*k, csc_scale(v, scalar)))
                .collect(),
            constant: self.constant.iter().map(|c| c * scalar).collect(),
        }
    }

    /// Left-multiply by a linear map `op` of shape (new_size, size).
    pub fn apply(self, op: &CscMatrix<f64>) -> LinExpr {
        LinExpr {
            coeffs: self
                .coeffs
                .iter()
                .map(|(k, v)| (*k, csc_matmul(op, v)))
                .collect(),
            constant: csc_matvec(op, &self.constant),
        }
    }

    /// Get all variable IDs in this expression.
    pub fn variables(&self) -> Vec<VarId> {
        let mut vars: Vec<_> = self.coeffs.keys().copied().collect();
        vars.sort();
        vars
    }
}
