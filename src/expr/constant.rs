//! Constant leaf creation.

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use super::linop::{Array, LinOp};
use super::shape::Shape;

/// Create a scalar constant.
pub fn constant(value: f64) -> LinOp {
    LinOp::constant(Array::Scalar(value))
}

/// Create a column vector constant.
pub fn constant_vec(values: Vec<f64>) -> LinOp {
    let n = values.len();
    LinOp::constant(Array::Dense(DMatrix::from_vec(n, 1, values)))
}

/// Create a dense matrix constant from column-major values.
pub fn constant_matrix(values: Vec<f64>, rows: usize, cols: usize) -> LinOp {
    LinOp::constant(Array::Dense(DMatrix::from_vec(rows, cols, values)))
}

/// Create a constant from a nalgebra DMatrix.
pub fn constant_dmatrix(matrix: DMatrix<f64>) -> LinOp {
    LinOp::constant(Array::Dense(matrix))
}

/// Create a constant from a sparse CSC matrix.
pub fn constant_sparse(matrix: CscMatrix<f64>) -> LinOp {
    LinOp::constant(Array::Sparse(matrix))
}

/// Create a zero constant with the given shape.
pub fn zeros(shape: impl Into<Shape>) -> LinOp {
    filled(shape.into(), 0.0)
}

/// Create a ones constant with the given shape.
pub fn ones(shape: impl Into<Shape>) -> LinOp {
    filled(shape.into(), 1.0)
}

fn filled(shape: Shape, value: f64) -> LinOp {
    if shape.is_scalar() {
        constant(value)
    } else {
        constant_dmatrix(DMatrix::from_element(shape.rows(), shape.cols(), value))
    }
}
