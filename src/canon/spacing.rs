//! Spacing matrices for interleaving row blocks.

use nalgebra_sparse::CscMatrix;

use crate::expr::Shape;
use crate::sparse::Triplets;

/// Sparse matrix sending input row `j` to output row `spacing * j + offset`.
///
/// The result has `shape` and a single `1.0` per column. Applying the
/// matrices for offsets `0..spacing` to `spacing` same-sized blocks and
/// summing interleaves the blocks element by element without overlap.
pub fn spacing_matrix(shape: Shape, spacing: usize, offset: usize) -> CscMatrix<f64> {
    let mut t = Triplets::new(shape.rows(), shape.cols());
    for col in 0..shape.cols() {
        t.push(spacing * col + offset, col, 1.0);
    }
    t.to_csc()
}
