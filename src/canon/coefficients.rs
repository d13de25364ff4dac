//! Bottom-up evaluation of a linear operator tree into coefficient form.
//!
//! Every operator is a linear map on the column-major vectorisation of its
//! child, so evaluation multiplies the child's coefficient blocks and
//! constant by that map. Leaves seed the recursion: a variable contributes
//! an identity block, a constant contributes only to the constant vector.

use nalgebra_sparse::CscMatrix;

use super::lin_expr::LinExpr;
use crate::expr::{Array, LinOp, OpKind, Shape};
use crate::sparse::{csc_diag, csc_kron_identity, csc_ones, Triplets};

/// Evaluate a tree into `sum_i(A_i * vec(x_i)) + c`.
pub fn get_coefficients(op: &LinOp) -> LinExpr {
    match &op.kind {
        OpKind::Variable(id) => LinExpr::variable(*id, op.size()),
        OpKind::Constant(value) => LinExpr::constant(value.to_column_major()),

        OpKind::Neg => child(op, 0).neg(),
        OpKind::Div(divisor) => child(op, 0).scale(1.0 / divisor),
        OpKind::Mul(lhs) => match lhs.as_scalar() {
            Some(s) => child(op, 0).scale(s),
            None => child(op, 0).apply(&mul_matrix(lhs, op.args[0].shape)),
        },
        OpKind::MulElem(data) => match data.as_scalar() {
            Some(s) => child(op, 0).scale(s),
            None => child(op, 0).apply(&csc_diag(&data.to_column_major())),
        },
        OpKind::Sum => op
            .args
            .iter()
            .map(get_coefficients)
            .fold(LinExpr::zeros(op.size()), LinExpr::add),
        OpKind::Promote => child(op, 0).apply(&csc_ones(op.size(), 1)),
        OpKind::SumEntries => {
            let n = op.args[0].size();
            child(op, 0).apply(&csc_ones(1, n))
        }
        OpKind::Reshape => child(op, 0),
        OpKind::Transpose => child(op, 0).apply(&transpose_matrix(op.args[0].shape)),
        OpKind::VStack => stack(op, |arg, offset| vstack_matrix(arg, offset, op.shape)),
        // Each hstack argument is a contiguous run of the output.
        OpKind::HStack => stack(op, |arg, offset| {
            shift_matrix(arg.size(), offset * op.shape.rows(), op.size())
        }),
    }
}

fn child(op: &LinOp, i: usize) -> LinExpr {
    get_coefficients(&op.args[i])
}

/// Sum of children, each placed by its own selection matrix.
///
/// `place` receives the child shape and the running row (vstack) or column
/// (hstack) offset.
fn stack<F>(op: &LinOp, place: F) -> LinExpr
where
    F: Fn(Shape, usize) -> CscMatrix<f64>,
{
    let vertical = matches!(op.kind, OpKind::VStack);
    let mut offset = 0;
    let mut acc = LinExpr::zeros(op.size());
    for arg in &op.args {
        let block = get_coefficients(arg).apply(&place(arg.shape, offset));
        acc = acc.add(block);
        offset += if vertical {
            arg.shape.rows()
        } else {
            arg.shape.cols()
        };
    }
    acc
}

/// `vec(A X) = (I_cols ⊗ A) vec(X)` for an operand of shape `arg`.
fn mul_matrix(lhs: &Array, arg: Shape) -> CscMatrix<f64> {
    csc_kron_identity(arg.cols(), &lhs.to_csc())
}

/// Permutation taking `vec(X)` to `vec(X^T)`.
fn transpose_matrix(arg: Shape) -> CscMatrix<f64> {
    let (r, c) = (arg.rows(), arg.cols());
    let mut t = Triplets::new(r * c, r * c);
    for j in 0..c {
        for i in 0..r {
            t.push(i * c + j, j * r + i, 1.0);
        }
    }
    t.to_csc()
}

/// Places a child of shape `arg` at row `row_offset` of a `out` node.
fn vstack_matrix(arg: Shape, row_offset: usize, out: Shape) -> CscMatrix<f64> {
    let mut t = Triplets::new(out.size(), arg.size());
    for j in 0..arg.cols() {
        for i in 0..arg.rows() {
            t.push(out.linear_index(row_offset + i, j), arg.linear_index(i, j), 1.0);
        }
    }
    t.to_csc()
}

/// Embeds `n` rows at `offset` of a `total`-row vector.
fn shift_matrix(n: usize, offset: usize, total: usize) -> CscMatrix<f64> {
    let mut t = Triplets::new(total, n);
    for k in 0..n {
        t.push(offset + k, k, 1.0);
    }
    t.to_csc()
}
