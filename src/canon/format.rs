//! Rewriting constraints into the row layout of the conic standard form.
//!
//! The solver reads inequality rows as `h - G x` in the cone, while the
//! accumulated rows are `G x - h`. Cone constraints therefore enter negated;
//! linear constraints are already in `expr <= 0` / `expr == 0` form and pass
//! through unchanged.

use super::spacing::spacing_matrix;
use crate::constraints::{AffineConstraint, ExpConstraint, SocConstraint};
use crate::expr::{LinOp, Shape};

/// Strip equality or linear-inequality wrappers, keeping order.
pub fn format_affine_constrs(constrs: Vec<AffineConstraint>) -> Vec<LinOp> {
    constrs.into_iter().map(|c| c.expr).collect()
}

/// Negate every cone component and flatten all cones into one row list.
///
/// Cone boundaries survive only through the separately tracked cone sizes.
pub fn format_soc_constrs(constrs: Vec<SocConstraint>) -> Vec<LinOp> {
    constrs
        .into_iter()
        .flat_map(|c| c.args)
        .map(LinOp::neg)
        .collect()
}

/// One interleaved block per constraint, arguments taken in (x, z, y) order.
pub fn format_exp_constrs(constrs: Vec<ExpConstraint>) -> Vec<LinOp> {
    constrs
        .into_iter()
        .map(|c| format_elementwise(vec![c.x, c.z, c.y]))
        .collect()
}

/// Build `-sum_i(S_i * vars[i])` where `S_i` sends row `r` of `vars[i]` to
/// row `k * r + i` of the result, `k = vars.len()`.
///
/// All `vars` must share one shape.
pub fn format_elementwise(vars: Vec<LinOp>) -> LinOp {
    let spacing = vars.len();
    let (rows, cols) = vars
        .first()
        .map(|v| (v.shape.rows(), v.shape.cols()))
        .unwrap_or((0, 0));
    let mat_shape = Shape::matrix(spacing * rows, rows);
    let prod_shape = Shape::matrix(spacing * rows, cols);

    let terms = vars
        .into_iter()
        .enumerate()
        .map(|(i, var)| {
            let mat = spacing_matrix(mat_shape, spacing, i);
            LinOp::mul_with_shape(mat, var, prod_shape)
        })
        .collect();

    LinOp::neg(LinOp::sum(terms))
}
