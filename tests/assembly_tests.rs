//! Assembly tests: the arrays handed to the solver, checked without solving.

use cvxcanon::canon::{
    build_matrix, format_exp_constrs, format_soc_constrs, spacing_matrix, VariableOffsets,
};
use cvxcanon::constraints::{ExpConstraint, SocConstraint};
use cvxcanon::prelude::*;
use cvxcanon::sparse::csc_to_dense;
use nalgebra::DMatrix;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn offsets_for(exprs: &[&LinOp]) -> VariableOffsets {
    let mut vars: Vec<_> = exprs.iter().flat_map(|e| e.variables()).collect();
    vars.sort_by_key(|(id, _)| *id);
    vars.dedup_by_key(|(id, _)| *id);
    VariableOffsets::from_vars(&vars)
}

fn assemble(sense: Sense, objective: &LinOp, constraints: Vec<Constraint>) -> EcosData {
    let mut exprs = vec![objective];
    for c in &constraints {
        exprs.extend(c.expressions());
    }
    let offsets = offsets_for(&exprs);
    let set: ConstraintSet = constraints.into_iter().collect();
    let dims = ConstraintDims::from_constraints(&set);
    EcosData::assemble(sense, objective, set, &dims, &offsets, offsets.total_vars)
        .expect("assembly should succeed")
}

// ============================================================================
// Column placement and row counts
// ============================================================================

#[test]
fn test_coefficients_land_in_variable_columns() {
    init_logger();
    let x = variable(2);
    let y = variable(3);
    let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let expr = x.clone() + LinOp::mul(a.clone(), y.clone());
    let offsets = offsets_for(&[&x, &y]);

    let data = build_matrix(&[expr], &offsets).unwrap();
    let dense = csc_to_dense(&data.to_csc(5).unwrap());
    let (xs, _) = offsets.get(x.variable_id().unwrap()).unwrap();
    let (ys, _) = offsets.get(y.variable_id().unwrap()).unwrap();

    for i in 0..2 {
        for j in 0..2 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(dense[(i, xs + j)], expected);
        }
        for j in 0..3 {
            assert_eq!(dense[(i, ys + j)], a[(i, j)]);
        }
    }
}

#[test]
fn test_disjoint_variables_write_disjoint_columns() {
    let x = variable(3);
    let y = variable(2);
    let offsets = offsets_for(&[&x, &y]);
    let data = build_matrix(&[x.clone(), y.clone()], &offsets).unwrap();

    let (xs, xn) = offsets.get(x.variable_id().unwrap()).unwrap();
    let (ys, yn) = offsets.get(y.variable_id().unwrap()).unwrap();
    for (&row, &col) in data.coeffs.rows().iter().zip(data.coeffs.cols()) {
        if row < 3 {
            assert!((xs..xs + xn).contains(&col));
        } else {
            assert!((ys..ys + yn).contains(&col));
        }
    }
}

#[test]
fn test_row_count_is_sum_of_sizes() {
    let x = variable((2, 3));
    let y = variable(4);
    let exprs = vec![
        x.clone(),
        LinOp::transpose(x.clone()),
        y.clone(),
        LinOp::sum_entries(y.clone()),
        constant_vec(vec![1.0, 2.0]),
    ];
    let offsets = offsets_for(&[&x, &y]);
    let data = build_matrix(&exprs, &offsets).unwrap();

    assert_eq!(data.num_constraints, 6 + 6 + 4 + 1 + 2);
    assert_eq!(data.const_vec.len(), data.num_constraints);
    // the trailing constant occupies the last two rows
    assert_eq!(&data.const_vec[17..], &[1.0, 2.0]);
}

#[test]
fn test_unknown_variable_is_reported() {
    let x = variable(2);
    let offsets = VariableOffsets::new();
    assert!(matches!(
        build_matrix(&[x], &offsets),
        Err(CanonError::UnknownVariable(_))
    ));
}

// ============================================================================
// Sign conventions
// ============================================================================

#[test]
fn test_negation_commutes_with_accumulation() {
    let x = variable(3);
    let a = DMatrix::from_row_slice(2, 3, &[1.0, -2.0, 0.5, 3.0, 0.0, -1.0]);
    let expr = LinOp::mul(a, x.clone()) + constant_vec(vec![4.0, -5.0]);
    let offsets = offsets_for(&[&x]);

    let plain = build_matrix(&[expr.clone()], &offsets).unwrap();
    let negated = build_matrix(&[-expr], &offsets).unwrap();

    assert_eq!(
        csc_to_dense(&negated.to_csc(3).unwrap()),
        -csc_to_dense(&plain.to_csc(3).unwrap())
    );
    let flipped: Vec<f64> = plain.const_vec.iter().map(|v| -v).collect();
    assert_eq!(negated.const_vec, flipped);
}

#[test]
fn test_soc_rows_are_negated() {
    // components evaluate to [a, b, c] = [t + 1, x0 + 2, x1 + 3]
    let t = variable(());
    let x = variable(2);
    let offsets = offsets_for(&[&t, &x]);
    let cone = SocConstraint::new(vec![
        t.clone() + constant(1.0),
        x.clone() + constant_vec(vec![2.0, 3.0]),
    ]);

    let data = build_matrix(&format_soc_constrs(vec![cone]), &offsets).unwrap();
    assert_eq!(data.const_vec, vec![-1.0, -2.0, -3.0]);
    let g = csc_to_dense(&data.to_csc(3).unwrap());
    assert_eq!(g, -DMatrix::<f64>::identity(3, 3));
}

#[test]
fn test_exp_block_interleaves_x_z_y() {
    let x = variable(());
    let y = variable(());
    let z = variable(());
    let offsets = offsets_for(&[&x, &y, &z]);
    let col = |v: &LinOp| offsets.offset(v.variable_id().unwrap()).unwrap();

    let rows = format_exp_constrs(vec![ExpConstraint::new(x.clone(), y.clone(), z.clone())]);
    let data = build_matrix(&rows, &offsets).unwrap();
    let g = csc_to_dense(&data.to_csc(3).unwrap());

    assert_eq!(g[(0, col(&x))], -1.0);
    assert_eq!(g[(1, col(&z))], -1.0);
    assert_eq!(g[(2, col(&y))], -1.0);
    for r in 0..3 {
        assert_eq!(g.row(r).iter().filter(|v| **v != 0.0).count(), 1);
    }
}

#[test]
fn test_spacing_matrix_has_one_entry_per_column() {
    let shape = Shape::matrix(6, 2);
    for offset in 0..3 {
        let dense = csc_to_dense(&spacing_matrix(shape, 3, offset));
        for j in 0..2 {
            for i in 0..6 {
                let expected = if i == 3 * j + offset { 1.0 } else { 0.0 };
                assert_eq!(dense[(i, j)], expected);
            }
        }
    }
}

// ============================================================================
// Status table
// ============================================================================

#[test]
fn test_status_table_is_total() {
    let expected = [
        (0, SolveStatus::Optimal),
        (1, SolveStatus::Infeasible),
        (2, SolveStatus::Unbounded),
        (10, SolveStatus::OptimalInaccurate),
        (11, SolveStatus::InfeasibleInaccurate),
        (12, SolveStatus::UnboundedInaccurate),
    ];
    for code in -10..=20 {
        let status = SolveStatus::from_exit_code(code);
        match expected.iter().find(|(c, _)| *c == code) {
            Some((_, s)) => assert_eq!(status, *s),
            None => assert_eq!(status, SolveStatus::SolverError, "code {}", code),
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_minimize_x_subject_to_x_geq_one() {
    init_logger();
    let x = variable(());
    let data = assemble(Sense::Minimize, &x, vec![x.clone().geq(constant(1.0))]);

    assert_eq!((data.n, data.m, data.l, data.p), (1, 1, 1, 0));
    assert_eq!((data.ncones, data.e), (0, 0));
    assert_eq!(data.c, vec![1.0]);
    assert_eq!(csc_to_dense(&data.g), DMatrix::from_element(1, 1, -1.0));
    assert_eq!(data.h, vec![-1.0]);
    assert_eq!((data.a.nrows(), data.a.ncols()), (0, 1));
    assert!(data.b.is_empty());
    assert_eq!(data.offset, 0.0);
}

#[test]
fn test_maximize_x_subject_to_x_leq_five() {
    init_logger();
    let x = variable(());
    let data = assemble(Sense::Maximize, &x, vec![x.clone().leq(constant(5.0))]);

    assert_eq!(data.c, vec![-1.0]);
    assert_eq!(csc_to_dense(&data.g), DMatrix::from_element(1, 1, 1.0));
    assert_eq!(data.h, vec![5.0]);
}

#[test]
fn test_mixed_cone_layout() {
    init_logger();
    let t = variable(());
    let x = variable(3);
    let u = variable(2);
    let data = assemble(
        Sense::Minimize,
        &(t.clone() + constant(7.0)),
        vec![
            Constraint::exp(
                u.clone(),
                constant_vec(vec![1.0, 1.0]),
                constant_vec(vec![2.0, 2.0]),
            ),
            Constraint::soc(t.clone(), x.clone()),
            x.clone().equals(constant_vec(vec![1.0, 2.0, 3.0])),
            u.leq(constant(0.5)),
        ],
    );

    assert_eq!(data.n, 6);
    assert_eq!(data.p, 3);
    assert_eq!(data.l, 2);
    assert_eq!(data.q, vec![4]);
    assert_eq!(data.ncones, 1);
    assert_eq!(data.e, 2);
    assert_eq!(data.m, 2 + 4 + 6);
    assert_eq!(data.b, vec![1.0, 2.0, 3.0]);
    assert_eq!(data.offset, 7.0);
    // two interleaved triples: (u_i, 2, 1)
    assert_eq!(&data.h[6..], &[0.0, 2.0, 1.0, 0.0, 2.0, 1.0]);
}
