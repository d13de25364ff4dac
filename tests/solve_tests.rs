//! End-to-end solve tests through the Clarabel backend.
//!
//! Cases are defined as data and run programmatically; each builds a problem
//! and states the optimal value it must reach.

use cvxcanon::prelude::*;
use nalgebra::DMatrix;

/// Tolerance for comparing floating point results
const TOL: f64 = 1e-4;

/// A test case definition
struct TestCase {
    name: &'static str,
    /// Function that builds the problem and returns (problem, expected_value)
    build: fn() -> (Problem, f64),
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn sum(x: &LinOp) -> LinOp {
    LinOp::sum_entries(x.clone())
}

fn column(values: &[f64]) -> DMatrix<f64> {
    DMatrix::from_column_slice(values.len(), 1, values)
}

/// All minimize test cases
fn minimize_test_cases() -> Vec<TestCase> {
    vec![
        // ========== Linear Programs ==========
        TestCase {
            name: "scalar_lower_bound",
            build: || {
                // minimize x s.t. x >= 1
                let x = variable(());
                let prob = Problem::minimize(x.clone())
                    .subject_to([x.geq(constant(1.0))])
                    .build();
                (prob, 1.0)
            },
        },
        TestCase {
            name: "sum_nonneg_constraint",
            build: || {
                // minimize sum(x) s.t. x >= 1, x in R^5
                let x = variable(5);
                let prob = Problem::minimize(sum(&x))
                    .subject_to([x.geq(constant(1.0))])
                    .build();
                (prob, 5.0)
            },
        },
        TestCase {
            name: "sum_equality_constraint",
            build: || {
                // minimize sum(x) s.t. x == 2, x in R^3
                let x = variable(3);
                let prob = Problem::minimize(sum(&x))
                    .subject_to([x.equals(constant(2.0))])
                    .build();
                (prob, 6.0)
            },
        },
        TestCase {
            name: "sum_upper_bound",
            build: || {
                // minimize -sum(x) s.t. x <= 3, x in R^4
                let x = variable(4);
                let prob = Problem::minimize(-sum(&x))
                    .subject_to([x.leq(constant(3.0))])
                    .build();
                (prob, -12.0)
            },
        },
        TestCase {
            name: "weighted_sum",
            build: || {
                // minimize [1 2 3] x s.t. x >= 1
                let x = variable(3);
                let weights = DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]);
                let prob = Problem::minimize(LinOp::mul(weights, x.clone()))
                    .subject_to([x.geq(constant(1.0))])
                    .build();
                (prob, 6.0)
            },
        },
        TestCase {
            name: "objective_offset",
            build: || {
                // minimize x + 3 s.t. x >= 1
                let x = variable(());
                let prob = Problem::minimize(x.clone() + constant(3.0))
                    .subject_to([x.geq(constant(1.0))])
                    .build();
                (prob, 4.0)
            },
        },
        TestCase {
            name: "matrix_multiply",
            build: || {
                // minimize sum(A x) s.t. x >= 1, A = [[1, 2], [3, 4]]
                let x = variable(2);
                let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]);
                let prob = Problem::minimize(sum(&LinOp::mul(a, x.clone())))
                    .subject_to([x.geq(constant(1.0))])
                    .build();
                (prob, 10.0)
            },
        },
        TestCase {
            name: "elementwise_scaling",
            build: || {
                // minimize sum(x) s.t. [2, 4] .* x >= [2, 8]
                let x = variable(2);
                let scaled = LinOp::mul_elem(column(&[2.0, 4.0]), x.clone());
                let prob = Problem::minimize(sum(&x))
                    .subject_to([scaled.geq(constant_vec(vec![2.0, 8.0]))])
                    .build();
                (prob, 3.0)
            },
        },
        TestCase {
            name: "division",
            build: || {
                // minimize x / 2 s.t. x >= 4
                let x = variable(());
                let prob = Problem::minimize(LinOp::div(x.clone(), 2.0))
                    .subject_to([x.geq(constant(4.0))])
                    .build();
                (prob, 2.0)
            },
        },
        TestCase {
            name: "promote",
            build: || {
                // minimize t s.t. [t, t, t] >= [1, 5, 2]
                let t = variable(());
                let prob = Problem::minimize(t.clone())
                    .subject_to([LinOp::promote(t, 3).geq(constant_vec(vec![1.0, 5.0, 2.0]))])
                    .build();
                (prob, 5.0)
            },
        },
        TestCase {
            name: "transpose",
            build: || {
                // minimize sum(x') s.t. x >= 1, x in R^{2x3}
                let x = variable((2, 3));
                let prob = Problem::minimize(sum(&LinOp::transpose(x.clone())))
                    .subject_to([x.geq(constant(1.0))])
                    .build();
                (prob, 6.0)
            },
        },
        TestCase {
            name: "transpose_in_constraint",
            build: || {
                // x' >= B with B 3x2; minimize sum(x)
                let x = variable((2, 3));
                let b = constant_matrix(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 3, 2);
                let prob = Problem::minimize(sum(&x))
                    .subject_to([LinOp::transpose(x).geq(b)])
                    .build();
                (prob, 21.0)
            },
        },
        TestCase {
            name: "reshape",
            build: || {
                // reshape(x, 4) >= [1, 2, 3, 4], x in R^{2x2}
                let x = variable((2, 2));
                let prob = Problem::minimize(sum(&x))
                    .subject_to([LinOp::reshape(x, 4).geq(constant_vec(vec![1.0, 2.0, 3.0, 4.0]))])
                    .build();
                (prob, 10.0)
            },
        },
        TestCase {
            name: "vstack",
            build: || {
                // minimize sum([x; y]) s.t. x >= 1 (R^2), y >= 2 (R^3)
                let x = variable(2);
                let y = variable(3);
                let stacked = LinOp::vstack(vec![x.clone(), y.clone()]);
                let prob = Problem::minimize(sum(&stacked))
                    .subject_to([x.geq(constant(1.0)), y.geq(constant(2.0))])
                    .build();
                (prob, 8.0)
            },
        },
        TestCase {
            name: "hstack",
            build: || {
                // [x y] >= [[1, 3], [2, 4]]
                let x = variable(2);
                let y = variable(2);
                let stacked = LinOp::hstack(vec![x.clone(), y.clone()]);
                let rhs = constant_matrix(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
                let prob = Problem::minimize(sum(&x) + sum(&y))
                    .subject_to([stacked.geq(rhs)])
                    .build();
                (prob, 10.0)
            },
        },
        TestCase {
            name: "tight_equalities",
            build: || {
                // x1 + x2 = 3, x1 - x2 = 1
                let x = variable(2);
                let ones = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
                let diff = DMatrix::from_row_slice(1, 2, &[1.0, -1.0]);
                let prob = Problem::minimize(LinOp::mul(ones.clone(), x.clone()))
                    .subject_to([
                        LinOp::mul(ones, x.clone()).equals(constant(3.0)),
                        LinOp::mul(diff, x).equals(constant(1.0)),
                    ])
                    .build();
                (prob, 3.0)
            },
        },
        // ========== Second-Order Cone Programs ==========
        TestCase {
            name: "norm2_with_sum_equality",
            build: || {
                // minimize t s.t. ||x||_2 <= t, sum(x) == 2, x in R^2
                let t = variable(());
                let x = variable(2);
                let prob = Problem::minimize(t.clone())
                    .subject_to([Constraint::soc(t, x.clone()), sum(&x).equals(constant(2.0))])
                    .build();
                (prob, 2.0_f64.sqrt())
            },
        },
        TestCase {
            name: "norm2_distance",
            build: || {
                // minimize t s.t. ||x - [3, 4]||_2 <= t, x == 0
                let t = variable(());
                let x = variable(2);
                let shifted = x.clone() - constant_vec(vec![3.0, 4.0]);
                let prob = Problem::minimize(t.clone())
                    .subject_to([Constraint::soc(t, shifted), x.equals(constant(0.0))])
                    .build();
                (prob, 5.0)
            },
        },
        // ========== Exponential Cone Programs ==========
        TestCase {
            name: "exp_lower_bound",
            build: || {
                // minimize z s.t. 1 * exp(1 / 1) <= z
                let z = variable(());
                let prob = Problem::minimize(z.clone())
                    .subject_to([Constraint::exp(constant(1.0), constant(1.0), z)])
                    .build();
                (prob, 1.0_f64.exp())
            },
        },
        TestCase {
            name: "exp_scaled_perspective",
            build: || {
                // minimize z s.t. 2 * exp(x / 2) <= z, x == 2
                let x = variable(());
                let z = variable(());
                let prob = Problem::minimize(z.clone())
                    .subject_to([
                        Constraint::exp(x.clone(), constant(2.0), z),
                        x.equals(constant(2.0)),
                    ])
                    .build();
                (prob, 2.0 * 1.0_f64.exp())
            },
        },
    ]
}

/// All maximize test cases
fn maximize_test_cases() -> Vec<TestCase> {
    vec![
        TestCase {
            name: "scalar_upper_bound",
            build: || {
                // maximize x s.t. x <= 5
                let x = variable(());
                let prob = Problem::maximize(x.clone())
                    .subject_to([x.leq(constant(5.0))])
                    .build();
                (prob, 5.0)
            },
        },
        TestCase {
            name: "sum_upper_bound",
            build: || {
                // maximize sum(x) s.t. x <= 3, x in R^4
                let x = variable(4);
                let prob = Problem::maximize(sum(&x))
                    .subject_to([x.leq(constant(3.0))])
                    .build();
                (prob, 12.0)
            },
        },
        TestCase {
            name: "affine_with_offset",
            build: || {
                // maximize 2x + 1 s.t. x <= 5
                let x = variable(());
                let prob = Problem::maximize(2.0 * x.clone() + constant(1.0))
                    .subject_to([x.leq(constant(5.0))])
                    .build();
                (prob, 11.0)
            },
        },
        TestCase {
            name: "exp_cone_fixed_perspective",
            build: || {
                // maximize x s.t. y * exp(x / y) <= z, y == 1, z == exp(5)
                let x = variable(());
                let y = variable(());
                let z = variable(());
                let prob = Problem::maximize(x.clone())
                    .subject_to([
                        Constraint::exp(x, y.clone(), z.clone()),
                        y.equals(constant(1.0)),
                        z.equals(constant(5.0_f64.exp())),
                    ])
                    .build();
                (prob, 5.0)
            },
        },
        TestCase {
            name: "exp_cone_log_bound",
            build: || {
                // maximize t s.t. exp(t) <= 1
                let t = variable(());
                let prob = Problem::maximize(t.clone())
                    .subject_to([Constraint::exp(t, constant(1.0), constant(1.0))])
                    .build();
                (prob, 0.0)
            },
        },
        TestCase {
            name: "negated_norm",
            build: || {
                // maximize 1 - t s.t. ||x||_2 <= t, x == [3, 4]
                let t = variable(());
                let x = variable(2);
                let prob = Problem::maximize(constant(1.0) - t.clone())
                    .subject_to([
                        Constraint::soc(t, x.clone()),
                        x.equals(constant_vec(vec![3.0, 4.0])),
                    ])
                    .build();
                (prob, -4.0)
            },
        },
    ]
}

fn infeasible_test_cases() -> Vec<(&'static str, Problem)> {
    vec![
        ("conflicting_bounds", {
            // x >= 2 and x <= 1
            let x = variable(());
            Problem::minimize(x.clone())
                .subject_to([x.clone().geq(constant(2.0)), x.leq(constant(1.0))])
                .build()
        }),
        ("negative_norm_bound", {
            // ||x||_2 <= t with t == -1
            let t = variable(());
            let x = variable(2);
            Problem::minimize(t.clone())
                .subject_to([Constraint::soc(t.clone(), x), t.equals(constant(-1.0))])
                .build()
        }),
    ]
}

fn unbounded_test_cases() -> Vec<(&'static str, Problem)> {
    vec![
        ("unbounded_below", {
            // minimize sum(x) with only upper bound
            let x = variable(3);
            Problem::minimize(sum(&x))
                .subject_to([x.leq(constant(1.0))])
                .build()
        }),
        ("unbounded_above", {
            // maximize sum(x) with only lower bound
            let x = variable(3);
            Problem::maximize(sum(&x))
                .subject_to([x.geq(constant(1.0))])
                .build()
        }),
    ]
}

// ============================================================================
// Test runner
// ============================================================================

fn run_cases(cases: Vec<TestCase>) {
    init_logger();
    for case in cases {
        let (prob, expected) = (case.build)();

        let result = prob.solve();
        assert!(result.is_ok(), "Problem '{}' should solve: {:?}", case.name, result.err());

        let solution = result.unwrap();
        assert_eq!(
            solution.status, SolveStatus::Optimal,
            "Problem '{}' should be optimal, got {:?}", case.name, solution.status
        );

        let value = solution.optimal_value;
        let rel_err = (value - expected).abs() / (1.0 + expected.abs());
        assert!(
            rel_err < TOL,
            "Problem '{}': expected {}, got {} (rel_err={})",
            case.name, expected, value, rel_err
        );
    }
}

#[test]
fn test_minimize_cases() {
    run_cases(minimize_test_cases());
}

#[test]
fn test_maximize_cases() {
    run_cases(maximize_test_cases());
}

#[test]
fn test_infeasible() {
    init_logger();
    for (name, prob) in infeasible_test_cases() {
        let solution = prob.solve().expect("setup should succeed");
        assert!(
            matches!(
                solution.status,
                SolveStatus::Infeasible | SolveStatus::InfeasibleInaccurate
            ),
            "Problem '{}' should be infeasible, got {:?}",
            name,
            solution.status
        );
        assert_eq!(solution.value(), None);
    }
}

#[test]
fn test_unbounded() {
    init_logger();
    for (name, prob) in unbounded_test_cases() {
        let solution = prob.solve().expect("setup should succeed");
        assert!(
            matches!(
                solution.status,
                SolveStatus::Unbounded | SolveStatus::UnboundedInaccurate
            ),
            "Problem '{}' should be unbounded, got {:?}",
            name,
            solution.status
        );
    }
}

// ============================================================================
// Sense and offset bookkeeping
// ============================================================================

#[test]
fn test_maximize_matches_negated_minimize() {
    init_logger();
    // maximize 2x + 3 vs minimize -2x - 3, both with x <= 5
    let x = variable(());
    let max = Problem::maximize(2.0 * x.clone() + constant(3.0))
        .subject_to([x.clone().leq(constant(5.0))])
        .solve()
        .unwrap();
    let min = Problem::minimize(-2.0 * x.clone() - constant(3.0))
        .subject_to([x.leq(constant(5.0))])
        .solve()
        .unwrap();

    assert_eq!(max.status, SolveStatus::Optimal);
    assert_eq!(min.status, SolveStatus::Optimal);
    assert!((max.optimal_value - 13.0).abs() < TOL);
    assert!((max.optimal_value + min.optimal_value).abs() < TOL);
}

#[test]
fn test_constant_objective() {
    init_logger();
    let x = variable(3);
    let solution = Problem::minimize(constant(1.0) + 0.0 * sum(&x))
        .subject_to([x.geq(constant(0.0))])
        .solve()
        .unwrap();
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!((solution.optimal_value - 1.0).abs() < TOL);
}

// ============================================================================
// Problem record API
// ============================================================================

#[test]
fn test_ecos_problem_with_explicit_offsets() {
    use cvxcanon::canon::VariableOffsets;

    init_logger();
    // maximize x s.t. x <= 5, with the offset map supplied by hand
    let id = VarId::new();
    let x = variable_with_id(id, ());
    let mut offsets = VariableOffsets::new();
    offsets.insert(id, 0, 1);

    let mut constraints = ConstraintSet::new();
    constraints.push(x.clone().leq(constant(5.0)));
    let dims = ConstraintDims {
        eq: 0,
        leq: 1,
        soc: vec![],
        exp: 0,
    };

    let mut problem =
        EcosProblem::new(Sense::Maximize, &x, constraints, &dims, &offsets, 1).unwrap();
    assert_eq!(problem.state(), ProblemState::Unsolved);
    assert_eq!(problem.data().c, vec![-1.0]);
    assert_eq!(problem.data().h, vec![5.0]);

    let mut options = SolverOptions::new();
    options.insert("abstol".to_string(), 1e-3);
    let solution = problem.solve(&options);
    assert_eq!(problem.state(), ProblemState::Solved);
    assert_eq!(solution.status, SolveStatus::Optimal);
    assert!((solution.optimal_value - 5.0).abs() < TOL);

    // a second solve reruns the solver on the same handle
    let again = problem.solve(&SolverOptions::new());
    assert_eq!(again.status, SolveStatus::Optimal);
    assert!((again.optimal_value - 5.0).abs() < TOL);
    assert_eq!(problem.last_solution(), Some(&again));

    assert!(matches!(
        problem.variable_values(),
        Err(CanonError::NotImplemented(_))
    ));
}

#[test]
fn test_iteration_limit_is_a_status() {
    init_logger();
    let t = variable(());
    let x = variable(20);
    let settings = Settings {
        max_iter: 1,
        ..Settings::default()
    };
    let solution = Problem::minimize(t.clone())
        .subject_to([Constraint::soc(t, x.clone()), sum(&x).equals(constant(20.0))])
        .solve_with(settings)
        .unwrap();
    assert_eq!(solution.status, SolveStatus::SolverError);
    assert_eq!(solution.value(), None);
}
