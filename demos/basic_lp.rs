//! Basic Linear Programming Example
//!
//! Solves a small production-planning LP:
//!
//! maximize    c'x
//! subject to  Ax <= b, x >= 0
//!
//! and prints the solver arrays the problem was assembled into.

use cvxcanon::prelude::*;
use cvxcanon::sparse::csc_to_dense;
use nalgebra::DMatrix;

fn main() {
    env_logger::init();

    println!("=== Basic Linear Program ===\n");

    println!("Problem: Maximize 3*x1 + 2*x2 + 5*x3");
    println!("Subject to:");
    println!("  2*x1 + x2 + 3*x3 <= 100");
    println!("  x1 + 2*x2 + x3 <= 80");
    println!("  x >= 0\n");

    let x = variable(3);

    let c = DMatrix::from_row_slice(1, 3, &[3.0, 2.0, 5.0]);
    let a = DMatrix::from_row_slice(2, 3, &[2.0, 1.0, 3.0, 1.0, 2.0, 1.0]);
    let b = constant_vec(vec![100.0, 80.0]);

    let problem = Problem::maximize(LinOp::mul(c, x.clone()))
        .subject_to([LinOp::mul(a, x.clone()).leq(b), x.geq(zeros(3))])
        .build();

    let mut ecos = match problem.into_ecos(&Settings::default()) {
        Ok(ecos) => ecos,
        Err(e) => {
            eprintln!("Failed to assemble: {}", e);
            return;
        }
    };

    let data = ecos.data();
    println!("Assembled: n={} m={} p={} l={}", data.n, data.m, data.p, data.l);
    println!("c = {:?}", data.c);
    println!("h = {:?}", data.h);
    println!("G ={}", csc_to_dense(&data.g));

    println!("Solving...");
    let solution = ecos.solve(&SolverOptions::new());

    println!("\nResults:");
    println!("  Status: {:?}", solution.status);
    match solution.value() {
        Some(value) => println!("  Optimal profit: {:.4}", value),
        None => println!("  No optimal value"),
    }
}
