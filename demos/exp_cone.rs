//! Exponential Cone Example
//!
//! maximize    x
//! subject to  y * exp(x / y) <= z
//!             y == 1, z == exp(5)
//!
//! The optimum is x = 5.

use cvxcanon::prelude::*;

fn main() {
    env_logger::init();

    println!("=== Exponential Cone ===\n");

    let x = variable(());
    let y = variable(());
    let z = variable(());

    let result = Problem::maximize(x.clone())
        .subject_to([
            Constraint::exp(x, y.clone(), z.clone()),
            y.equals(constant(1.0)),
            z.equals(constant(5.0_f64.exp())),
        ])
        .solve();

    match result {
        Ok(solution) => {
            println!("Status: {:?}", solution.status);
            println!("Optimal value: {:.6} (expected 5)", solution.optimal_value);
        }
        Err(e) => eprintln!("Failed: {}", e),
    }
}
