//! Solver configuration.

use std::collections::HashMap;

/// Solver settings, applied when the solver is set up.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 100,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Named numeric options passed at solve time.
///
/// These are accepted but not applied; configure the solver through
/// [`Settings`] at construction instead.
pub type SolverOptions = HashMap<String, f64>;
