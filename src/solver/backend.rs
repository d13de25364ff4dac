//! Seam between the problem record and the external conic solver.

use super::settings::Settings;
use super::stuffing::EcosData;
use crate::error::Result;

/// Raw result of one solver run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOutcome {
    /// Exit code, see [`exit_code`](super::status::exit_code).
    pub exit_code: i64,
    /// Primal objective `c'x` reported by the solver.
    pub pcost: f64,
}

/// A conic solver set up once from [`EcosData`] and run on demand.
///
/// The handle owns whatever the solver allocated and releases it on drop.
pub trait ConeSolver: Sized {
    /// Set up the solver from assembled data.
    fn setup(data: &EcosData, settings: &Settings) -> Result<Self>;

    /// Run the solver on the data it was set up with.
    fn solve(&mut self) -> SolverOutcome;
}
