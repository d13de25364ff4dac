//! Problem definition and solving API.
//!
//! The `Problem` struct represents an optimization problem with:
//! - An objective (minimize or maximize) over a scalar affine expression
//! - A set of affine and conic constraints
//!
//! Use the builder pattern to construct problems:
//! ```ignore
//! let solution = Problem::minimize(objective)
//!     .subject_to([constraint1, constraint2])
//!     .solve()?;
//! ```

use std::collections::HashMap;

use log::debug;

use crate::canon::VariableOffsets;
use crate::constraints::{Constraint, ConstraintDims, ConstraintSet};
use crate::error::{CanonError, Result};
use crate::expr::{LinOp, Shape, VarId};
use crate::solver::{EcosProblem, Sense, Settings, Solution, SolverOptions};

/// Objective type for optimization problems.
#[derive(Debug, Clone)]
pub enum Objective {
    /// Minimize the expression.
    Minimize(LinOp),
    /// Maximize the expression (solved as a minimization of its negation).
    Maximize(LinOp),
}

impl Objective {
    /// Get the expression being optimized.
    pub fn expr(&self) -> &LinOp {
        match self {
            Objective::Minimize(e) | Objective::Maximize(e) => e,
        }
    }

    /// Objective sense.
    pub fn sense(&self) -> Sense {
        match self {
            Objective::Minimize(_) => Sense::Minimize,
            Objective::Maximize(_) => Sense::Maximize,
        }
    }
}

/// An optimization problem.
#[derive(Debug, Clone)]
pub struct Problem {
    /// The objective to optimize.
    pub objective: Objective,
    /// The constraints.
    pub constraints: Vec<Constraint>,
}

impl Problem {
    /// Create a minimization problem.
    pub fn minimize(expr: LinOp) -> ProblemBuilder {
        ProblemBuilder {
            objective: Objective::Minimize(expr),
            constraints: Vec::new(),
        }
    }

    /// Create a maximization problem.
    pub fn maximize(expr: LinOp) -> ProblemBuilder {
        ProblemBuilder {
            objective: Objective::Maximize(expr),
            constraints: Vec::new(),
        }
    }

    /// Get all variables with their shapes, ordered by id.
    ///
    /// A variable used with two different shapes is an error.
    pub fn variables(&self) -> Result<Vec<(VarId, Shape)>> {
        let mut shapes: HashMap<VarId, Shape> = HashMap::new();
        let exprs = std::iter::once(self.objective.expr())
            .chain(self.constraints.iter().flat_map(|c| c.expressions()));

        for expr in exprs {
            for (id, shape) in expr.variables() {
                match shapes.get(&id) {
                    Some(&known) if known != shape => {
                        return Err(CanonError::ShapeMismatch {
                            expected: format!("{}", known),
                            got: format!("{}", shape),
                        });
                    }
                    Some(_) => {}
                    None => {
                        shapes.insert(id, shape);
                    }
                }
            }
        }

        let mut vars: Vec<_> = shapes.into_iter().collect();
        vars.sort_by_key(|(id, _)| *id);
        Ok(vars)
    }

    /// Validate, assemble and set up the solver.
    ///
    /// Variables are laid out contiguously in id order and cone dimensions
    /// are derived from the constraints. Malformed trees and constraints are
    /// rejected during assembly, before the solver is set up.
    pub fn into_ecos(self, settings: &Settings) -> Result<EcosProblem> {
        let offsets = VariableOffsets::from_vars(&self.variables()?);
        let n = offsets.total_vars;
        let sense = self.objective.sense();
        let objective = match self.objective {
            Objective::Minimize(e) | Objective::Maximize(e) => e,
        };
        let constraints: ConstraintSet = self.constraints.into_iter().collect();
        let dims = ConstraintDims::from_constraints(&constraints);
        debug!("problem: {} variables in {} columns", offsets.len(), n);

        EcosProblem::with_settings(sense, &objective, constraints, &dims, &offsets, n, settings)
    }

    /// Solve the problem with default settings.
    pub fn solve(self) -> Result<Solution> {
        self.solve_with(Settings::default())
    }

    /// Solve the problem with custom settings.
    ///
    /// Infeasible, unbounded and failed solves are reported through the
    /// returned status, not as errors.
    pub fn solve_with(self, settings: Settings) -> Result<Solution> {
        let mut ecos = self.into_ecos(&settings)?;
        Ok(ecos.solve(&SolverOptions::new()))
    }
}

/// Builder for constructing problems.
#[derive(Debug, Clone)]
pub struct ProblemBuilder {
    objective: Objective,
    constraints: Vec<Constraint>,
}

impl ProblemBuilder {
    /// Add constraints to the problem.
    pub fn subject_to(mut self, constraints: impl IntoIterator<Item = Constraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    /// Add a single constraint.
    pub fn constraint(mut self, c: Constraint) -> Self {
        self.constraints.push(c);
        self
    }

    /// Build the problem.
    pub fn build(self) -> Problem {
        Problem {
            objective: self.objective,
            constraints: self.constraints,
        }
    }

    /// Build and solve the problem with default settings.
    pub fn solve(self) -> Result<Solution> {
        self.build().solve()
    }

    /// Build and solve the problem with custom settings.
    pub fn solve_with(self, settings: Settings) -> Result<Solution> {
        self.build().solve_with(settings)
    }
}
