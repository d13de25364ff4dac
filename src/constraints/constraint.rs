//! Constraint types for optimization problems.
//!
//! Constraints map to cones in the solver:
//! - Eq: expr == 0 (zero cone / equality)
//! - Leq: expr <= 0 (nonnegative orthant after sign flip)
//! - Soc: [t; x] in the second-order cone, i.e. ||x||_2 <= t
//! - Exp: (x, y, z) elementwise in the exponential cone, y * exp(x / y) <= z

use crate::error::{CanonError, Result};
use crate::expr::LinOp;

/// A constraint wrapping one affine expression: `expr == 0` or `expr <= 0`.
#[derive(Debug, Clone)]
pub struct AffineConstraint {
    /// The expression compared against zero.
    pub expr: LinOp,
}

impl AffineConstraint {
    /// Wrap an expression.
    pub fn new(expr: LinOp) -> Self {
        AffineConstraint { expr }
    }

    /// Number of scalar rows.
    pub fn size(&self) -> usize {
        self.expr.size()
    }

    /// Validate the wrapped expression.
    pub fn check(&self) -> Result<()> {
        self.expr.check()
    }
}

/// One second-order cone, given by its ordered components.
///
/// The first entry of the stacked components bounds the norm of the rest.
#[derive(Debug, Clone)]
pub struct SocConstraint {
    /// Cone components in row order.
    pub args: Vec<LinOp>,
}

impl SocConstraint {
    /// Create a cone from its components.
    pub fn new(args: Vec<LinOp>) -> Self {
        SocConstraint { args }
    }

    /// `||x||_2 <= t` for a scalar `t`.
    pub fn norm2(t: LinOp, x: LinOp) -> Self {
        SocConstraint { args: vec![t, x] }
    }

    /// Cone dimension (sum of component sizes).
    pub fn size(&self) -> usize {
        self.args.iter().map(|a| a.size()).sum()
    }

    /// A cone needs at least one entry, and every component must be valid.
    pub fn check(&self) -> Result<()> {
        if self.size() == 0 {
            return Err(CanonError::InvalidExpression(
                "second-order cone with no entries".into(),
            ));
        }
        self.args.iter().try_for_each(LinOp::check)
    }
}

/// Elementwise exponential cone: `y * exp(x / y) <= z` for every entry.
#[derive(Debug, Clone)]
pub struct ExpConstraint {
    /// The x expression.
    pub x: LinOp,
    /// The y expression.
    pub y: LinOp,
    /// The z expression.
    pub z: LinOp,
}

impl ExpConstraint {
    /// Create an exponential cone constraint over same-shaped arguments.
    pub fn new(x: LinOp, y: LinOp, z: LinOp) -> Self {
        ExpConstraint { x, y, z }
    }

    /// Number of 3-dimensional cones (one per entry).
    pub fn num_cones(&self) -> usize {
        self.x.size()
    }

    /// All three arguments must be valid and share the shape of `x`.
    pub fn check(&self) -> Result<()> {
        for arg in [&self.x, &self.y, &self.z] {
            arg.check()?;
            if arg.shape != self.x.shape {
                return Err(CanonError::ShapeMismatch {
                    expected: format!("exponential cone argument of shape {}", self.x.shape),
                    got: arg.shape.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// A constraint of any class.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Equality constraint: expr == 0.
    Eq(AffineConstraint),
    /// Inequality constraint: expr <= 0.
    Leq(AffineConstraint),
    /// Second-order cone constraint.
    Soc(SocConstraint),
    /// Exponential cone constraint.
    Exp(ExpConstraint),
}

impl Constraint {
    /// Create an equality constraint: lhs == rhs.
    pub fn eq(lhs: LinOp, rhs: LinOp) -> Self {
        Constraint::Eq(AffineConstraint::new(lhs - rhs))
    }

    /// Create an inequality constraint: lhs <= rhs.
    pub fn leq(lhs: LinOp, rhs: LinOp) -> Self {
        Constraint::Leq(AffineConstraint::new(lhs - rhs))
    }

    /// Create an inequality constraint: lhs >= rhs.
    pub fn geq(lhs: LinOp, rhs: LinOp) -> Self {
        // lhs >= rhs  <=>  rhs - lhs <= 0
        Constraint::Leq(AffineConstraint::new(rhs - lhs))
    }

    /// Create a SOC constraint: ||x||_2 <= t.
    pub fn soc(t: LinOp, x: LinOp) -> Self {
        Constraint::Soc(SocConstraint::norm2(t, x))
    }

    /// Create an exponential cone constraint: y * exp(x / y) <= z.
    pub fn exp(x: LinOp, y: LinOp, z: LinOp) -> Self {
        Constraint::Exp(ExpConstraint::new(x, y, z))
    }

    /// Validate the constraint's expressions and their cone structure.
    pub fn check(&self) -> Result<()> {
        match self {
            Constraint::Eq(c) | Constraint::Leq(c) => c.check(),
            Constraint::Soc(c) => c.check(),
            Constraint::Exp(c) => c.check(),
        }
    }

    /// Get all expressions in this constraint.
    pub fn expressions(&self) -> Vec<&LinOp> {
        match self {
            Constraint::Eq(c) | Constraint::Leq(c) => vec![&c.expr],
            Constraint::Soc(c) => c.args.iter().collect(),
            Constraint::Exp(c) => vec![&c.x, &c.y, &c.z],
        }
    }
}

/// Extension trait for creating constraints from expressions.
pub trait ConstraintExt {
    /// Create equality constraint: self == rhs.
    fn equals(self, rhs: LinOp) -> Constraint;

    /// Create inequality constraint: self <= rhs.
    fn leq(self, rhs: LinOp) -> Constraint;

    /// Create inequality constraint: self >= rhs.
    fn geq(self, rhs: LinOp) -> Constraint;
}

impl ConstraintExt for LinOp {
    fn equals(self, rhs: LinOp) -> Constraint {
        Constraint::eq(self, rhs)
    }

    fn leq(self, rhs: LinOp) -> Constraint {
        Constraint::leq(self, rhs)
    }

    fn geq(self, rhs: LinOp) -> Constraint {
        Constraint::geq(self, rhs)
    }
}
