//! Constraints grouped by cone class.
//!
//! The set of cone classes is closed, so constraints and their dimensions are
//! kept in records with one named field per class rather than in maps keyed
//! by class.

pub mod constraint;

pub use constraint::{AffineConstraint, Constraint, ConstraintExt, ExpConstraint, SocConstraint};

use crate::error::Result;

/// All constraints of a problem, one list per cone class.
///
/// Order within each list is the row order in the assembled matrices.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    /// Equality constraints `expr == 0`.
    pub eq: Vec<AffineConstraint>,
    /// Linear inequalities `expr <= 0`.
    pub leq: Vec<AffineConstraint>,
    /// Second-order cones.
    pub soc: Vec<SocConstraint>,
    /// Exponential cones.
    pub exp: Vec<ExpConstraint>,
}

impl ConstraintSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint to the list of its class.
    pub fn push(&mut self, constraint: Constraint) {
        match constraint {
            Constraint::Eq(c) => self.eq.push(c),
            Constraint::Leq(c) => self.leq.push(c),
            Constraint::Soc(c) => self.soc.push(c),
            Constraint::Exp(c) => self.exp.push(c),
        }
    }

    /// Total number of constraints across all classes.
    pub fn len(&self) -> usize {
        self.eq.len() + self.leq.len() + self.soc.len() + self.exp.len()
    }

    /// Check if there are no constraints.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate every constraint, stopping at the first error.
    pub fn check(&self) -> Result<()> {
        self.eq.iter().chain(&self.leq).try_for_each(AffineConstraint::check)?;
        self.soc.iter().try_for_each(SocConstraint::check)?;
        self.exp.iter().try_for_each(ExpConstraint::check)
    }
}

impl Extend<Constraint> for ConstraintSet {
    fn extend<I: IntoIterator<Item = Constraint>>(&mut self, iter: I) {
        for c in iter {
            self.push(c);
        }
    }
}

impl FromIterator<Constraint> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = Constraint>>(iter: I) -> Self {
        let mut set = ConstraintSet::new();
        set.extend(iter);
        set
    }
}

/// Per-class cone dimensions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintDims {
    /// Rows of equality constraints (`p`).
    pub eq: usize,
    /// Rows of linear inequalities (`l`).
    pub leq: usize,
    /// Size of each second-order cone (`q`).
    pub soc: Vec<usize>,
    /// Number of exponential cone triples (`e`).
    pub exp: usize,
}

impl ConstraintDims {
    /// Derive dimensions from the constraints themselves.
    pub fn from_constraints(constraints: &ConstraintSet) -> Self {
        ConstraintDims {
            eq: constraints.eq.iter().map(|c| c.size()).sum(),
            leq: constraints.leq.iter().map(|c| c.size()).sum(),
            soc: constraints.soc.iter().map(|c| c.size()).collect(),
            exp: constraints.exp.iter().map(|c| c.num_cones()).sum(),
        }
    }

    /// Total number of inequality rows (`m = l + sum(q) + 3e`).
    pub fn inequality_rows(&self) -> usize {
        self.leq + self.soc.iter().sum::<usize>() + 3 * self.exp
    }
}
