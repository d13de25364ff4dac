//! Variable identities and variable leaf creation.

use std::sync::atomic::{AtomicU64, Ordering};

use super::linop::{LinOp, OpKind};
use super::shape::Shape;

/// Identity of an optimization variable.
///
/// The identity is the key of the variable offset map; two leaves with the
/// same `VarId` refer to the same block of columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(u64);

impl VarId {
    /// Generate a new unique ID.
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(0);
        VarId(NEXT_ID.fetch_add(1, Ordering::SeqCst))
    }

    /// Wrap an externally assigned identity.
    ///
    /// Mixing these with [`VarId::new`] inside one problem can collide.
    pub fn from_raw(raw: u64) -> Self {
        VarId(raw)
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for VarId {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a variable leaf with a fresh identity.
///
/// # Examples
///
/// ```
/// use cvxcanon::expr::variable;
///
/// let x = variable(());     // scalar
/// let y = variable(5);      // 5 x 1
/// let z = variable((3, 4)); // 3 x 4
/// assert_eq!(z.size(), 12);
/// ```
pub fn variable(shape: impl Into<Shape>) -> LinOp {
    variable_with_id(VarId::new(), shape)
}

/// Create a variable leaf for an existing identity.
pub fn variable_with_id(id: VarId, shape: impl Into<Shape>) -> LinOp {
    LinOp::leaf(OpKind::Variable(id), shape.into())
}
