//! Shape representation for linear operator nodes.
//!
//! Every node is a two-dimensional block:
//! - `()` is a 1 x 1 scalar
//! - `n` or `(n,)` is an n x 1 column vector
//! - `(m, n)` is an m x n matrix
//!
//! Values are vectorised column-major, so element `(i, j)` of an
//! `m x n` node is row `j * m + i` of its coefficient block.

use std::fmt;

/// Shape of a linear operator node.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: usize,
    cols: usize,
}

impl Shape {
    /// Create a scalar shape.
    pub fn scalar() -> Self {
        Shape { rows: 1, cols: 1 }
    }

    /// Create a column vector shape.
    pub fn vector(n: usize) -> Self {
        Shape { rows: n, cols: 1 }
    }

    /// Create a matrix shape.
    pub fn matrix(m: usize, n: usize) -> Self {
        Shape { rows: m, cols: n }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of elements, i.e. the row count of the vectorised node.
    pub fn size(&self) -> usize {
        self.rows * self.cols
    }

    /// Check if this is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.rows == 1 && self.cols == 1
    }

    /// Get the transposed shape.
    pub fn transpose(&self) -> Self {
        Shape {
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Result shape of `self @ other`, if the inner dimensions agree.
    pub fn matmul(&self, other: &Shape) -> Option<Shape> {
        if self.cols == other.rows {
            Some(Shape::matrix(self.rows, other.cols))
        } else {
            None
        }
    }

    /// Column-major linear index of element `(i, j)`.
    pub fn linear_index(&self, i: usize, j: usize) -> usize {
        j * self.rows + i
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::scalar()
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Shape({}, {})", self.rows, self.cols)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.rows, self.cols)
    }
}

// Conversion traits
impl From<()> for Shape {
    fn from(_: ()) -> Self {
        Shape::scalar()
    }
}

impl From<usize> for Shape {
    fn from(n: usize) -> Self {
        Shape::vector(n)
    }
}

impl From<(usize,)> for Shape {
    fn from((n,): (usize,)) -> Self {
        Shape::vector(n)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((m, n): (usize, usize)) -> Self {
        Shape::matrix(m, n)
    }
}
