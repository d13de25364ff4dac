//! The linear operator tree.
//!
//! A `LinOp` is a node of an affine expression: leaves are variables and
//! constants, internal nodes are linear operators applied to their children.
//! Each node owns its children outright, so a tree is dropped recursively
//! with its root and never shares subtrees.

use std::ops::{Add, Mul, Neg, Sub};

use nalgebra::DMatrix;
use nalgebra_sparse::CscMatrix;

use super::shape::Shape;
use super::variable::VarId;
use crate::error::{CanonError, Result};
use crate::sparse::dense_to_csc;

/// Constant data attached to a node (dense, sparse or scalar).
#[derive(Debug, Clone)]
pub enum Array {
    /// Dense matrix storage.
    Dense(DMatrix<f64>),
    /// Sparse CSC matrix storage.
    Sparse(CscMatrix<f64>),
    /// Scalar value.
    Scalar(f64),
}

impl Array {
    /// Get the shape of the array.
    pub fn shape(&self) -> Shape {
        match self {
            Array::Dense(m) => Shape::matrix(m.nrows(), m.ncols()),
            Array::Sparse(m) => Shape::matrix(m.nrows(), m.ncols()),
            Array::Scalar(_) => Shape::scalar(),
        }
    }

    /// Get the total number of elements.
    pub fn size(&self) -> usize {
        self.shape().size()
    }

    /// Try to get as a scalar value.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Array::Scalar(v) => Some(*v),
            Array::Dense(m) if m.nrows() == 1 && m.ncols() == 1 => Some(m[(0, 0)]),
            _ => None,
        }
    }

    /// Convert to a CSC matrix (a scalar becomes 1 x 1).
    pub fn to_csc(&self) -> CscMatrix<f64> {
        match self {
            Array::Dense(m) => dense_to_csc(m),
            Array::Sparse(m) => m.clone(),
            Array::Scalar(v) => dense_to_csc(&DMatrix::from_element(1, 1, *v)),
        }
    }

    /// Entries in column-major order, zeros included.
    pub fn to_column_major(&self) -> Vec<f64> {
        match self {
            Array::Dense(m) => m.as_slice().to_vec(),
            Array::Sparse(m) => {
                let mut out = vec![0.0; m.nrows() * m.ncols()];
                for (row, col, val) in m.triplet_iter() {
                    out[col * m.nrows() + row] += *val;
                }
                out
            }
            Array::Scalar(v) => vec![*v],
        }
    }
}

impl From<f64> for Array {
    fn from(v: f64) -> Self {
        Array::Scalar(v)
    }
}

impl From<DMatrix<f64>> for Array {
    fn from(m: DMatrix<f64>) -> Self {
        Array::Dense(m)
    }
}

impl From<CscMatrix<f64>> for Array {
    fn from(m: CscMatrix<f64>) -> Self {
        Array::Sparse(m)
    }
}

/// Operator carried by a node.
#[derive(Debug, Clone)]
pub enum OpKind {
    // ========== Leaf nodes ==========
    /// A decision variable.
    Variable(VarId),
    /// A constant value.
    Constant(Array),

    // ========== Linear operators ==========
    /// Negation: -a
    Neg,
    /// Left multiplication by a constant: data @ a (scalar data scales).
    Mul(Array),
    /// Elementwise multiplication by a constant of the same shape.
    MulElem(Array),
    /// Division by a nonzero scalar.
    Div(f64),
    /// Sum of same-shaped children.
    Sum,
    /// Broadcast a scalar child to the node's shape.
    Promote,
    /// Sum of all entries of the child.
    SumEntries,
    /// Reinterpret the child with the node's shape (column-major).
    Reshape,
    /// Transpose.
    Transpose,
    /// Vertical stack: [a; b; ...]
    VStack,
    /// Horizontal stack: [a, b, ...]
    HStack,
}

/// A node of an affine expression tree.
#[derive(Debug, Clone)]
pub struct LinOp {
    /// The operator at this node.
    pub kind: OpKind,
    /// Declared output shape.
    pub shape: Shape,
    /// Ordered children, owned by this node.
    pub args: Vec<LinOp>,
}

impl LinOp {
    /// Create a node from its parts without checking shapes.
    pub fn new(kind: OpKind, shape: Shape, args: Vec<LinOp>) -> Self {
        LinOp { kind, shape, args }
    }

    pub(crate) fn leaf(kind: OpKind, shape: Shape) -> Self {
        LinOp::new(kind, shape, Vec::new())
    }

    /// Create a constant leaf.
    pub fn constant(value: impl Into<Array>) -> Self {
        let value = value.into();
        let shape = value.shape();
        LinOp::leaf(OpKind::Constant(value), shape)
    }

    /// Negate an expression.
    pub fn neg(arg: LinOp) -> Self {
        let shape = arg.shape;
        LinOp::new(OpKind::Neg, shape, vec![arg])
    }

    /// Left-multiply an expression by a constant.
    ///
    /// A scalar constant keeps the operand's shape; a matrix `A` gives
    /// `(A.rows, arg.cols)`.
    pub fn mul(lhs: impl Into<Array>, arg: LinOp) -> Self {
        let lhs = lhs.into();
        let shape = if lhs.as_scalar().is_some() {
            arg.shape
        } else {
            Shape::matrix(lhs.shape().rows(), arg.shape.cols())
        };
        LinOp::new(OpKind::Mul(lhs), shape, vec![arg])
    }

    /// Left-multiply by a constant with an explicitly declared result shape.
    pub fn mul_with_shape(lhs: impl Into<Array>, arg: LinOp, shape: Shape) -> Self {
        LinOp::new(OpKind::Mul(lhs.into()), shape, vec![arg])
    }

    /// Multiply elementwise by a constant.
    pub fn mul_elem(data: impl Into<Array>, arg: LinOp) -> Self {
        let shape = arg.shape;
        LinOp::new(OpKind::MulElem(data.into()), shape, vec![arg])
    }

    /// Divide by a scalar.
    pub fn div(arg: LinOp, divisor: f64) -> Self {
        let shape = arg.shape;
        LinOp::new(OpKind::Div(divisor), shape, vec![arg])
    }

    /// Sum expressions of identical shape.
    ///
    /// The node takes the shape of the first addend.
    pub fn sum(args: Vec<LinOp>) -> Self {
        let shape = args.first().map(|a| a.shape).unwrap_or_default();
        LinOp::new(OpKind::Sum, shape, args)
    }

    /// Broadcast a scalar expression to `shape`.
    pub fn promote(arg: LinOp, shape: impl Into<Shape>) -> Self {
        LinOp::new(OpKind::Promote, shape.into(), vec![arg])
    }

    /// Sum all entries of an expression.
    pub fn sum_entries(arg: LinOp) -> Self {
        LinOp::new(OpKind::SumEntries, Shape::scalar(), vec![arg])
    }

    /// Reshape an expression (column-major order).
    pub fn reshape(arg: LinOp, shape: impl Into<Shape>) -> Self {
        LinOp::new(OpKind::Reshape, shape.into(), vec![arg])
    }

    /// Transpose an expression.
    pub fn transpose(arg: LinOp) -> Self {
        let shape = arg.shape.transpose();
        LinOp::new(OpKind::Transpose, shape, vec![arg])
    }

    /// Stack expressions vertically.
    pub fn vstack(args: Vec<LinOp>) -> Self {
        let rows = args.iter().map(|a| a.shape.rows()).sum();
        let cols = args.first().map(|a| a.shape.cols()).unwrap_or(0);
        LinOp::new(OpKind::VStack, Shape::matrix(rows, cols), args)
    }

    /// Stack expressions horizontally.
    pub fn hstack(args: Vec<LinOp>) -> Self {
        let rows = args.first().map(|a| a.shape.rows()).unwrap_or(0);
        let cols = args.iter().map(|a| a.shape.cols()).sum();
        LinOp::new(OpKind::HStack, Shape::matrix(rows, cols), args)
    }

    /// Number of scalar entries (rows once vectorised).
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Get the variable ID if this node is a variable leaf.
    pub fn variable_id(&self) -> Option<VarId> {
        match self.kind {
            OpKind::Variable(id) => Some(id),
            _ => None,
        }
    }

    /// Check if the subtree contains no variables.
    pub fn is_constant(&self) -> bool {
        !matches!(self.kind, OpKind::Variable(_)) && self.args.iter().all(|a| a.is_constant())
    }

    /// All variable leaves in the subtree with their shapes, sorted by ID.
    pub fn variables(&self) -> Vec<(VarId, Shape)> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.sort_by_key(|(id, _)| *id);
        vars.dedup_by_key(|(id, _)| *id);
        vars
    }

    pub(crate) fn collect_variables(&self, vars: &mut Vec<(VarId, Shape)>) {
        if let OpKind::Variable(id) = self.kind {
            vars.push((id, self.shape));
        }
        for arg in &self.args {
            arg.collect_variables(vars);
        }
    }

    /// Verify that every node's shape agrees with its operator and children.
    pub fn check(&self) -> Result<()> {
        for arg in &self.args {
            arg.check()?;
        }

        match &self.kind {
            OpKind::Variable(_) => self.expect_arity(0),
            OpKind::Constant(value) => {
                self.expect_arity(0)?;
                self.expect_shape(value.shape())
            }
            OpKind::Neg | OpKind::MulElem(_) => {
                self.expect_arity(1)?;
                self.expect_shape(self.args[0].shape)?;
                if let OpKind::MulElem(data) = &self.kind {
                    if data.as_scalar().is_none() && data.shape() != self.shape {
                        return Err(mismatch(self.shape, data.shape()));
                    }
                }
                Ok(())
            }
            OpKind::Div(divisor) => {
                self.expect_arity(1)?;
                if *divisor == 0.0 {
                    return Err(CanonError::InvalidExpression("division by zero".into()));
                }
                self.expect_shape(self.args[0].shape)
            }
            OpKind::Mul(lhs) => {
                self.expect_arity(1)?;
                let arg = self.args[0].shape;
                if lhs.as_scalar().is_some() {
                    return self.expect_shape(arg);
                }
                let product = lhs.shape().matmul(&arg).ok_or_else(|| {
                    CanonError::ShapeMismatch {
                        expected: format!("{} rows", lhs.shape().cols()),
                        got: arg.to_string(),
                    }
                })?;
                self.expect_shape(product)
            }
            OpKind::Sum => {
                if self.args.is_empty() {
                    return Err(CanonError::InvalidExpression("empty sum".into()));
                }
                for arg in &self.args {
                    self.expect_shape(arg.shape)?;
                }
                Ok(())
            }
            OpKind::Promote => {
                self.expect_arity(1)?;
                let arg = self.args[0].shape;
                if !arg.is_scalar() {
                    return Err(mismatch(Shape::scalar(), arg));
                }
                Ok(())
            }
            OpKind::SumEntries => {
                self.expect_arity(1)?;
                self.expect_shape(Shape::scalar())
            }
            OpKind::Reshape => {
                self.expect_arity(1)?;
                let arg = self.args[0].shape;
                if arg.size() != self.shape.size() {
                    return Err(mismatch(self.shape, arg));
                }
                Ok(())
            }
            OpKind::Transpose => {
                self.expect_arity(1)?;
                self.expect_shape(self.args[0].shape.transpose())
            }
            OpKind::VStack => {
                if self.args.is_empty() {
                    return Err(CanonError::InvalidExpression("empty vstack".into()));
                }
                let rows = self.args.iter().map(|a| a.shape.rows()).sum();
                if self.args.iter().any(|a| a.shape.cols() != self.shape.cols()) {
                    return Err(CanonError::InvalidExpression(
                        "vstack arguments differ in column count".into(),
                    ));
                }
                self.expect_shape(Shape::matrix(rows, self.shape.cols()))
            }
            OpKind::HStack => {
                if self.args.is_empty() {
                    return Err(CanonError::InvalidExpression("empty hstack".into()));
                }
                let cols = self.args.iter().map(|a| a.shape.cols()).sum();
                if self.args.iter().any(|a| a.shape.rows() != self.shape.rows()) {
                    return Err(CanonError::InvalidExpression(
                        "hstack arguments differ in row count".into(),
                    ));
                }
                self.expect_shape(Shape::matrix(self.shape.rows(), cols))
            }
        }
    }

    fn expect_arity(&self, n: usize) -> Result<()> {
        if self.args.len() != n {
            return Err(CanonError::InvalidExpression(format!(
                "{:?} expects {} argument(s), got {}",
                self.kind,
                n,
                self.args.len()
            )));
        }
        Ok(())
    }

    fn expect_shape(&self, expected: Shape) -> Result<()> {
        if self.shape != expected {
            return Err(mismatch(expected, self.shape));
        }
        Ok(())
    }
}

fn mismatch(expected: Shape, got: Shape) -> CanonError {
    CanonError::ShapeMismatch {
        expected: expected.to_string(),
        got: got.to_string(),
    }
}

impl Neg for LinOp {
    type Output = LinOp;

    fn neg(self) -> LinOp {
        LinOp::neg(self)
    }
}

impl Add for LinOp {
    type Output = LinOp;

    fn add(self, rhs: LinOp) -> LinOp {
        // Scalars broadcast against the other operand.
        let (lhs, rhs) = match (self.shape.is_scalar(), rhs.shape.is_scalar()) {
            (true, false) => (LinOp::promote(self, rhs.shape), rhs),
            (false, true) => {
                let shape = self.shape;
                (self, LinOp::promote(rhs, shape))
            }
            _ => (self, rhs),
        };
        match lhs.kind {
            OpKind::Sum => {
                let mut args = lhs.args;
                args.push(rhs);
                LinOp::new(OpKind::Sum, lhs.shape, args)
            }
            _ => LinOp::sum(vec![lhs, rhs]),
        }
    }
}

impl Sub for LinOp {
    type Output = LinOp;

    fn sub(self, rhs: LinOp) -> LinOp {
        self + (-rhs)
    }
}

impl Mul<LinOp> for f64 {
    type Output = LinOp;

    fn mul(self, rhs: LinOp) -> LinOp {
        LinOp::mul(self, rhs)
    }
}
