//! Canonicalization: from expression trees to sparse standard-form data.
//!
//! This module converts affine expression trees into:
//! - Coefficient form (LinExpr) by evaluating each tree bottom-up
//! - Triplet and CSC matrices aggregated over many trees (build_matrix)
//! - Cone-specific row layouts (format), including the interleaved
//!   exponential-cone blocks built from spacing matrices

pub mod build_matrix;
pub mod coefficients;
pub mod format;
pub mod lin_expr;
pub mod offsets;
pub mod spacing;

pub use build_matrix::{build_matrix, ProblemData};
pub use coefficients::get_coefficients;
pub use format::{format_affine_constrs, format_elementwise, format_exp_constrs, format_soc_constrs};
pub use lin_expr::LinExpr;
pub use offsets::VariableOffsets;
pub use spacing::spacing_matrix;
