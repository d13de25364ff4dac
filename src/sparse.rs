//! Sparse matrix utilities.
//!
//! Helper functions for working with nalgebra-sparse matrices, plus the
//! `Triplets` accumulator used while building coefficient blocks.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CscMatrix, SparseFormatError};

/// An unordered list of (row, col, value) entries of fixed dimensions.
///
/// Duplicate positions are allowed and are summed on compaction.
#[derive(Debug, Clone, Default)]
pub struct Triplets {
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
}

impl Triplets {
    /// Create an empty triplet list.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Triplets {
            nrows,
            ncols,
            ..Default::default()
        }
    }

    /// Append one entry.
    pub fn push(&mut self, row: usize, col: usize, val: f64) {
        self.rows.push(row);
        self.cols.push(col);
        self.vals.push(val);
    }

    /// Append every stored entry of `m`, shifted by `(row_offset, col_offset)`.
    pub fn extend_shifted(&mut self, m: &CscMatrix<f64>, row_offset: usize, col_offset: usize) {
        for (row, col, val) in m.triplet_iter() {
            self.push(row_offset + row, col_offset + col, *val);
        }
    }

    /// Number of stored entries, duplicates included.
    pub fn len(&self) -> usize {
        self.vals.len()
    }

    /// Check if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.vals.is_empty()
    }

    /// Row indices of the stored entries.
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Column indices of the stored entries.
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Values of the stored entries.
    pub fn vals(&self) -> &[f64] {
        &self.vals
    }

    /// Compact into CSC form, summing duplicates.
    ///
    /// Used for operator matrices built in place, whose entries lie inside
    /// the dimensions by construction. Panics otherwise.
    pub fn to_csc(&self) -> CscMatrix<f64> {
        if self.is_empty() {
            return CscMatrix::zeros(self.nrows, self.ncols);
        }
        let mut coo = CooMatrix::new(self.nrows, self.ncols);
        for ((&row, &col), &val) in self.rows.iter().zip(&self.cols).zip(&self.vals) {
            coo.push(row, col, val);
        }
        CscMatrix::from(&coo)
    }
}

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together and row indices come out sorted within
/// each column. An entry outside the dimensions is an error.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: &[usize],
    cols: &[usize],
    vals: &[f64],
) -> Result<CscMatrix<f64>, SparseFormatError> {
    let coo = CooMatrix::try_from_triplets(
        nrows,
        ncols,
        rows.to_vec(),
        cols.to_vec(),
        vals.to_vec(),
    )?;
    Ok(CscMatrix::from(&coo))
}

/// Convert a dense matrix to CSC format.
pub fn dense_to_csc(dense: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut t = Triplets::new(dense.nrows(), dense.ncols());
    for j in 0..dense.ncols() {
        for i in 0..dense.nrows() {
            let v = dense[(i, j)];
            if v != 0.0 {
                t.push(i, j, v);
            }
        }
    }
    t.to_csc()
}

/// Convert CSC to dense matrix.
pub fn csc_to_dense(sparse: &CscMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(sparse.nrows(), sparse.ncols());
    for (row, col, val) in sparse.triplet_iter() {
        dense[(row, col)] += *val;
    }
    dense
}

/// Add two CSC matrices of equal dimensions.
pub fn csc_add(a: &CscMatrix<f64>, b: &CscMatrix<f64>) -> CscMatrix<f64> {
    let mut t = Triplets::new(a.nrows(), a.ncols());
    t.extend_shifted(a, 0, 0);
    t.extend_shifted(b, 0, 0);
    t.to_csc()
}

/// Scale a CSC matrix.
pub fn csc_scale(a: &CscMatrix<f64>, scalar: f64) -> CscMatrix<f64> {
    let values: Vec<f64> = a.values().iter().map(|v| v * scalar).collect();
    let col_offsets: Vec<usize> = a.col_offsets().to_vec();
    let row_indices: Vec<usize> = a.row_indices().to_vec();
    CscMatrix::try_from_csc_data(a.nrows(), a.ncols(), col_offsets, row_indices, values)
        .unwrap_or_else(|_| CscMatrix::zeros(a.nrows(), a.ncols()))
}

/// Negate a CSC matrix.
pub fn csc_neg(a: &CscMatrix<f64>) -> CscMatrix<f64> {
    csc_scale(a, -1.0)
}

/// Sparse product `a * b`.
pub fn csc_matmul(a: &CscMatrix<f64>, b: &CscMatrix<f64>) -> CscMatrix<f64> {
    a * b
}

/// Sparse matrix-vector product `a * x`.
pub fn csc_matvec(a: &CscMatrix<f64>, x: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.nrows()];
    for (row, col, val) in a.triplet_iter() {
        out[row] += *val * x[col];
    }
    out
}

/// An `nrows x ncols` matrix of ones.
pub fn csc_ones(nrows: usize, ncols: usize) -> CscMatrix<f64> {
    let mut t = Triplets::new(nrows, ncols);
    for j in 0..ncols {
        for i in 0..nrows {
            t.push(i, j, 1.0);
        }
    }
    t.to_csc()
}

/// Diagonal matrix with `diag` on the diagonal (zeros are not stored).
pub fn csc_diag(diag: &[f64]) -> CscMatrix<f64> {
    let n = diag.len();
    let mut t = Triplets::new(n, n);
    for (i, &v) in diag.iter().enumerate() {
        if v != 0.0 {
            t.push(i, i, v);
        }
    }
    t.to_csc()
}

/// Block diagonal `I_k ⊗ a`, i.e. `k` copies of `a` along the diagonal.
pub fn csc_kron_identity(k: usize, a: &CscMatrix<f64>) -> CscMatrix<f64> {
    let (r, c) = (a.nrows(), a.ncols());
    let mut t = Triplets::new(r * k, c * k);
    for block in 0..k {
        t.extend_shifted(a, block * r, block * c);
    }
    t.to_csc()
}
