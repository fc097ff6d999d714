//! Sparse matrix utilities.
//!
//! Helper functions for working with nalgebra-sparse matrices.

use nalgebra::DMatrix;
use nalgebra_sparse::{CooMatrix, CscMatrix};

/// Entries below this magnitude are not stored.
const DROP_TOL: f64 = 1e-15;

/// Create a CSC matrix from triplets (row, col, value).
///
/// Duplicates are summed together.
pub fn csc_from_triplets(
    nrows: usize,
    ncols: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
) -> CscMatrix<f64> {
    if rows.is_empty() {
        return CscMatrix::zeros(nrows, ncols);
    }

    let mut coo = CooMatrix::new(nrows, ncols);
    for ((row, col), val) in rows.into_iter().zip(cols).zip(vals) {
        if row < nrows && col < ncols {
            coo.push(row, col, val);
        }
    }

    CscMatrix::from(&coo)
}

/// Row-wise accumulator of dense blocks into one sparse matrix.
///
/// Each call to [`Triplets::push_block`] places a dense block at the given
/// column offset, below every row pushed so far.
#[derive(Debug, Clone, Default)]
pub struct Triplets {
    ncols: usize,
    nrows: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
    vals: Vec<f64>,
}

impl Triplets {
    pub fn new(ncols: usize) -> Self {
        Triplets {
            ncols,
            ..Default::default()
        }
    }

    /// Add the non-zeros of `block` starting at the current row and `col_offset`.
    ///
    /// The row count only advances with [`Triplets::advance`], so several blocks
    /// can share the same rows.
    pub fn push_block(&mut self, block: &DMatrix<f64>, col_offset: usize) {
        for j in 0..block.ncols() {
            for i in 0..block.nrows() {
                let v = block[(i, j)];
                if v.abs() > DROP_TOL {
                    self.rows.push(self.nrows + i);
                    self.cols.push(col_offset + j);
                    self.vals.push(v);
                }
            }
        }
    }

    /// Move past `n` rows.
    pub fn advance(&mut self, n: usize) {
        self.nrows += n;
    }

    pub fn into_csc(self) -> CscMatrix<f64> {
        csc_from_triplets(self.nrows, self.ncols, self.rows, self.cols, self.vals)
    }
}

/// Convert a dense matrix to CSC format.
pub fn dense_to_csc(dense: &DMatrix<f64>) -> CscMatrix<f64> {
    let mut triplets = Triplets::new(dense.ncols());
    triplets.push_block(dense, 0);
    triplets.advance(dense.nrows());
    triplets.into_csc()
}

/// Convert CSC to dense matrix.
pub fn csc_to_dense(sparse: &CscMatrix<f64>) -> DMatrix<f64> {
    let mut dense = DMatrix::zeros(sparse.nrows(), sparse.ncols());
    for (row, col, val) in sparse.triplet_iter() {
        dense[(row, col)] = *val;
    }
    dense
}

/// Stack two CSC matrices vertically.
pub fn csc_vstack(a: &CscMatrix<f64>, b: &CscMatrix<f64>) -> CscMatrix<f64> {
    let mut rows = Vec::new();
    let mut cols = Vec::new();
    let mut vals = Vec::new();

    for (r, c, v) in a.triplet_iter() {
        rows.push(r);
        cols.push(c);
        vals.push(*v);
    }
    for (r, c, v) in b.triplet_iter() {
        rows.push(r + a.nrows());
        cols.push(c);
        vals.push(*v);
    }

    csc_from_triplets(
        a.nrows() + b.nrows(),
        a.ncols().max(b.ncols()),
        rows,
        cols,
        vals,
    )
}

/// Negated identity, used to express `x >= 0` as a non-negative cone row block.
pub fn csc_neg_identity(n: usize) -> CscMatrix<f64> {
    let idx: Vec<usize> = (0..n).collect();
    csc_from_triplets(n, n, idx.clone(), idx, vec![-1.0; n])
}
