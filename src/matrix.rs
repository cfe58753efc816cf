/*!

A dense, column-oriented integer matrix.

Constraint systems grow and shrink a column at a time (appending a new
inequality, erasing a redundant one, pivoting an auxiliary variable into
place), so storage is column-major: a whole column is a contiguous slice,
cheap to read, swap, or drop.

*/

use std::fmt;

/// Dense `i64` matrix stored column-major: `data[col * nrows + row]`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DenseIMatrix {
    data: Vec<i64>,
    nrows: usize,
    ncols: usize,
}

impl DenseIMatrix {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        DenseIMatrix { data: vec![0; nrows * ncols], nrows, ncols }
    }

    pub fn from_columns(nrows: usize, columns: &[Vec<i64>]) -> Self {
        let mut m = DenseIMatrix::new(nrows, columns.len());
        for (c, col) in columns.iter().enumerate() {
            assert_eq!(col.len(), nrows, "from_columns: column length mismatch");
            m.get_col_mut(c).copy_from_slice(col);
        }
        m
    }

    /// Builds a matrix from a list of rows (each of length `ncols`),
    /// transposing into this type's column-major storage. Convenient at
    /// call sites that think in constraints-as-rows, which is how every
    /// test and collaborator in this crate constructs a coefficient system.
    pub fn from_columns_rowmajor(ncols: usize, rows: &[Vec<i64>]) -> Self {
        let nrows = rows.len();
        let mut m = DenseIMatrix::new(nrows, ncols);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), ncols, "from_columns_rowmajor: row length mismatch");
            for (c, &v) in row.iter().enumerate() {
                m.set(r, c, v);
            }
        }
        m
    }

    /// Reallocates to the given shape, discarding previous contents. Used
    /// where a buffer is about to be fully overwritten (e.g. assembling the
    /// auxiliary system for redundancy elimination).
    pub fn resize_for_overwrite(&mut self, nrows: usize, ncols: usize) {
        self.data = vec![0; nrows * ncols];
        self.nrows = nrows;
        self.ncols = ncols;
    }

    /// Grows or shrinks the column count in place, preserving existing
    /// columns. The row count cannot change once a matrix holds data this
    /// way, since column-major storage has no in-place remap for that.
    pub fn resize_cols(&mut self, ncols: usize) {
        if self.nrows == 0 {
            self.ncols = ncols;
            return;
        }
        self.data.resize(self.nrows * ncols, 0);
        self.ncols = ncols;
    }

    pub fn reserve_cols(&mut self, extra_cols: usize) {
        self.data.reserve(extra_cols * self.nrows.max(1));
    }

    #[inline]
    pub fn num_row(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn num_col(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i64 {
        self.data[col * self.nrows + row]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, v: i64) {
        self.data[col * self.nrows + row] = v;
    }

    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> &mut i64 {
        &mut self.data[col * self.nrows + row]
    }

    #[inline]
    pub fn get_col(&self, col: usize) -> &[i64] {
        &self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    #[inline]
    pub fn get_col_mut(&mut self, col: usize) -> &mut [i64] {
        &mut self.data[col * self.nrows..(col + 1) * self.nrows]
    }

    pub fn push_col(&mut self, col: &[i64]) {
        assert_eq!(col.len(), self.nrows, "push_col: wrong row count");
        self.data.extend_from_slice(col);
        self.ncols += 1;
    }

    /// Removes column `c`, shifting later columns left.
    pub fn erase_col(&mut self, c: usize) {
        let nrows = self.nrows;
        self.data.drain(c * nrows..(c + 1) * nrows);
        self.ncols -= 1;
    }

    /// Removes row `r`, shifting every later row up within every column.
    /// The row-major mirror of `erase_col`, for callers that drop a single
    /// constraint (a row, in this matrix's constraints-as-rows convention)
    /// rather than a whole variable.
    pub fn erase_row(&mut self, r: usize) {
        debug_assert!(r < self.nrows, "erase_row: row out of range");
        let nrows = self.nrows;
        for c in (0..self.ncols).rev() {
            self.data.remove(c * nrows + r);
        }
        self.nrows -= 1;
    }

    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let nrows = self.nrows;
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (left, right) = self.data.split_at_mut(hi * nrows);
        let col_lo = &mut left[lo * nrows..(lo + 1) * nrows];
        let col_hi = &mut right[..nrows];
        col_lo.swap_with_slice(col_hi);
    }

    pub fn is_col_zero(&self, c: usize) -> bool {
        self.get_col(c).iter().all(|&v| v == 0)
    }

    pub fn row(&self, r: usize) -> impl Iterator<Item = i64> + '_ {
        (0..self.ncols).map(move |c| self.get(r, c))
    }
}

impl fmt::Display for DenseIMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.nrows {
            for c in 0..self.ncols {
                write!(f, "{:>5} ", self.get(r, c))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Searches row `row_pivot` across columns `[col_target, col_search_end)` for
/// a non-zero entry. If found at column `c != col_target`, swaps columns `c`
/// and `col_target` in both `e` and the parallel right-hand side `q`, moving
/// the non-zero into `col_target`. Returns `true` if the whole searched range
/// was zero in `row_pivot` (no pivot available).
pub fn pivot_cols<T: Clone>(
    e: &mut DenseIMatrix,
    q: &mut [T],
    row_pivot: usize,
    col_search_end: usize,
    col_target: usize,
) -> bool {
    for c in col_target..col_search_end {
        if e.get(row_pivot, c) != 0 {
            if c != col_target {
                e.swap_cols(c, col_target);
                q.swap(c, col_target);
            }
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_storage_round_trips() {
        let mut m = DenseIMatrix::new(3, 2);
        m.get_col_mut(0).copy_from_slice(&[1, 2, 3]);
        m.get_col_mut(1).copy_from_slice(&[4, 5, 6]);
        assert_eq!(m.get(1, 0), 2);
        assert_eq!(m.get(2, 1), 6);
    }

    #[test]
    fn erase_col_shifts_remaining_columns() {
        let mut m = DenseIMatrix::from_columns(2, &[vec![1, 1], vec![2, 2], vec![3, 3]]);
        m.erase_col(1);
        assert_eq!(m.num_col(), 2);
        assert_eq!(m.get_col(0), &[1, 1]);
        assert_eq!(m.get_col(1), &[3, 3]);
    }

    #[test]
    fn erase_row_shifts_remaining_rows() {
        let mut m = DenseIMatrix::from_columns(3, &[vec![1, 2, 3], vec![4, 5, 6]]);
        m.erase_row(1);
        assert_eq!(m.num_row(), 2);
        assert_eq!(m.get_col(0), &[1, 3]);
        assert_eq!(m.get_col(1), &[4, 6]);
    }

    #[test]
    fn swap_cols_exchanges_data() {
        let mut m = DenseIMatrix::from_columns(2, &[vec![1, 1], vec![2, 2]]);
        m.swap_cols(0, 1);
        assert_eq!(m.get_col(0), &[2, 2]);
        assert_eq!(m.get_col(1), &[1, 1]);
    }

    #[test]
    fn pivot_cols_finds_and_swaps_nonzero() {
        let mut e = DenseIMatrix::from_columns(2, &[vec![0, 0], vec![0, 5], vec![1, 0]]);
        let mut q = vec![10i64, 20, 30];
        let all_zero = pivot_cols(&mut e, &mut q, 0, 3, 0);
        assert!(!all_zero);
        assert_eq!(e.get(0, 0), 1);
        assert_eq!(q[0], 30);
    }

    #[test]
    fn pivot_cols_reports_all_zero_range() {
        let mut e = DenseIMatrix::new(2, 3);
        let mut q = vec![0i64; 3];
        assert!(pivot_cols(&mut e, &mut q, 0, 3, 0));
    }
}
