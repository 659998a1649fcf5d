use nalgebra::DMatrix;
use std::collections::BTreeMap;
use thiserror::Error;

/// Coordinate (triplet) storage for an assembled operator
///
/// Entry `k` contributes `values[k]` at `(rows[k], cols[k])`. Duplicate coordinates are allowed
/// and are meant to be summed (see [CsrMatrix::from_coo]).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CooMatrix {
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<f64>,
}

impl CooMatrix {
    /// Allocate `len` zero-valued entries at `(0, 0)`
    pub fn zeroed(len: usize) -> Self {
        Self {
            rows: vec![0; len],
            cols: vec![0; len],
            values: vec![0.0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all `([row, col], value)` triplets
    pub fn iter(&self) -> impl Iterator<Item = ([usize; 2], f64)> + '_ {
        self.rows
            .iter()
            .zip(self.cols.iter())
            .zip(self.values.iter())
            .map(|((r, c), v)| ([*r, *c], *v))
    }
}

/// Compressed Sparse Row storage for a square matrix
///
/// Column indices are sorted within each row and every `(row, col)` pair appears at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    dimension: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<f64>,
}

impl CsrMatrix {
    /// Canonicalize a [CooMatrix]: duplicate coordinates are summed and columns are sorted within each row
    ///
    /// Entries which sum to zero are kept, so the structure only depends on the coordinates.
    ///
    /// ```
    /// use tri_fem_2d::linalg::sparse_matrix::{CooMatrix, CsrMatrix};
    ///
    /// let coo = CooMatrix {
    ///     rows: vec![1, 0, 1, 1],
    ///     cols: vec![1, 0, 0, 1],
    ///     values: vec![2.0, 1.0, -1.0, 3.0],
    /// };
    /// let csr = CsrMatrix::from_coo(&coo, 2).unwrap();
    ///
    /// assert_eq!(csr.nnz(), 3);
    /// assert_eq!(csr.get(1, 1), 5.0);
    /// assert_eq!(csr.row_ptr(), &[0, 1, 3]);
    /// ```
    pub fn from_coo(coo: &CooMatrix, dimension: usize) -> Result<Self, SparseError> {
        let mut entries: BTreeMap<[usize; 2], f64> = BTreeMap::new();

        for ([row, col], value) in coo.iter() {
            if row >= dimension || col >= dimension {
                return Err(SparseError::IndexOutOfBounds {
                    row,
                    col,
                    dimension,
                });
            }

            entries
                .entry([row, col])
                .and_modify(|current| *current += value)
                .or_insert(value);
        }

        let mut row_ptr = vec![0; dimension + 1];
        let mut col_idx = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());

        // BTreeMap iteration is already sorted by row then column
        for ([row, col], value) in entries {
            row_ptr[row + 1] += 1;
            col_idx.push(col);
            values.push(value);
        }
        for r in 0..dimension {
            row_ptr[r + 1] += row_ptr[r];
        }

        log::debug!(
            "Compressed {} COO entries into {} non-zeros ({}x{})",
            coo.len(),
            values.len(),
            dimension,
            dimension
        );

        Ok(Self {
            dimension,
            row_ptr,
            col_idx,
            values,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_ptr(&self) -> &[usize] {
        &self.row_ptr
    }

    pub fn col_idx(&self) -> &[usize] {
        &self.col_idx
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over the `(col, value)` pairs stored in a row
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.row_range(row);
        self.col_idx[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Value at `(row, col)`; zero if the entry is not stored
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let range = self.row_range(row);
        match self.col_idx[range.clone()].binary_search(&col) {
            Ok(offset) => self.values[range.start + offset],
            Err(_) => 0.0,
        }
    }

    fn row_range(&self, row: usize) -> std::ops::Range<usize> {
        if row < self.dimension {
            self.row_ptr[row]..self.row_ptr[row + 1]
        } else {
            0..0
        }
    }
}

impl From<&CsrMatrix> for DMatrix<f64> {
    fn from(sparse: &CsrMatrix) -> Self {
        let mut dense = DMatrix::zeros(sparse.dimension, sparse.dimension);
        for r in 0..sparse.dimension {
            for (c, value) in sparse.row(r) {
                dense[(r, c)] = value;
            }
        }
        dense
    }
}

/// Error type for sparse matrix conversions
#[derive(Debug, Error)]
pub enum SparseError {
    #[error("Entry ({row}, {col}) is outside a {dimension}x{dimension} matrix; Cannot compress matrix!")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        dimension: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_coo() -> CooMatrix {
        CooMatrix {
            rows: vec![2, 0, 2, 1, 0, 2, 0],
            cols: vec![0, 2, 0, 1, 0, 2, 2],
            values: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, -2.0],
        }
    }

    #[test]
    fn duplicates_are_summed() {
        let csr = CsrMatrix::from_coo(&sample_coo(), 3).unwrap();

        assert_eq!(csr.nnz(), 5);
        assert_eq!(csr.get(2, 0), 4.0);
        assert_eq!(csr.get(0, 2), 0.0);
        assert_eq!(csr.get(1, 0), 0.0);
        assert_eq!(csr.get(7, 7), 0.0);
    }

    #[test]
    fn columns_sorted_within_rows() {
        let csr = CsrMatrix::from_coo(&sample_coo(), 3).unwrap();

        assert_eq!(csr.row_ptr(), &[0, 2, 3, 5]);
        assert_eq!(csr.col_idx(), &[0, 2, 1, 0, 2]);
        assert_eq!(csr.values(), &[5.0, 0.0, 4.0, 4.0, 6.0]);
    }

    #[test]
    fn dense_conversion() {
        let coo = sample_coo();
        let dense = DMatrix::from(&CsrMatrix::from_coo(&coo, 3).unwrap());

        let mut expected = DMatrix::<f64>::zeros(3, 3);
        for ([r, c], v) in coo.iter() {
            expected[(r, c)] += v;
        }
        assert_eq!(dense, expected);
    }

    #[test]
    fn empty_rows() {
        let coo = CooMatrix {
            rows: vec![3],
            cols: vec![0],
            values: vec![1.5],
        };
        let csr = CsrMatrix::from_coo(&coo, 5).unwrap();

        assert_eq!(csr.row_ptr(), &[0, 0, 0, 0, 1, 1]);
        assert_eq!(csr.row(0).count(), 0);
        assert_eq!(csr.row(3).collect::<Vec<_>>(), vec![(0, 1.5)]);
    }

    #[test]
    fn index_out_of_bounds() {
        let coo = sample_coo();
        assert!(matches!(
            CsrMatrix::from_coo(&coo, 2),
            Err(SparseError::IndexOutOfBounds { row: 2, col: 0, dimension: 2 })
        ));
    }
}
