/// Sparsely Packed Matrices (assembly output and its compressed form)
pub mod sparse_matrix;

pub use sparse_matrix::{CooMatrix, CsrMatrix, SparseError};
