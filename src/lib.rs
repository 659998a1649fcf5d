/// Lagrange shape functions over the Reference triangle
pub mod basis;
/// Triangle Meshes and the fields defined over them
pub mod domain;
/// Quadrature and the bilinear forms which can be integrated
pub mod integration;
/// Sparse assembly of operators into coordinate form
pub mod assembly;
/// Sparse matrix storage
pub mod linalg;

pub use assembly::{
    assemble, assemble_into, assemble_raw, element_matrix, par_assemble, AssemblyError,
};
pub use basis::{ShapeFn, T10ShapeFn, T3ShapeFn, T6ShapeFn};
pub use domain::{ElementOrder, Mesh, MeshError, NodeField};
pub use domain::mesh::space::{Point, M2D, V2D};
pub use integration::Operator;
pub use linalg::{CooMatrix, CsrMatrix};
