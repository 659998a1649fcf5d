/// Per-node scalar fields defined over a Mesh
pub mod fields;
/// The geometric structure of a triangulated Domain
pub mod mesh;

pub use fields::NodeField;
pub use mesh::{element::ElementOrder, Mesh, MeshError};
