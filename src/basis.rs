/// Lagrange shape functions for the 3, 6 and 10 node triangles
pub mod shape_fns;

use crate::domain::mesh::element::ElementOrder;
use smallvec::SmallVec;

pub use shape_fns::{t10::T10ShapeFn, t3::T3ShapeFn, t6::T6ShapeFn};

/// Largest number of local Nodes on any supported Element. Sets the inline capacity of the per-node buffers.
pub const MAX_LOCAL_NODES: usize = 10;

/// Per-local-node scalars, stored inline for every supported Element order
pub type LocalValues = SmallVec<[f64; MAX_LOCAL_NODES]>;

/// Shape function values and their Reference space derivatives at a single point `(r, s)`
#[derive(Clone, Debug, Default)]
pub struct ShapeSample {
    pub values: LocalValues,
    pub d_dr: LocalValues,
    pub d_ds: LocalValues,
}

impl ShapeSample {
    pub fn with_capacity(num_nodes: usize) -> Self {
        Self {
            values: SmallVec::with_capacity(num_nodes),
            d_dr: SmallVec::with_capacity(num_nodes),
            d_ds: SmallVec::with_capacity(num_nodes),
        }
    }

    /// Number of local Nodes sampled
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn push(&mut self, value: f64, d_dr: f64, d_ds: f64) {
        self.values.push(value);
        self.d_dr.push(d_dr);
        self.d_ds.push(d_ds);
    }
}

/// A nodal basis over the Reference triangle `{r ≥ 0, s ≥ 0, r + s ≤ 1}`.
///
/// [T3ShapeFn], [T6ShapeFn] and [T10ShapeFn] implement this trait. Every implementation must:
/// * return exactly `ORDER.num_nodes()` values and derivatives
/// * form a partition of unity (values sum to 1, derivatives sum to 0)
/// * list the three corner Nodes first
pub trait ShapeFn: Send + Sync {
    /// The Element family this basis is defined for
    const ORDER: ElementOrder;

    /// Reference position of each local Node, in units of `1 / ORDER.degree()`
    const LATTICE: &'static [[usize; 2]];

    /// Evaluate every shape function and its `r` and `s` derivatives at `(r, s)`
    fn sample(r: f64, s: f64) -> ShapeSample;

    /// Reference coordinates of each local Node
    fn nodal_points() -> Vec<[f64; 2]> {
        let degree = Self::ORDER.degree() as f64;
        Self::LATTICE
            .iter()
            .map(|[i, j]| [*i as f64 / degree, *j as f64 / degree])
            .collect()
    }
}

/// Evaluate the basis associated with an [ElementOrder] at `(r, s)`
pub fn sample(order: ElementOrder, r: f64, s: f64) -> ShapeSample {
    match order {
        ElementOrder::T3 => T3ShapeFn::sample(r, s),
        ElementOrder::T6 => T6ShapeFn::sample(r, s),
        ElementOrder::T10 => T10ShapeFn::sample(r, s),
    }
}

/// Reference lattice positions of the local Nodes for an [ElementOrder] (see [ShapeFn::LATTICE])
pub fn lattice(order: ElementOrder) -> &'static [[usize; 2]] {
    match order {
        ElementOrder::T3 => T3ShapeFn::LATTICE,
        ElementOrder::T6 => T6ShapeFn::LATTICE,
        ElementOrder::T10 => T10ShapeFn::LATTICE,
    }
}
