use super::space::{Point, M2D, V2D};
use super::MeshError;
use std::fmt;

/// The supported triangle families, named by their node count
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementOrder {
    /// Linear 3-node triangle
    T3,
    /// Quadratic 6-node triangle
    T6,
    /// Cubic 10-node triangle
    T10,
}

impl ElementOrder {
    /// Number of Nodes on each Element
    pub const fn num_nodes(self) -> usize {
        match self {
            Self::T3 => 3,
            Self::T6 => 6,
            Self::T10 => 10,
        }
    }

    /// Polynomial degree of the associated shape functions
    pub const fn degree(self) -> usize {
        match self {
            Self::T3 => 1,
            Self::T6 => 2,
            Self::T10 => 3,
        }
    }

    /// Number of COO entries produced by each Element (`num_nodes²`)
    pub const fn block_len(self) -> usize {
        self.num_nodes() * self.num_nodes()
    }
}

impl TryFrom<usize> for ElementOrder {
    type Error = MeshError;

    fn try_from(num_nodes: usize) -> Result<Self, Self::Error> {
        match num_nodes {
            3 => Ok(Self::T3),
            6 => Ok(Self::T6),
            10 => Ok(Self::T10),
            _ => Err(MeshError::UnsupportedOrder(num_nodes)),
        }
    }
}

impl fmt::Display for ElementOrder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "T{}", self.num_nodes())
    }
}

/// A borrowed view of one Element in a Mesh
///
/// The first three Node IDs are always the geometric corners (counter-clockwise for generated Meshes).
/// Any remaining IDs are edge or interior Nodes which only matter to the higher order shape functions.
#[derive(Clone, Copy, Debug)]
pub struct Element<'m> {
    pub id: usize,
    pub node_ids: &'m [usize],
}

impl<'m> Element<'m> {
    pub fn corner_ids(&self) -> [usize; 3] {
        [self.node_ids[0], self.node_ids[1], self.node_ids[2]]
    }
}

/// The affine map between the Reference triangle `{r ≥ 0, s ≥ 0, r + s ≤ 1}` and an Element in Real space.
///
/// The Jacobian and its inverse are constant over the whole Element, so they are computed once per Element and
/// reused at every quadrature point.
#[derive(Clone, Copy, Debug)]
pub struct AffineMap {
    origin: Point,
    signed_area: f64,
    /// `[[dx/dr, dx/ds], [dy/dr, dy/ds]]`
    jacobian: M2D,
    /// `[[dr/dx, dr/dy], [ds/dx, ds/dy]]`
    inverse: M2D,
}

impl AffineMap {
    /// Build the map from the three corner Points of a triangle.
    ///
    /// Returns `None` if the triangle is degenerate (zero area), in which case the inverse map is undefined.
    pub fn from_corners([p1, p2, p3]: [Point; 3]) -> Option<Self> {
        let signed_area =
            0.5 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));

        let jacobian = M2D::from([p2.x - p1.x, p3.x - p1.x], [p2.y - p1.y, p3.y - p1.y]);

        if signed_area == 0.0 || jacobian.det() == 0.0 {
            return None;
        }

        Some(Self {
            origin: p1,
            signed_area,
            jacobian,
            inverse: jacobian.inverse(),
        })
    }

    /// Area of the triangle, with sign given by the orientation of its corners
    pub fn signed_area(&self) -> f64 {
        self.signed_area
    }

    /// Physical area of the triangle (always positive)
    pub fn area(&self) -> f64 {
        self.signed_area.abs()
    }

    /// Determinant of the affine Jacobian (twice the signed area)
    pub fn det(&self) -> f64 {
        self.jacobian.det()
    }

    pub fn drdx(&self) -> f64 {
        self.inverse.u[0]
    }

    pub fn drdy(&self) -> f64 {
        self.inverse.u[1]
    }

    pub fn dsdx(&self) -> f64 {
        self.inverse.v[0]
    }

    pub fn dsdy(&self) -> f64 {
        self.inverse.v[1]
    }

    /// Map a reference space gradient `[d/dr, d/ds]` into a real space gradient `[d/dx, d/dy]`
    #[inline]
    pub fn real_gradient(&self, d_dr: f64, d_ds: f64) -> V2D {
        self.inverse.transpose() * V2D::from([d_dr, d_ds])
    }

    /// Map a reference space point into real space
    pub fn to_real(&self, r: f64, s: f64) -> Point {
        let offset = self.jacobian * V2D::from([r, s]);
        Point::new(self.origin.x + offset[0], self.origin.y + offset[1])
    }
}
