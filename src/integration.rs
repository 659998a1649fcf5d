use crate::basis::{LocalValues, ShapeSample};
use crate::domain::mesh::{element::AffineMap, space::V2D};

/// The bilinear forms (integrands) which can be assembled into an operator
pub mod bilinear;

/// Quadrature rules over the Reference triangle
pub mod quadrature;

pub use bilinear::Operator;
pub use quadrature::{QuadPoint, QuadratureRule, DUNAVANT_12};

/// Value and Real space gradient of a single local shape function at one sample point
#[derive(Clone, Copy, Debug, Default)]
pub struct NodeSample {
    pub value: f64,
    pub grad: V2D,
}

/// Shape function values and Real space gradients for every local Node at one sample point
#[derive(Clone, Debug, Default)]
pub struct RealShape {
    pub values: LocalValues,
    pub d_dx: LocalValues,
    pub d_dy: LocalValues,
}

impl RealShape {
    /// Push a Reference space [ShapeSample] through an Element's [AffineMap]
    pub fn from_sample(sample: &ShapeSample, map: &AffineMap) -> Self {
        let (d_dx, d_dy) = sample
            .d_dr
            .iter()
            .zip(sample.d_ds.iter())
            .map(|(d_dr, d_ds)| {
                let grad = map.real_gradient(*d_dr, *d_ds);
                (grad[0], grad[1])
            })
            .unzip();

        Self {
            values: sample.values.clone(),
            d_dx,
            d_dy,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn node(&self, local_idx: usize) -> NodeSample {
        NodeSample {
            value: self.values[local_idx],
            grad: V2D::from([self.d_dx[local_idx], self.d_dy[local_idx]]),
        }
    }
}
