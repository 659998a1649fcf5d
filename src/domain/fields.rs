/// Damping fields for a Multiaxial Perfectly Matched Layer around a rectangular Domain
pub mod mpml;

use super::mesh::{node::NodeTable, space::Point};
use std::ops::Index;

/// A scalar value attached to every Node of a Mesh (indexed by 0-based Node ID)
///
/// Used as the optional per-node weight during operator assembly.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeField {
    values: Vec<f64>,
}

impl NodeField {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn constant(num_nodes: usize, value: f64) -> Self {
        Self {
            values: vec![value; num_nodes],
        }
    }

    pub fn zeros(num_nodes: usize) -> Self {
        Self::constant(num_nodes, 0.0)
    }

    /// Evaluate a function of position at every Node in a table
    pub fn from_fn<F>(nodes: &NodeTable, f: F) -> Self
    where
        F: Fn(Point) -> f64,
    {
        Self {
            values: nodes.iter().map(|(_, p)| f(p)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.values
    }
}

impl Index<usize> for NodeField {
    type Output = f64;

    fn index(&self, node_id: usize) -> &Self::Output {
        &self.values[node_id]
    }
}

impl From<Vec<f64>> for NodeField {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_from_position() {
        let nodes = NodeTable::from_points([Point::new(1.0, 2.0), Point::new(-0.5, 4.0)]);
        let field = NodeField::from_fn(&nodes, |p| p.x * p.y);

        assert_eq!(field.len(), 2);
        assert!((field[0] - 2.0).abs() < 1e-15);
        assert!((field[1] + 2.0).abs() < 1e-15);
    }

    #[test]
    fn constant_fields() {
        let field = NodeField::constant(4, 2.5);
        assert!(field.as_slice().iter().all(|v| *v == 2.5));
        assert!(NodeField::zeros(0).is_empty());
    }
}
