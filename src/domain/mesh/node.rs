use super::space::Point;
use super::MeshError;

/// Coordinates of every Node in a Mesh, indexed by 0-based Node ID.
///
/// Stored as two parallel sequences. The table is built once by whoever generates the Mesh
/// and is only ever borrowed by the assembly routines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl NodeTable {
    /// Build a table from two same-length coordinate sequences
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self, MeshError> {
        if xs.len() != ys.len() {
            return Err(MeshError::CoordinateLength {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }

        Ok(Self { xs, ys })
    }

    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Self {
        let (xs, ys) = points.into_iter().map(|p| (p.x, p.y)).unzip();
        Self { xs, ys }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[inline]
    pub fn x(&self, id: usize) -> f64 {
        self.xs[id]
    }

    #[inline]
    pub fn y(&self, id: usize) -> f64 {
        self.ys[id]
    }

    #[inline]
    pub fn point(&self, id: usize) -> Point {
        Point::new(self.xs[id], self.ys[id])
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    /// Iterate over all `(id, Point)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, Point)> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .enumerate()
            .map(|(id, (x, y))| (id, Point::new(*x, *y)))
    }

    /// Find the Node sitting at `(x, y)`.
    ///
    /// A Node matches when it lies inside the square box of side `edge_size` centered on the query.
    /// If several Nodes match, the one with the largest ID is returned.
    ///
    /// A miss is not an error; `None` is returned and a warning is logged.
    ///
    /// ```
    /// use tri_fem_2d::domain::mesh::node::NodeTable;
    ///
    /// let nodes = NodeTable::new(vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]).unwrap();
    ///
    /// assert_eq!(nodes.locate(0.98, 0.01, 0.1), Some(1));
    /// assert_eq!(nodes.locate(0.5, 0.5, 0.1), None);
    /// ```
    pub fn locate(&self, x: f64, y: f64, edge_size: f64) -> Option<usize> {
        let half = edge_size / 2.0;
        let found = self
            .iter()
            .filter(|(_, p)| (p.x - x).abs() <= half && (p.y - y).abs() <= half)
            .map(|(id, _)| id)
            .last();

        if found.is_none() {
            log::warn!(
                "No Node found within {} of {}",
                half,
                Point::new(x, y)
            );
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_coordinate_lengths() {
        assert!(NodeTable::new(vec![0.0, 1.0], vec![0.0]).is_err());
    }

    #[test]
    fn accessors() {
        let nodes = NodeTable::from_points([Point::new(0.5, 1.5), Point::new(-2.0, 3.0)]);

        assert_eq!(nodes.len(), 2);
        assert!((nodes.x(1) + 2.0).abs() < 1e-15);
        assert!((nodes.y(0) - 1.5).abs() < 1e-15);
        assert_eq!(nodes.point(1), Point::new(-2.0, 3.0));
    }

    #[test]
    fn locate_prefers_last_match() {
        let nodes = NodeTable::new(vec![0.0, 0.01, 5.0], vec![0.0, 0.0, 5.0]).unwrap();

        assert_eq!(nodes.locate(0.0, 0.0, 0.1), Some(1));
        assert_eq!(nodes.locate(0.0, 0.0, 0.001), Some(0));
        assert_eq!(nodes.locate(4.96, 5.04, 0.1), Some(2));
    }

    #[test]
    fn locate_miss() {
        let nodes = NodeTable::new(vec![0.0, 1.0], vec![0.0, 0.0]).unwrap();
        assert!(nodes.locate(0.5, 0.0, 0.5).is_none());
    }
}
