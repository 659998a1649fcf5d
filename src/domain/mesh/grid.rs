use super::element::ElementOrder;
use super::node::NodeTable;
use super::space::Point;
use super::{Mesh, MeshError};
use crate::basis::lattice;

impl Mesh {
    /// Generate a structured triangle Mesh over the rectangle `[x_min, x_max] × [y_min, y_max]`
    ///
    /// The rectangle is cut into `nx × ny` cells. Each cell is split along its SE-NW diagonal into the
    /// Elements `(sw, se, nw)` and `(ne, nw, se)`; both are counter-clockwise.
    ///
    /// Nodes sit on a regular lattice with `k·nx + 1` columns and `k·ny + 1` rows (where `k` is the polynomial
    /// degree of `order`), numbered row by row from the bottom left corner. Elements are numbered cell by cell
    /// in the same order.
    ///
    /// ```
    /// use tri_fem_2d::domain::mesh::{element::ElementOrder, Mesh};
    ///
    /// let mesh = Mesh::grid(ElementOrder::T6, 3, 2, [0.0, 3.0], [0.0, 2.0]).unwrap();
    ///
    /// assert_eq!(mesh.num_nodes(), 7 * 5);
    /// assert_eq!(mesh.num_elements(), 12);
    /// assert_eq!(&mesh.connectivity_one_based()[0..6], &[1, 3, 15, 2, 9, 8]);
    /// ```
    pub fn grid(
        order: ElementOrder,
        nx: usize,
        ny: usize,
        [x_min, x_max]: [f64; 2],
        [y_min, y_max]: [f64; 2],
    ) -> Result<Self, MeshError> {
        let has_extent = |lo: f64, hi: f64| hi - lo > 0.0;
        if nx == 0 || ny == 0 || !has_extent(x_min, x_max) || !has_extent(y_min, y_max) {
            return Err(MeshError::EmptyGrid);
        }

        let k = order.degree();
        let [cols, rows] = [k * nx + 1, k * ny + 1];

        let nodes = NodeTable::from_points((0..rows).flat_map(|b| {
            (0..cols).map(move |a| {
                Point::new(
                    x_min + (x_max - x_min) * a as f64 / (cols - 1) as f64,
                    y_min + (y_max - y_min) * b as f64 / (rows - 1) as f64,
                )
            })
        }));

        let local_lattice = lattice(order);
        let mut connectivity = Vec::with_capacity(2 * nx * ny * order.num_nodes());

        for j in 0..ny {
            for i in 0..nx {
                let [a0, b0] = [(k * i) as isize, (k * j) as isize];
                let k = k as isize;

                let sw = [a0, b0];
                let se = [a0 + k, b0];
                let nw = [a0, b0 + k];
                let ne = [a0 + k, b0 + k];

                for [c0, c1, c2] in [[sw, se, nw], [ne, nw, se]] {
                    // unit lattice steps along the two Reference axes of this Element
                    let dr = [(c1[0] - c0[0]) / k, (c1[1] - c0[1]) / k];
                    let ds = [(c2[0] - c0[0]) / k, (c2[1] - c0[1]) / k];

                    connectivity.extend(local_lattice.iter().map(|[p, q]| {
                        let [p, q] = [*p as isize, *q as isize];
                        let a = c0[0] + p * dr[0] + q * ds[0];
                        let b = c0[1] + p * dr[1] + q * ds[1];

                        b as usize * cols + a as usize
                    }));
                }
            }
        }

        Self::new(order, nodes, connectivity)
    }
}
