pub mod t3 {
    use super::super::{ShapeFn, ShapeSample};
    use crate::domain::mesh::element::ElementOrder;

    /// Linear shape functions over the 3 node triangle
    ///
    /// ```text
    ///   s
    ///   |
    ///   2
    ///   |\
    ///   | \
    ///   |  \
    ///   0---1 -- r
    /// ```
    #[derive(Clone, Copy, Debug)]
    pub struct T3ShapeFn;

    impl ShapeFn for T3ShapeFn {
        const ORDER: ElementOrder = ElementOrder::T3;
        const LATTICE: &'static [[usize; 2]] = &[[0, 0], [1, 0], [0, 1]];

        fn sample(r: f64, s: f64) -> ShapeSample {
            let mut sample = ShapeSample::with_capacity(3);

            sample.push(1.0 - r - s, -1.0, -1.0);
            sample.push(r, 1.0, 0.0);
            sample.push(s, 0.0, 1.0);

            sample
        }
    }
}

pub mod t6 {
    use super::super::{ShapeFn, ShapeSample};
    use crate::domain::mesh::element::ElementOrder;

    /// Quadratic shape functions over the 6 node triangle
    ///
    /// ```text
    ///   s
    ///   |
    ///   2
    ///   |\
    ///   5 4
    ///   |  \
    ///   0-3-1 -- r
    /// ```
    #[derive(Clone, Copy, Debug)]
    pub struct T6ShapeFn;

    impl ShapeFn for T6ShapeFn {
        const ORDER: ElementOrder = ElementOrder::T6;
        const LATTICE: &'static [[usize; 2]] = &[[0, 0], [2, 0], [0, 2], [1, 0], [1, 1], [0, 1]];

        fn sample(r: f64, s: f64) -> ShapeSample {
            let mut sample = ShapeSample::with_capacity(6);
            let t = 1.0 - r - s;

            sample.push(
                2.0 * t * (0.5 - r - s),
                -3.0 + 4.0 * r + 4.0 * s,
                -3.0 + 4.0 * r + 4.0 * s,
            );
            sample.push(2.0 * r * (r - 0.5), -1.0 + 4.0 * r, 0.0);
            sample.push(2.0 * s * (s - 0.5), 0.0, -1.0 + 4.0 * s);
            sample.push(4.0 * r * t, 4.0 - 8.0 * r - 4.0 * s, -4.0 * r);
            sample.push(4.0 * r * s, 4.0 * s, 4.0 * r);
            sample.push(4.0 * s * t, -4.0 * s, 4.0 - 4.0 * r - 8.0 * s);

            sample
        }
    }
}

pub mod t10 {
    use super::super::{ShapeFn, ShapeSample};
    use crate::domain::mesh::element::ElementOrder;

    /// Cubic shape functions over the 10 node triangle
    ///
    /// ```text
    ///   s
    ///   |
    ///   2
    ///   |\
    ///   7 6
    ///   |  \
    ///   8 9 5
    ///   |    \
    ///   0-3-4-1 -- r
    /// ```
    ///
    /// Written in terms of the barycentric coordinates `L = [1 - r - s, r, s]`:
    /// * corners: `L·(3L - 1)·(3L - 2) / 2`
    /// * edge Nodes (one third of the way from corner `a` to corner `b`): `9/2·La·Lb·(3La - 1)`
    /// * interior Node: `27·L0·L1·L2`
    #[derive(Clone, Copy, Debug)]
    pub struct T10ShapeFn;

    /// (near corner, far corner) of each edge Node in local order
    const EDGE_NODES: [[usize; 2]; 6] = [[0, 1], [1, 0], [1, 2], [2, 1], [2, 0], [0, 2]];

    impl ShapeFn for T10ShapeFn {
        const ORDER: ElementOrder = ElementOrder::T10;
        const LATTICE: &'static [[usize; 2]] = &[
            [0, 0],
            [3, 0],
            [0, 3],
            [1, 0],
            [2, 0],
            [2, 1],
            [1, 2],
            [0, 2],
            [0, 1],
            [1, 1],
        ];

        fn sample(r: f64, s: f64) -> ShapeSample {
            let mut sample = ShapeSample::with_capacity(10);
            let l = [1.0 - r - s, r, s];

            // chain rule: dL0/dr = dL0/ds = -1, dL1/dr = 1, dL2/ds = 1
            let mut push_barycentric = |value: f64, d_dl: [f64; 3]| {
                sample.push(value, d_dl[1] - d_dl[0], d_dl[2] - d_dl[0]);
            };

            for c in 0..3 {
                let lc = l[c];
                let mut d_dl = [0.0; 3];
                d_dl[c] = 0.5 * (27.0 * lc * lc - 18.0 * lc + 2.0);

                push_barycentric(0.5 * lc * (3.0 * lc - 1.0) * (3.0 * lc - 2.0), d_dl);
            }

            for [a, b] in EDGE_NODES {
                let (la, lb) = (l[a], l[b]);
                let mut d_dl = [0.0; 3];
                d_dl[a] = 4.5 * lb * (6.0 * la - 1.0);
                d_dl[b] = 4.5 * la * (3.0 * la - 1.0);

                push_barycentric(4.5 * la * lb * (3.0 * la - 1.0), d_dl);
            }

            push_barycentric(
                27.0 * l[0] * l[1] * l[2],
                [27.0 * l[1] * l[2], 27.0 * l[0] * l[2], 27.0 * l[0] * l[1]],
            );

            sample
        }
    }
}
