/// One sample point of a quadrature rule over the Reference triangle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadPoint {
    pub r: f64,
    pub s: f64,
    pub weight: f64,
}

impl QuadPoint {
    const fn new(r: f64, s: f64, weight: f64) -> Self {
        Self { r, s, weight }
    }
}

/// A fixed set of sample points over the Reference triangle `{r ≥ 0, s ≥ 0, r + s ≤ 1}`
///
/// Weights are normalized to the area of the Reference triangle (they sum to 0.5), so
/// `∫_T f dA ≈ |det J| · Σ w_q · f(r_q, s_q)` for a triangle `T` with affine Jacobian `J`.
#[derive(Clone, Copy, Debug)]
pub struct QuadratureRule {
    /// Highest total polynomial degree integrated exactly
    pub degree: usize,
    pub points: &'static [QuadPoint],
}

impl QuadratureRule {
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuadPoint> {
        self.points.iter()
    }

    /// Integrate `f(r, s)` over the Reference triangle
    ///
    /// ```
    /// use tri_fem_2d::integration::quadrature::DUNAVANT_12;
    ///
    /// // ∫ r² s dA = 2! 1! / 5! over the reference triangle
    /// let solution = DUNAVANT_12.integrate(|r, s| r * r * s);
    /// assert!((solution - 1.0 / 60.0).abs() < 1e-14);
    /// ```
    pub fn integrate<F>(&self, integrand: F) -> f64
    where
        F: Fn(f64, f64) -> f64,
    {
        self.points
            .iter()
            .map(|qp| qp.weight * integrand(qp.r, qp.s))
            .sum()
    }
}

// Dunavant's symmetric 12 point rule (degree 6)
const A: f64 = 0.873821971016996;
const B: f64 = 0.063089014491502;
const C: f64 = 0.501426509658179;
const D: f64 = 0.249286745170910;
const E: f64 = 0.636502499121399;
const F: f64 = 0.310352451033785;
const G: f64 = 0.053145049844816;

const W_AB: f64 = 0.5 * 0.050844906370207;
const W_CD: f64 = 0.5 * 0.116786275726379;
const W_EFG: f64 = 0.5 * 0.082851075618374;

const DUNAVANT_12_POINTS: [QuadPoint; 12] = [
    QuadPoint::new(A, B, W_AB),
    QuadPoint::new(B, A, W_AB),
    QuadPoint::new(B, B, W_AB),
    QuadPoint::new(C, D, W_CD),
    QuadPoint::new(D, C, W_CD),
    QuadPoint::new(D, D, W_CD),
    QuadPoint::new(E, F, W_EFG),
    QuadPoint::new(E, G, W_EFG),
    QuadPoint::new(F, E, W_EFG),
    QuadPoint::new(F, G, W_EFG),
    QuadPoint::new(G, E, W_EFG),
    QuadPoint::new(G, F, W_EFG),
];

/// The rule used for every Element order: exact for products of cubic-basis gradients
/// (degree 4), even when scaled by a linear per-element weight.
pub const DUNAVANT_12: QuadratureRule = QuadratureRule {
    degree: 6,
    points: &DUNAVANT_12_POINTS,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn factorial(n: u32) -> f64 {
        (1..=n).map(f64::from).product()
    }

    #[test]
    fn weights_sum_to_reference_area() {
        let total: f64 = DUNAVANT_12.iter().map(|qp| qp.weight).sum();
        assert!((total - 0.5).abs() < 1e-14);
        assert!(DUNAVANT_12.iter().all(|qp| qp.weight > 0.0));
    }

    #[test]
    fn three_weight_classes() {
        let count = |w: f64| DUNAVANT_12.iter().filter(|qp| qp.weight == w).count();

        assert_eq!(DUNAVANT_12.num_points(), 12);
        assert_eq!(count(W_AB), 3);
        assert_eq!(count(W_CD), 3);
        assert_eq!(count(W_EFG), 6);
    }

    #[test]
    fn points_inside_reference_triangle() {
        for qp in DUNAVANT_12.iter() {
            assert!(qp.r > 0.0 && qp.s > 0.0 && qp.r + qp.s < 1.0);
        }
    }

    #[test]
    fn exact_for_monomials() {
        // ∫ r^a s^b dA = a! b! / (a + b + 2)!
        let degree = DUNAVANT_12.degree as u32;
        for a in 0..=degree {
            for b in 0..=(degree - a) {
                let exact = factorial(a) * factorial(b) / factorial(a + b + 2);
                let approx = DUNAVANT_12.integrate(|r, s| r.powi(a as i32) * s.powi(b as i32));

                assert!(
                    (approx - exact).abs() < 1e-13,
                    "r^{} s^{}: {} != {}",
                    a,
                    b,
                    approx,
                    exact
                );
            }
        }
    }
}
