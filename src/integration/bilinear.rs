use super::NodeSample;
use crate::assembly::AssemblyError;
use crate::domain::mesh::space::V2D;
use std::fmt;
use std::str::FromStr;

/// The bilinear forms which can be assembled.
///
/// `i` is the row (test) function and `j` the column (trial) function.
///
/// | Variant | Code | Integrand |
/// |---|---|---|
/// | `Full`  | 0 | `dφi/dx·dφj/dx + dφi/dy·dφj/dy` |
/// | `DxDx`  | 1 | `dφi/dx·dφj/dx` |
/// | `DyDy`  | 2 | `dφi/dy·dφj/dy` |
/// | `DxDy`  | 3 | `dφi/dx·dφj/dy` |
/// | `DyDx`  | 4 | `dφi/dy·dφj/dx` |
/// | `ValDx` | 5 | `φi·dφj/dx` |
/// | `ValDy` | 6 | `φi·dφj/dy` |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Full,
    DxDx,
    DyDy,
    DxDy,
    DyDx,
    ValDx,
    ValDy,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Self::Full,
        Self::DxDx,
        Self::DyDy,
        Self::DxDy,
        Self::DyDx,
        Self::ValDx,
        Self::ValDy,
    ];

    /// Value of the integrand for row function `p` and column function `q` at one sample point
    #[inline]
    pub fn integrand(self, p: &NodeSample, q: &NodeSample) -> f64 {
        match self {
            Self::Full => V2D::dot(p.grad, q.grad),
            Self::DxDx => p.grad[0] * q.grad[0],
            Self::DyDy => p.grad[1] * q.grad[1],
            Self::DxDy => p.grad[0] * q.grad[1],
            Self::DyDx => p.grad[1] * q.grad[0],
            Self::ValDx => p.value * q.grad[0],
            Self::ValDy => p.value * q.grad[1],
        }
    }

    /// Integer selector code
    pub const fn code(self) -> i32 {
        match self {
            Self::Full => 0,
            Self::DxDx => 1,
            Self::DyDy => 2,
            Self::DxDy => 3,
            Self::DyDx => 4,
            Self::ValDx => 5,
            Self::ValDy => 6,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::DxDx => "dxdx",
            Self::DyDy => "dydy",
            Self::DxDy => "dxdy",
            Self::DyDx => "dydx",
            Self::ValDx => "val_dx",
            Self::ValDy => "val_dy",
        }
    }

    /// Whether the assembled operator is symmetric for any mesh
    pub const fn is_symmetric(self) -> bool {
        matches!(self, Self::Full | Self::DxDx | Self::DyDy)
    }
}

impl TryFrom<i32> for Operator {
    type Error = AssemblyError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|op| op.code() == code)
            .ok_or_else(|| AssemblyError::InvalidOperator(code.to_string()))
    }
}

impl FromStr for Operator {
    type Err = AssemblyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|op| op.name() == normalized || op.name().replace('_', "") == normalized)
            .ok_or_else(|| AssemblyError::InvalidOperator(name.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(value: f64, dx: f64, dy: f64) -> NodeSample {
        NodeSample {
            value,
            grad: V2D::from([dx, dy]),
        }
    }

    #[test]
    fn integrand_table() {
        let p = node(2.0, 3.0, 5.0);
        let q = node(7.0, 11.0, 13.0);

        let expected = [
            (Operator::Full, 3.0 * 11.0 + 5.0 * 13.0),
            (Operator::DxDx, 3.0 * 11.0),
            (Operator::DyDy, 5.0 * 13.0),
            (Operator::DxDy, 3.0 * 13.0),
            (Operator::DyDx, 5.0 * 11.0),
            (Operator::ValDx, 2.0 * 11.0),
            (Operator::ValDy, 2.0 * 13.0),
        ];

        for (op, value) in expected {
            assert!((op.integrand(&p, &q) - value).abs() < 1e-14, "{}", op);
        }
    }

    #[test]
    fn full_is_sum_of_diagonal_parts() {
        let p = node(0.3, -1.5, 0.25);
        let q = node(0.6, 0.75, -2.0);

        let sum = Operator::DxDx.integrand(&p, &q) + Operator::DyDy.integrand(&p, &q);
        assert!((Operator::Full.integrand(&p, &q) - sum).abs() < 1e-15);
    }

    #[test]
    fn codes_round_trip() {
        for op in Operator::ALL {
            assert_eq!(Operator::try_from(op.code()).unwrap(), op);
            assert_eq!(op.name().parse::<Operator>().unwrap(), op);
        }
    }

    #[test]
    fn name_spellings() {
        assert_eq!("ValDx".parse::<Operator>().unwrap(), Operator::ValDx);
        assert_eq!(" DXDY ".parse::<Operator>().unwrap(), Operator::DxDy);
    }

    #[test]
    fn invalid_selectors() {
        assert!(matches!(
            Operator::try_from(7),
            Err(AssemblyError::InvalidOperator(_))
        ));
        assert!(Operator::try_from(-1).is_err());
        assert!("laplacian".parse::<Operator>().is_err());
    }
}
