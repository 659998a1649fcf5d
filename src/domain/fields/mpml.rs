use super::NodeField;
use crate::domain::mesh::{node::NodeTable, space::Point, Mesh};

use json::JsonValue;
use std::fs::read_to_string;
use thiserror::Error;

/// Coupling ratio applied to the y-profile in the x-direction fields
pub const DEFAULT_PXY: f64 = 0.15;
/// Coupling ratio applied to the x-profile in the y-direction fields
pub const DEFAULT_PYX: f64 = 0.15;
/// Theoretical reflection coefficient of the layer
pub const DEFAULT_REFLECTION: f64 = 1e-4;

/// Which sides of the Domain are covered by an absorbing layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MpmlSides {
    pub x_min: bool,
    pub x_max: bool,
    pub y_min: bool,
    pub y_max: bool,
}

impl MpmlSides {
    pub const ALL: Self = Self {
        x_min: true,
        x_max: true,
        y_min: true,
        y_max: true,
    };

    /// Every side except `y_max`, which is left as a free surface
    pub const FREE_SURFACE: Self = Self {
        x_min: true,
        x_max: true,
        y_min: true,
        y_max: false,
    };
}

impl Default for MpmlSides {
    fn default() -> Self {
        Self::ALL
    }
}

/// Geometry and strength of the absorbing layers around a rectangular Domain
#[derive(Debug, Clone, PartialEq)]
pub struct MpmlConfig {
    /// Number of cells across the layer in the x and y directions
    pub cells: [usize; 2],
    /// Cell size
    pub h: f64,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    /// Largest P-wave velocity in the model
    pub vp_max: f64,
    pub sides: MpmlSides,
    pub pxy: f64,
    pub pyx: f64,
    pub reflection: f64,
}

/// The six damping quantities at a single point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MpmlDamping {
    pub dx: f64,
    pub dy: f64,
    pub dxx: f64,
    pub dyy: f64,
    pub dxx_pyx: f64,
    pub dyy_pxy: f64,
}

/// Quadratic damping profile across one layer
#[derive(Debug, Clone, Copy)]
struct Profile {
    d0: f64,
    thickness: f64,
}

impl Profile {
    /// profile value and its derivative with respect to the coordinate at a signed depth into the layer
    fn at(&self, depth: f64, direction: f64) -> (f64, f64) {
        let ratio = depth / self.thickness;
        (
            self.d0 * ratio * ratio,
            direction * 2.0 * self.d0 * depth / (self.thickness * self.thickness),
        )
    }
}

impl MpmlConfig {
    /// Layers on every side with the default coupling ratios and reflection coefficient
    pub fn new(cells: [usize; 2], h: f64, x_bounds: [f64; 2], y_bounds: [f64; 2], vp_max: f64) -> Self {
        Self {
            cells,
            h,
            x_bounds,
            y_bounds,
            vp_max,
            sides: MpmlSides::ALL,
            pxy: DEFAULT_PXY,
            pyx: DEFAULT_PYX,
            reflection: DEFAULT_REFLECTION,
        }
    }

    pub fn with_sides(mut self, sides: MpmlSides) -> Self {
        self.sides = sides;
        self
    }

    /// Read a layer description from a JSON file with the following format
    ///
    /// `"Sides"`, `"Pxy"`, `"Pyx"` and `"Reflection"` are optional.
    ///
    /// ```JSON
    /// {
    ///     "Cells": [10, 10],
    ///     "CellSize": 5.0,
    ///     "XBounds": [0.0, 1000.0],
    ///     "YBounds": [0.0, 500.0],
    ///     "VpMax": 3500.0,
    ///     "Sides": { "XMin": true, "XMax": true, "YMin": true, "YMax": false },
    ///     "Pxy": 0.15,
    ///     "Pyx": 0.15,
    ///     "Reflection": 0.0001
    /// }
    /// ```
    pub fn from_file(path: impl AsRef<str>) -> Result<Self, MpmlError> {
        let contents = read_to_string(path.as_ref())?;
        let config_json = json::parse(&contents)
            .map_err(|err| MpmlError::Format(format!("invalid JSON ({})", err)))?;

        Self::from_json(&config_json)
    }

    /// Read a layer description from a parsed JSON value (see [MpmlConfig::from_file] for the format)
    pub fn from_json(config_json: &JsonValue) -> Result<Self, MpmlError> {
        let cells = [
            required_usize(&config_json["Cells"][0], "Cells")?,
            required_usize(&config_json["Cells"][1], "Cells")?,
        ];
        let x_bounds = [
            required_f64(&config_json["XBounds"][0], "XBounds")?,
            required_f64(&config_json["XBounds"][1], "XBounds")?,
        ];
        let y_bounds = [
            required_f64(&config_json["YBounds"][0], "YBounds")?,
            required_f64(&config_json["YBounds"][1], "YBounds")?,
        ];

        let sides_json = &config_json["Sides"];
        let side = |name: &str| sides_json[name].as_bool().unwrap_or(true);

        let config = Self {
            cells,
            h: required_f64(&config_json["CellSize"], "CellSize")?,
            x_bounds,
            y_bounds,
            vp_max: required_f64(&config_json["VpMax"], "VpMax")?,
            sides: MpmlSides {
                x_min: side("XMin"),
                x_max: side("XMax"),
                y_min: side("YMin"),
                y_max: side("YMax"),
            },
            pxy: config_json["Pxy"].as_f64().unwrap_or(DEFAULT_PXY),
            pyx: config_json["Pyx"].as_f64().unwrap_or(DEFAULT_PYX),
            reflection: config_json["Reflection"].as_f64().unwrap_or(DEFAULT_REFLECTION),
        };

        config.validate()?;
        Ok(config)
    }

    /// Layer thickness in the x and y directions
    pub fn thickness(&self) -> [f64; 2] {
        [self.h * self.cells[0] as f64, self.h * self.cells[1] as f64]
    }

    /// Peak damping in the x and y directions: `3·vp_max·log10(1/R) / (2·T)`
    pub fn d0(&self) -> [f64; 2] {
        let strength = 3.0 * self.vp_max * (1.0 / self.reflection).log10() / 2.0;
        let [tx, ty] = self.thickness();
        [strength / tx, strength / ty]
    }

    /// Bounds of the undamped interior region: `[x_min, x_max, y_min, y_max]`
    pub fn inner_bounds(&self) -> [f64; 4] {
        let [tx, ty] = self.thickness();
        [
            self.x_bounds[0] + tx,
            self.x_bounds[1] - tx,
            self.y_bounds[0] + ty,
            self.y_bounds[1] - ty,
        ]
    }

    fn validate(&self) -> Result<(), MpmlError> {
        let [tx, ty] = self.thickness();
        if !(tx > 0.0 && ty > 0.0) {
            return Err(MpmlError::Thickness(tx, ty));
        }
        if !(self.reflection > 0.0 && self.reflection < 1.0) {
            return Err(MpmlError::Reflection(self.reflection));
        }
        Ok(())
    }

    /// Damping quantities at a single point
    ///
    /// ```text
    ///  y_max +----+----------+----+
    ///        | xy |    y+    | xy |
    ///        +----+----------+----+
    ///        |    |          |    |
    ///        | x- | interior | x+ |
    ///        |    |          |    |
    ///        +----+----------+----+
    ///        | xy |    y-    | xy |
    ///  y_min +----+----------+----+
    ///      x_min               x_max
    /// ```
    ///
    /// Side zones use a single quadratic profile and scale it by the coupling ratio for the cross-axis field.
    /// Corner zones combine both profiles. When the `y_max` layer is disabled, the two corners along `y_max`
    /// only use the x profile.
    pub fn damping_at(&self, point: Point) -> MpmlDamping {
        let [tx, ty] = self.thickness();
        let [d0_x, d0_y] = self.d0();
        let [in_x_min, in_x_max, in_y_min, in_y_max] = self.inner_bounds();
        let Point { x, y } = point;

        let x_profile = Profile {
            d0: d0_x,
            thickness: tx,
        };
        let y_profile = Profile {
            d0: d0_y,
            thickness: ty,
        };

        let x_lo = x <= in_x_min;
        let x_hi = x >= in_x_max;
        let y_lo = y <= in_y_min;
        let y_hi = y >= in_y_max;
        let x_mid = x >= in_x_min && x <= in_x_max;
        let y_mid = y >= in_y_min && y <= in_y_max;

        let px_lo = || x_profile.at(in_x_min - x, -1.0);
        let px_hi = || x_profile.at(x - in_x_max, 1.0);
        let py_lo = || y_profile.at(in_y_min - y, -1.0);
        let py_hi = || y_profile.at(y - in_y_max, 1.0);

        let sides = self.sides;
        if x_lo && y_mid && sides.x_min {
            self.x_side(px_lo())
        } else if x_hi && y_mid && sides.x_max {
            self.x_side(px_hi())
        } else if y_lo && x_mid && sides.y_min {
            self.y_side(py_lo())
        } else if y_hi && x_mid && sides.y_max {
            self.y_side(py_hi())
        } else if x_lo && y_lo && (sides.x_min || sides.y_min) {
            self.corner(px_lo(), py_lo())
        } else if x_lo && y_hi && (sides.x_min || sides.y_max) {
            if sides.y_max {
                self.corner(px_lo(), py_hi())
            } else {
                self.x_side(px_lo())
            }
        } else if x_hi && y_lo && (sides.x_max || sides.y_min) {
            self.corner(px_hi(), py_lo())
        } else if x_hi && y_hi && (sides.x_max || sides.y_max) {
            if sides.y_max {
                self.corner(px_hi(), py_hi())
            } else {
                self.x_side(px_hi())
            }
        } else {
            MpmlDamping::default()
        }
    }

    fn x_side(&self, (value, slope): (f64, f64)) -> MpmlDamping {
        MpmlDamping {
            dx: value,
            dy: self.pyx * value,
            dxx: slope,
            dyy: 0.0,
            dxx_pyx: self.pyx * slope,
            dyy_pxy: 0.0,
        }
    }

    fn y_side(&self, (value, slope): (f64, f64)) -> MpmlDamping {
        MpmlDamping {
            dx: self.pxy * value,
            dy: value,
            dxx: 0.0,
            dyy: slope,
            dxx_pyx: 0.0,
            dyy_pxy: self.pxy * slope,
        }
    }

    fn corner(&self, (x_value, x_slope): (f64, f64), (y_value, y_slope): (f64, f64)) -> MpmlDamping {
        MpmlDamping {
            dx: x_value + self.pxy * y_value,
            dy: y_value + self.pyx * x_value,
            dxx: x_slope,
            dyy: y_slope,
            dxx_pyx: self.pyx * x_slope,
            dyy_pxy: self.pxy * y_slope,
        }
    }
}

/// The six per-node damping fields, each usable as an assembly weight
#[derive(Debug, Clone, PartialEq)]
pub struct MpmlFields {
    pub dx: NodeField,
    pub dy: NodeField,
    pub dxx: NodeField,
    pub dyy: NodeField,
    pub dxx_pyx: NodeField,
    pub dyy_pxy: NodeField,
}

impl MpmlFields {
    /// Evaluate the damping quantities at every Node in a table
    pub fn new(config: &MpmlConfig, nodes: &NodeTable) -> Result<Self, MpmlError> {
        config.validate()?;

        let n = nodes.len();
        let mut columns: [Vec<f64>; 6] = Default::default();
        columns.iter_mut().for_each(|c| c.reserve_exact(n));

        let mut num_damped = 0;
        for (_, point) in nodes.iter() {
            let d = config.damping_at(point);
            if d != MpmlDamping::default() {
                num_damped += 1;
            }

            for (column, value) in columns
                .iter_mut()
                .zip([d.dx, d.dy, d.dxx, d.dyy, d.dxx_pyx, d.dyy_pxy])
            {
                column.push(value);
            }
        }

        log::debug!(
            "MPML damping active on {} of {} Nodes (d0 = {:?})",
            num_damped,
            n,
            config.d0()
        );

        let [dx, dy, dxx, dyy, dxx_pyx, dyy_pxy] = columns.map(NodeField::new);
        Ok(Self {
            dx,
            dy,
            dxx,
            dyy,
            dxx_pyx,
            dyy_pxy,
        })
    }

    /// Evaluate the damping quantities at every Node of a [Mesh]
    pub fn over_mesh(config: &MpmlConfig, mesh: &Mesh) -> Result<Self, MpmlError> {
        Self::new(config, mesh.nodes())
    }
}

fn required_f64(value: &JsonValue, name: &str) -> Result<f64, MpmlError> {
    value
        .as_f64()
        .ok_or_else(|| MpmlError::Format(format!("missing or non-numeric \"{}\"", name)))
}

fn required_usize(value: &JsonValue, name: &str) -> Result<usize, MpmlError> {
    value
        .as_usize()
        .ok_or_else(|| MpmlError::Format(format!("missing or non-integer \"{}\"", name)))
}

/// Error type for absorbing layer configuration
#[derive(Debug, Error)]
pub enum MpmlError {
    #[error("Layer thickness must be positive in both directions (found {0}, {1}); Cannot compute MPML fields!")]
    Thickness(f64, f64),
    #[error("Reflection coefficient must be in (0, 1) (found {0}); Cannot compute MPML fields!")]
    Reflection(f64),
    #[error("Malformed MPML configuration: {0}")]
    Format(String),
    #[error("Unable to read MPML configuration: {0}")]
    Io(#[from] std::io::Error),
}
