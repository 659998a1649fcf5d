/// Element orders, Element views, and the affine Reference-to-Real map
pub mod element;
/// Structured triangle grids of every supported order
pub mod grid;
/// The Node coordinate table and position lookup
pub mod node;
/// Structures to describe the 2D Real and Reference spaces
pub mod space;

use element::{AffineMap, Element, ElementOrder};
use node::NodeTable;
use space::Point;

use json::JsonValue;
use std::fs::read_to_string;
use thiserror::Error;

#[cfg(feature = "json_export")]
use json::object;
#[cfg(feature = "json_export")]
use std::{fs::File, io::BufWriter};

/// A triangulated 2D domain: Node coordinates plus Element connectivity.
///
/// Connectivity is stored flat and 0-based: the Node IDs of Element `e` are
/// `connectivity[e * order .. (e + 1) * order]`.
#[derive(Debug, Clone)]
pub struct Mesh {
    order: ElementOrder,
    nodes: NodeTable,
    connectivity: Vec<usize>,
}

impl Mesh {
    /// Construct a Mesh from 0-based connectivity, validating every Node ID
    pub fn new(
        order: ElementOrder,
        nodes: NodeTable,
        connectivity: Vec<usize>,
    ) -> Result<Self, MeshError> {
        if connectivity.len() % order.num_nodes() != 0 {
            return Err(MeshError::ConnectivityLength {
                expected: (connectivity.len() / order.num_nodes() + 1) * order.num_nodes(),
                found: connectivity.len(),
            });
        }

        if let Some(position) = connectivity.iter().position(|id| *id >= nodes.len()) {
            return Err(MeshError::NodeIdOutOfRange {
                elem_id: position / order.num_nodes(),
                node_id: connectivity[position],
                num_nodes: nodes.len(),
            });
        }

        Ok(Self {
            order,
            nodes,
            connectivity,
        })
    }

    /// Construct a Mesh from the raw arrays produced by an external mesh generator.
    ///
    /// * `connectivity` holds 1-based Node IDs and must be `element_count * element_order` long
    /// * `xs` and `ys` are indexed by 0-based Node ID and must both be `node_count` long
    pub fn from_raw_parts(
        node_count: usize,
        element_count: usize,
        element_order: usize,
        connectivity: &[usize],
        xs: &[f64],
        ys: &[f64],
    ) -> Result<Self, MeshError> {
        let order = ElementOrder::try_from(element_order)?;

        let expected = element_count.checked_mul(order.num_nodes());
        if expected != Some(connectivity.len()) {
            return Err(MeshError::ConnectivityLength {
                expected: expected.unwrap_or(usize::MAX),
                found: connectivity.len(),
            });
        }
        if xs.len() != node_count || ys.len() != node_count {
            return Err(MeshError::NodeCount {
                expected: node_count,
                found: [xs.len(), ys.len()],
            });
        }

        let zero_based = connectivity
            .iter()
            .enumerate()
            .map(|(position, id)| {
                id.checked_sub(1).ok_or(MeshError::NodeIdOutOfRange {
                    elem_id: position / order.num_nodes(),
                    node_id: 0,
                    num_nodes: node_count,
                })
            })
            .collect::<Result<Vec<usize>, MeshError>>()?;

        Self::new(order, NodeTable::new(xs.to_vec(), ys.to_vec())?, zero_based)
    }

    /// Construct a Mesh from a JSON file with the following format
    ///
    /// Element Node IDs are 1-based and listed corners first. `"Order"` may be omitted,
    /// in which case it is taken from the length of the first Element.
    ///
    /// The following describes two 3-node Elements covering the unit square:
    /// ```text
    ///     4-------3
    ///     | \   1 |
    ///     |   \   |
    ///     | 0   \ |
    ///     1-------2
    /// ```
    ///
    /// mesh.json
    /// ```JSON
    /// {
    ///     "Order": 3,
    ///     "Elements": [
    ///         [1, 2, 4],
    ///         [3, 4, 2]
    ///     ],
    ///     "Nodes": [
    ///         [0.0, 0.0],
    ///         [1.0, 0.0],
    ///         [1.0, 1.0],
    ///         [0.0, 1.0]
    ///     ]
    /// }
    /// ```
    pub fn from_file(path: impl AsRef<str>) -> Result<Self, MeshError> {
        let mesh_file_contents = read_to_string(path.as_ref())?;
        let mesh_file_json = json::parse(&mesh_file_contents)
            .map_err(|err| MeshError::Format(format!("invalid JSON ({})", err)))?;

        Self::from_json(&mesh_file_json)
    }

    /// Construct a Mesh from a parsed JSON value (see [Mesh::from_file] for the format)
    pub fn from_json(mesh_json: &JsonValue) -> Result<Self, MeshError> {
        let element_node_ids = parse_element_information(mesh_json)?;
        let points = parse_node_information(mesh_json)?;

        let order_json = &mesh_json["Order"];
        let order = match order_json.as_usize() {
            Some(n) => ElementOrder::try_from(n)?,
            None if !order_json.is_null() => {
                return Err(MeshError::Format(format!(
                    "\"Order\" must be a Node count (found {})",
                    order_json.dump()
                )))
            }
            None => match element_node_ids.first() {
                Some(ids) => ElementOrder::try_from(ids.len())?,
                None => {
                    return Err(MeshError::Format(String::from(
                        "no \"Order\" and no \"Elements\" to infer it from",
                    )))
                }
            },
        };

        let mut connectivity = Vec::with_capacity(element_node_ids.len() * order.num_nodes());
        for (elem_id, node_ids) in element_node_ids.iter().enumerate() {
            if node_ids.len() != order.num_nodes() {
                return Err(MeshError::Format(format!(
                    "Element {} has {} Nodes; expected {}",
                    elem_id,
                    node_ids.len(),
                    order.num_nodes()
                )));
            }
            connectivity.extend_from_slice(node_ids);
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().map(|p| (p.x, p.y)).unzip();

        Self::from_raw_parts(
            points.len(),
            element_node_ids.len(),
            order.num_nodes(),
            &connectivity,
            &xs,
            &ys,
        )
    }

    /// Describe this Mesh as a JSON object (the same format read by [Mesh::from_file])
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        object! {
            "Order": self.order.num_nodes(),
            "Elements": JsonValue::from(
                self.connectivity_one_based()
                    .chunks_exact(self.order.num_nodes())
                    .map(|ids| JsonValue::from(ids.to_vec()))
                    .collect::<Vec<_>>()
            ),
            "Nodes": JsonValue::from(
                self.nodes.iter().map(|(_, point)| JsonValue::from(point)).collect::<Vec<_>>()
            ),
        }
    }

    /// Print the mesh to a JSON file specified by path.
    #[cfg(feature = "json_export")]
    pub fn export_to_json(&self, path: impl AsRef<str>) -> std::io::Result<()> {
        let f = File::create(path.as_ref())?;
        let mut w = BufWriter::new(&f);

        self.to_json().write_pretty(&mut w, 4)
    }

    // ----------------------------------------------------------------------------------------------------
    // General Data Retrieval
    // ----------------------------------------------------------------------------------------------------

    pub fn order(&self) -> ElementOrder {
        self.order
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_elements(&self) -> usize {
        self.connectivity.len() / self.order.num_nodes()
    }

    /// Flat, 0-based connectivity
    pub fn connectivity(&self) -> &[usize] {
        &self.connectivity
    }

    /// Flat connectivity with 1-based Node IDs (the external convention)
    pub fn connectivity_one_based(&self) -> Vec<usize> {
        self.connectivity.iter().map(|id| id + 1).collect()
    }

    /// Get an [Element] by ID
    pub fn element(&self, elem_id: usize) -> Option<Element<'_>> {
        let n = self.order.num_nodes();
        let start = elem_id.checked_mul(n)?;
        self.connectivity
            .get(start..start.checked_add(n)?)
            .map(|node_ids| Element {
                id: elem_id,
                node_ids,
            })
    }

    /// Iterate over all [Element]s in the Mesh
    pub fn elements(&self) -> impl Iterator<Item = Element<'_>> + '_ {
        self.connectivity
            .chunks_exact(self.order.num_nodes())
            .enumerate()
            .map(|(id, node_ids)| Element { id, node_ids })
    }

    /// Get the three corner [Point]s of an [Element]
    pub fn corner_points(&self, elem: &Element) -> [Point; 3] {
        elem.corner_ids().map(|node_id| self.nodes.point(node_id))
    }

    /// The Reference-to-Real map of an [Element], or `None` if it is degenerate
    pub fn affine_map(&self, elem: &Element) -> Option<AffineMap> {
        AffineMap::from_corners(self.corner_points(elem))
    }
}

fn parse_element_information(mesh_json: &JsonValue) -> Result<Vec<Vec<usize>>, MeshError> {
    if !mesh_json["Elements"].is_array() {
        return Err(MeshError::Format(String::from(
            "\"Elements\" must be an array",
        )));
    }

    mesh_json["Elements"]
        .members()
        .enumerate()
        .map(|(elem_id, element)| {
            element
                .members()
                .map(|id| id.as_usize())
                .collect::<Option<Vec<usize>>>()
                .filter(|ids| !ids.is_empty())
                .ok_or_else(|| {
                    MeshError::Format(format!(
                        "Element {} must be a non-empty array of 1-based Node IDs",
                        elem_id
                    ))
                })
        })
        .collect()
}

fn parse_node_information(mesh_json: &JsonValue) -> Result<Vec<Point>, MeshError> {
    if !mesh_json["Nodes"].is_array() {
        return Err(MeshError::Format(String::from("\"Nodes\" must be an array")));
    }

    mesh_json["Nodes"]
        .members()
        .enumerate()
        .map(|(node_id, coords)| match (coords[0].as_f64(), coords[1].as_f64()) {
            (Some(x), Some(y)) if coords.len() == 2 => Ok(Point::new(x, y)),
            _ => Err(MeshError::Format(format!(
                "Node {} must be an [x, y] pair",
                node_id
            ))),
        })
        .collect()
}

/// Error type for Mesh construction
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("Elements with {0} Nodes are not supported (expected 3, 6 or 10); Cannot construct Mesh!")]
    UnsupportedOrder(usize),
    #[error("Connectivity has {found} entries (expected {expected}); Cannot construct Mesh!")]
    ConnectivityLength { expected: usize, found: usize },
    #[error("Element {elem_id} references Node {node_id}, which is outside the Node table (size {num_nodes}); Cannot construct Mesh!")]
    NodeIdOutOfRange {
        elem_id: usize,
        node_id: usize,
        num_nodes: usize,
    },
    #[error("Coordinate arrays have different lengths (x: {x_len}, y: {y_len}); Cannot construct Mesh!")]
    CoordinateLength { x_len: usize, y_len: usize },
    #[error("Expected {expected} Nodes but received {found:?} coordinates; Cannot construct Mesh!")]
    NodeCount { expected: usize, found: [usize; 2] },
    #[error("Grids need at least one cell along each direction and a positive extent; Cannot construct Mesh!")]
    EmptyGrid,
    #[error("Malformed Mesh description: {0}; Cannot construct Mesh!")]
    Format(String),
    #[error("Unable to read Mesh file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_parts_are_converted_to_zero_based() {
        let mesh = Mesh::from_raw_parts(
            4,
            2,
            3,
            &[1, 2, 4, 3, 4, 2],
            &[0.0, 1.0, 1.0, 0.0],
            &[0.0, 0.0, 1.0, 1.0],
        )
        .unwrap();

        assert_eq!(mesh.order(), ElementOrder::T3);
        assert_eq!(mesh.num_elements(), 2);
        assert_eq!(mesh.connectivity(), &[0, 1, 3, 2, 3, 1]);
        assert_eq!(mesh.connectivity_one_based(), vec![1, 2, 4, 3, 4, 2]);
        assert_eq!(mesh.element(1).unwrap().node_ids, &[2, 3, 1]);
        assert!(mesh.element(2).is_none());
    }

    #[test]
    fn raw_parts_validation() {
        let xs = [0.0, 1.0, 0.0];
        let ys = [0.0, 0.0, 1.0];

        assert!(matches!(
            Mesh::from_raw_parts(3, 1, 4, &[1, 2, 3, 1], &xs, &ys),
            Err(MeshError::UnsupportedOrder(4))
        ));
        assert!(matches!(
            Mesh::from_raw_parts(3, 2, 3, &[1, 2, 3], &xs, &ys),
            Err(MeshError::ConnectivityLength { .. })
        ));
        assert!(matches!(
            Mesh::from_raw_parts(3, 1, 3, &[0, 1, 2], &xs, &ys),
            Err(MeshError::NodeIdOutOfRange { node_id: 0, .. })
        ));
        assert!(matches!(
            Mesh::from_raw_parts(3, 1, 3, &[1, 2, 4], &xs, &ys),
            Err(MeshError::NodeIdOutOfRange { node_id: 3, .. })
        ));
        assert!(matches!(
            Mesh::from_raw_parts(4, 1, 3, &[1, 2, 3], &xs, &ys),
            Err(MeshError::NodeCount { .. })
        ));
        assert!(matches!(
            Mesh::from_raw_parts(3, usize::MAX / 2, 3, &[1, 2, 3], &xs, &ys),
            Err(MeshError::ConnectivityLength { expected: usize::MAX, found: 3 })
        ));
    }

    #[test]
    fn element_lookup_out_of_range() {
        let mesh = Mesh::grid(ElementOrder::T6, 1, 1, [0.0, 1.0], [0.0, 1.0]).unwrap();

        assert!(mesh.element(1).is_some());
        assert!(mesh.element(2).is_none());
        assert!(mesh.element(usize::MAX / 2).is_none());
        assert!(mesh.element(usize::MAX).is_none());
    }

    #[test]
    fn corner_points_ignore_higher_order_nodes() {
        let mesh = Mesh::grid(ElementOrder::T10, 1, 1, [0.0, 3.0], [0.0, 3.0]).unwrap();
        let elem = mesh.element(0).unwrap();
        let corners = mesh.corner_points(&elem);

        assert_eq!(corners[0], Point::new(0.0, 0.0));
        assert_eq!(corners[1], Point::new(3.0, 0.0));
        assert_eq!(corners[2], Point::new(0.0, 3.0));
        assert!((mesh.affine_map(&elem).unwrap().area() - 4.5).abs() < 1e-14);
    }

    #[test]
    fn mesh_from_file() {
        let mesh = Mesh::from_file("./test_input/t3_unit_square.json").unwrap();

        assert_eq!(mesh.order(), ElementOrder::T3);
        assert_eq!(mesh.num_nodes(), 4);
        assert_eq!(mesh.num_elements(), 2);
        assert_eq!(mesh.connectivity(), &[0, 1, 3, 2, 3, 1]);
        assert_eq!(mesh.nodes().point(2), Point::new(1.0, 1.0));
    }

    #[test]
    fn mesh_from_file_infers_order() {
        let mesh = Mesh::from_file("./test_input/t6_two_elements.json").unwrap();

        assert_eq!(mesh.order(), ElementOrder::T6);
        assert_eq!(mesh.num_elements(), 2);
        assert_eq!(mesh.num_nodes(), 9);
    }

    #[test]
    fn malformed_json() {
        let bad_node = json::parse(r#"{"Elements": [[1, 2, 3]], "Nodes": [[0.0, 0.0], [1.0], [0.0, 1.0]]}"#)
            .unwrap();
        assert!(matches!(Mesh::from_json(&bad_node), Err(MeshError::Format(_))));

        let ragged = json::parse(
            r#"{"Order": 3, "Elements": [[1, 2, 3], [1, 2]], "Nodes": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]}"#,
        )
        .unwrap();
        assert!(matches!(Mesh::from_json(&ragged), Err(MeshError::Format(_))));

        let named_order = json::parse(
            r#"{"Order": "six", "Elements": [[1, 2, 3]], "Nodes": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]}"#,
        )
        .unwrap();
        assert!(matches!(Mesh::from_json(&named_order), Err(MeshError::Format(_))));

        let missing = json::parse(r#"{"Nodes": []}"#).unwrap();
        assert!(Mesh::from_json(&missing).is_err());

        assert!(matches!(
            Mesh::from_file("./test_input/does_not_exist.json"),
            Err(MeshError::Io(_))
        ));
    }

    #[test]
    #[cfg(feature = "json_export")]
    fn json_export_matches_input_format() {
        let mesh = Mesh::grid(ElementOrder::T6, 2, 1, [0.0, 2.0], [0.0, 1.0]).unwrap();
        let reread = Mesh::from_json(&mesh.to_json()).unwrap();

        assert_eq!(reread.order(), mesh.order());
        assert_eq!(reread.connectivity(), mesh.connectivity());
        assert_eq!(reread.num_nodes(), mesh.num_nodes());
        for ((_, a), (_, b)) in reread.nodes().iter().zip(mesh.nodes().iter()) {
            assert!((a.x - b.x).abs() < 1e-12 && (a.y - b.y).abs() < 1e-12);
        }
    }
}
