use crate::basis::{ShapeFn, ShapeSample, T10ShapeFn, T3ShapeFn, T6ShapeFn};
use crate::domain::{
    fields::NodeField,
    mesh::{
        element::{AffineMap, Element, ElementOrder},
        Mesh, MeshError,
    },
};
use crate::integration::{Operator, QuadratureRule, RealShape, DUNAVANT_12};
use crate::linalg::CooMatrix;

use nalgebra::DMatrix;
use rayon::prelude::*;
use thiserror::Error;

/// Assemble an [Operator] over every Element of a [Mesh] into a new [CooMatrix]
///
/// Element `e` fills entries `e·n² .. (e + 1)·n²` (with `n` Nodes per Element); local pair `(i, j)` lands at
/// offset `i·n + j` with row and column set to the 0-based global IDs of local Nodes `i` and `j`.
///
/// If `weights` are given, each contribution is scaled by the weight of its row Node.
///
/// # Returns
/// * An `Err` if any Element is degenerate (zero area); no entries are computed in that case
/// * An `Err` if the weight field does not have one value per Node
/// * The COO triplets, otherwise
pub fn assemble(
    mesh: &Mesh,
    operator: Operator,
    weights: Option<&NodeField>,
) -> Result<CooMatrix, AssemblyError> {
    let mut coo = CooMatrix::zeroed(mesh.num_elements() * mesh.order().block_len());
    assemble_into(mesh, operator, weights, &mut coo)?;
    Ok(coo)
}

/// Assemble an [Operator] into caller-provided storage (see [assemble])
///
/// `output` must already hold exactly `num_elements · n²` entries. It is left untouched if an error is returned.
pub fn assemble_into(
    mesh: &Mesh,
    operator: Operator,
    weights: Option<&NodeField>,
    output: &mut CooMatrix,
) -> Result<(), AssemblyError> {
    let maps = prepare(mesh, operator, weights, output)?;

    match mesh.order() {
        ElementOrder::T3 => fill::<T3ShapeFn>(mesh, operator, weights, &maps, output),
        ElementOrder::T6 => fill::<T6ShapeFn>(mesh, operator, weights, &maps, output),
        ElementOrder::T10 => fill::<T10ShapeFn>(mesh, operator, weights, &maps, output),
    }

    Ok(())
}

/// Assemble an [Operator] with the Elements distributed over the Rayon Global Threadpool
///
/// Produces exactly the same entries as [assemble]. Each Element only writes into its own block of the output.
pub fn par_assemble(
    mesh: &Mesh,
    operator: Operator,
    weights: Option<&NodeField>,
) -> Result<CooMatrix, AssemblyError> {
    let mut output = CooMatrix::zeroed(mesh.num_elements() * mesh.order().block_len());
    let maps = prepare(mesh, operator, weights, &output)?;

    match mesh.order() {
        ElementOrder::T3 => par_fill::<T3ShapeFn>(mesh, operator, weights, &maps, &mut output),
        ElementOrder::T6 => par_fill::<T6ShapeFn>(mesh, operator, weights, &maps, &mut output),
        ElementOrder::T10 => par_fill::<T10ShapeFn>(mesh, operator, weights, &maps, &mut output),
    }

    Ok(output)
}

/// Assemble from the flat arrays of an external mesh generator
///
/// * `connectivity`: 1-based Node IDs, `element_count · element_order` long
/// * `xs`, `ys`: Node coordinates indexed by 0-based Node ID
/// * `selector`: the integer code of an [Operator] (`0..=6`)
/// * `weights`: optional per-node weight, `node_count` long
///
/// The returned row and column IDs are 0-based.
#[allow(clippy::too_many_arguments)]
pub fn assemble_raw(
    node_count: usize,
    element_count: usize,
    element_order: usize,
    connectivity: &[usize],
    xs: &[f64],
    ys: &[f64],
    selector: i32,
    weights: Option<&[f64]>,
) -> Result<CooMatrix, AssemblyError> {
    let operator = Operator::try_from(selector)?;
    let mesh = Mesh::from_raw_parts(node_count, element_count, element_order, connectivity, xs, ys)?;
    let weights = weights.map(|w| NodeField::new(w.to_vec()));

    assemble(&mesh, operator, weights.as_ref())
}

/// Compute the dense local matrix of a single Element
///
/// Entry `(i, j)` matches the value [assemble] stores for local pair `(i, j)` of that Element.
pub fn element_matrix(
    mesh: &Mesh,
    elem_id: usize,
    operator: Operator,
    weights: Option<&NodeField>,
) -> Result<DMatrix<f64>, AssemblyError> {
    let elem = mesh
        .element(elem_id)
        .ok_or(AssemblyError::ElementIdOutOfRange {
            elem_id,
            num_elements: mesh.num_elements(),
        })?;
    check_weights(mesh, weights)?;
    let map = mesh
        .affine_map(&elem)
        .ok_or(AssemblyError::DegenerateElement { elem_id })?;

    let n = mesh.order().num_nodes();
    let mut rows = vec![0; n * n];
    let mut cols = vec![0; n * n];
    let mut values = vec![0.0; n * n];

    let samples = match mesh.order() {
        ElementOrder::T3 => ReferenceSamples::new::<T3ShapeFn>(&DUNAVANT_12),
        ElementOrder::T6 => ReferenceSamples::new::<T6ShapeFn>(&DUNAVANT_12),
        ElementOrder::T10 => ReferenceSamples::new::<T10ShapeFn>(&DUNAVANT_12),
    };
    samples.fill_block(
        operator,
        &elem,
        &map,
        weights,
        ElementBlock {
            rows: &mut rows,
            cols: &mut cols,
            values: &mut values,
        },
    );

    Ok(DMatrix::from_row_slice(n, n, &values))
}

// ----------------------------------------------------------------------------------------------------
// Driver internals
// ----------------------------------------------------------------------------------------------------

/// Check every precondition and compute the map of every Element, before anything is written
fn prepare(
    mesh: &Mesh,
    operator: Operator,
    weights: Option<&NodeField>,
    output: &CooMatrix,
) -> Result<Vec<AffineMap>, AssemblyError> {
    let expected = mesh.num_elements() * mesh.order().block_len();
    let found = [output.rows.len(), output.cols.len(), output.values.len()];
    if let Some(bad_len) = found.iter().find(|len| **len != expected) {
        return Err(AssemblyError::OutputLength {
            expected,
            found: *bad_len,
        });
    }
    check_weights(mesh, weights)?;

    log::debug!(
        "Assembling '{}' over {} {} Elements ({} Nodes, {} entries{})",
        operator,
        mesh.num_elements(),
        mesh.order(),
        mesh.num_nodes(),
        expected,
        if weights.is_some() { ", weighted" } else { "" }
    );

    mesh.elements()
        .map(|elem| {
            mesh.affine_map(&elem).ok_or_else(|| {
                log::error!(
                    "Element {} has zero area (corners: {:?})",
                    elem.id,
                    mesh.corner_points(&elem)
                );
                AssemblyError::DegenerateElement { elem_id: elem.id }
            })
        })
        .collect()
}

fn check_weights(mesh: &Mesh, weights: Option<&NodeField>) -> Result<(), AssemblyError> {
    match weights {
        Some(field) if field.len() != mesh.num_nodes() => Err(AssemblyError::FieldLength {
            expected: mesh.num_nodes(),
            found: field.len(),
        }),
        _ => Ok(()),
    }
}

fn fill<SF: ShapeFn>(
    mesh: &Mesh,
    operator: Operator,
    weights: Option<&NodeField>,
    maps: &[AffineMap],
    output: &mut CooMatrix,
) {
    let samples = ReferenceSamples::new::<SF>(&DUNAVANT_12);
    let block_len = SF::ORDER.block_len();
    let CooMatrix { rows, cols, values } = output;

    for (((elem, map), rows), (cols, values)) in mesh
        .elements()
        .zip(maps.iter())
        .zip(rows.chunks_exact_mut(block_len))
        .zip(cols.chunks_exact_mut(block_len).zip(values.chunks_exact_mut(block_len)))
    {
        samples.fill_block(
            operator,
            &elem,
            map,
            weights,
            ElementBlock { rows, cols, values },
        );
    }
}

fn par_fill<SF: ShapeFn>(
    mesh: &Mesh,
    operator: Operator,
    weights: Option<&NodeField>,
    maps: &[AffineMap],
    output: &mut CooMatrix,
) {
    let samples = ReferenceSamples::new::<SF>(&DUNAVANT_12);
    let block_len = SF::ORDER.block_len();
    let CooMatrix { rows, cols, values } = output;

    rows.par_chunks_exact_mut(block_len)
        .zip(cols.par_chunks_exact_mut(block_len))
        .zip(values.par_chunks_exact_mut(block_len))
        .enumerate()
        .for_each(|(elem_id, ((rows, cols), values))| {
            // the number of blocks always matches the number of Elements
            if let Some(elem) = mesh.element(elem_id) {
                samples.fill_block(
                    operator,
                    &elem,
                    &maps[elem_id],
                    weights,
                    ElementBlock { rows, cols, values },
                );
            }
        });
}

/// One Element's disjoint share of the output
struct ElementBlock<'o> {
    rows: &'o mut [usize],
    cols: &'o mut [usize],
    values: &'o mut [f64],
}

/// Shape functions sampled once at every quadrature point of the Reference triangle.
///
/// These are identical for every Element; only the push to Real space differs.
struct ReferenceSamples {
    points: Vec<(f64, ShapeSample)>,
}

impl ReferenceSamples {
    fn new<SF: ShapeFn>(rule: &QuadratureRule) -> Self {
        Self {
            points: rule
                .iter()
                .map(|qp| (qp.weight, SF::sample(qp.r, qp.s)))
                .collect(),
        }
    }

    fn fill_block(
        &self,
        operator: Operator,
        elem: &Element,
        map: &AffineMap,
        weights: Option<&NodeField>,
        block: ElementBlock,
    ) {
        let n = elem.node_ids.len();
        let ElementBlock { rows, cols, values } = block;

        for i in 0..n {
            for j in 0..n {
                rows[i * n + j] = elem.node_ids[i];
                cols[i * n + j] = elem.node_ids[j];
            }
        }
        values.fill(0.0);

        // |det J| converts Reference area (weights sum to 1/2) into Real area
        let abs_det = map.det().abs();

        for (weight, sample) in self.points.iter() {
            let shape = RealShape::from_sample(sample, map);
            let scale = abs_det * weight;

            for i in 0..n {
                let p = shape.node(i);
                let row_scale = match weights {
                    Some(field) => scale * field[elem.node_ids[i]],
                    None => scale,
                };

                for j in 0..n {
                    values[i * n + j] += row_scale * operator.integrand(&p, &shape.node(j));
                }
            }
        }

        log::trace!(
            "Element {}: area {:.6e}, block trace {:.6e}",
            elem.id,
            map.area(),
            (0..n).map(|i| values[i * n + i]).sum::<f64>()
        );
    }
}

/// Error type for operator assembly
#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("Element {elem_id} is degenerate (zero area); Cannot assemble operator!")]
    DegenerateElement { elem_id: usize },
    #[error("Invalid operator selector '{0}' (expected 0-6 or one of full, dxdx, dydy, dxdy, dydx, val_dx, val_dy); Cannot assemble operator!")]
    InvalidOperator(String),
    #[error("Output storage has {found} entries (expected {expected}); Cannot assemble operator!")]
    OutputLength { expected: usize, found: usize },
    #[error("Weight field has {found} values (expected one per Node: {expected}); Cannot assemble operator!")]
    FieldLength { expected: usize, found: usize },
    #[error("Element {elem_id} does not exist (Mesh has {num_elements} Elements)")]
    ElementIdOutOfRange { elem_id: usize, num_elements: usize },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}
