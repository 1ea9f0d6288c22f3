//! Per-corner barycentric coordinates.

use nalgebra::Vector3;

use crate::error::Result;
use crate::mesh::{BrepMesh, MeshIndex, BARYCENTRIC};

/// Tag the corners of every face with barycentric coordinates.
///
/// The first three loops of each face get `(1, 0, 0)`, `(0, 1, 0)` and
/// `(0, 0, 1)` in winding order, written to the loop [`BARYCENTRIC`]
/// attribute. Further corners keep the zero vector. Renderers interpolate
/// these across a triangle to find the distance to its edges.
///
/// # Errors
/// [`MeshError::AttributeType`] if a loop `"barycentric"` attribute of
/// another type exists.
///
/// [`MeshError::AttributeType`]: crate::error::MeshError::AttributeType
pub fn generate_loop_barycentric<I: MeshIndex>(mesh: &mut BrepMesh<I>) -> Result<()> {
    let corners: Vec<_> = mesh
        .faces()
        .ids()
        .flat_map(|f| mesh.face_loops(f).take(3).enumerate())
        .collect();

    let (attribute, _) = mesh
        .loops_mut()
        .attributes_mut()
        .try_emplace(BARYCENTRIC, Vector3::<f64>::zeros())?;
    attribute.fill_with(Vector3::zeros());
    for (i, l) in corners {
        attribute[l] = Vector3::ith(i, 1.0);
    }
    Ok(())
}
