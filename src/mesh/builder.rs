//! Mesh construction utilities.
//!
//! Builds B-rep meshes from face-vertex lists, the layout used by most mesh
//! file formats and procedural generators, and exports them back.

use nalgebra::Point3;

use super::attribute::POSITION;
use super::brep::BrepMesh;
use super::index::{MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a B-rep mesh from vertex positions and polygon faces.
///
/// Positions are stored in the [`POSITION`] vertex attribute. Faces sharing a
/// vertex pair share the edge between them.
///
/// # Arguments
/// * `positions` - List of vertex positions
/// * `faces` - List of polygons, each as a list of vertex indices in winding order
///
/// # Errors
/// * [`MeshError::InvalidVertexIndex`] if a face references a missing vertex
/// * [`MeshError::DegenerateFace`] if a face has fewer than three vertices or
///   repeats a vertex on consecutive corners
/// * [`MeshError::InvalidParameter`] if the vertices or face corners do not
///   fit the index type `I`
///
/// # Example
/// ```
/// use brep::mesh::{build_from_polygons, BrepMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(1.0, 1.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(2.0, 0.5, 0.0),
/// ];
/// let faces = vec![vec![0, 1, 2, 3], vec![1, 4, 2]];
///
/// let mesh: BrepMesh = build_from_polygons(&positions, &faces).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.num_edges(), 6);
/// ```
pub fn build_from_polygons<I, F>(positions: &[Point3<f64>], faces: &[F]) -> Result<BrepMesh<I>>
where
    I: MeshIndex,
    F: AsRef<[usize]>,
{
    // Ids run up to I::MAX; I::INVALID is reserved.
    let capacity = I::MAX.to_usize().saturating_add(1);
    if positions.len() > capacity {
        return Err(MeshError::invalid_param(
            "positions",
            positions.len(),
            "more vertices than the index type can address",
        ));
    }
    // Every edge and face owns at least one corner, so corners bound all counts.
    let corners: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    if corners > capacity {
        return Err(MeshError::invalid_param(
            "faces",
            corners,
            "more face corners than the index type can address",
        ));
    }

    for (fi, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        if let Some(&vi) = face.iter().find(|&&vi| vi >= positions.len()) {
            return Err(MeshError::InvalidVertexIndex {
                face: fi,
                vertex: vi,
            });
        }
        let n = face.len();
        if n < 3 || (0..n).any(|i| face[i] == face[(i + 1) % n]) {
            return Err(MeshError::DegenerateFace { face: fi });
        }
    }

    let mut mesh = BrepMesh::with_capacity(positions.len(), faces.len());
    let vertex_ids: Vec<VertexId<I>> = positions.iter().map(|_| mesh.add_vertex()).collect();
    mesh.vertices_mut()
        .attributes_mut()
        .emplace(POSITION, Point3::<f64>::origin())?
        .as_mut_slice()
        .copy_from_slice(positions);

    let mut face_vertices = Vec::new();
    for (fi, face) in faces.iter().enumerate() {
        face_vertices.clear();
        face_vertices.extend(face.as_ref().iter().map(|&vi| vertex_ids[vi]));
        mesh.add_face(&face_vertices)
            .ok_or(MeshError::DegenerateFace { face: fi })?;
    }

    Ok(mesh)
}

/// Build a B-rep mesh from vertex positions and triangle faces.
///
/// Convenience form of [`build_from_polygons`].
///
/// # Example
/// ```
/// use brep::mesh::{build_from_triangles, BrepMesh};
/// use nalgebra::Point3;
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: BrepMesh = build_from_triangles(&positions, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    positions: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<BrepMesh<I>> {
    build_from_polygons(positions, faces)
}

/// Export a mesh to face-vertex format.
///
/// Returns the vertex positions and, for each face, its vertex indices in
/// winding order.
///
/// # Errors
/// [`MeshError::AttributeNotFound`] if the mesh has no [`POSITION`] attribute.
pub fn to_face_vertex<I: MeshIndex>(
    mesh: &BrepMesh<I>,
) -> Result<(Vec<Point3<f64>>, Vec<Vec<usize>>)> {
    let positions = mesh
        .vertices()
        .attributes()
        .get::<Point3<f64>>(POSITION)?
        .as_slice()
        .to_vec();

    let faces = mesh
        .faces()
        .ids()
        .map(|f| mesh.face_vertices(f).map(VertexId::index).collect())
        .collect();

    Ok((positions, faces))
}
