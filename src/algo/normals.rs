//! Face and vertex normal generation.
//!
//! Normals are written to the [`NORMAL`] attribute of the face and vertex
//! containers as `Vector3<f64>`. Both operations can be rerun after the
//! geometry changes; they overwrite the previous values.
//!
//! # Example
//!
//! ```
//! use brep::prelude::*;
//! use brep::algo::normals::generate_vertex_normals;
//! use nalgebra::{Point3, Vector3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mut mesh: BrepMesh = build_from_triangles(&positions, &[[0, 1, 2]]).unwrap();
//!
//! generate_vertex_normals(&mut mesh).unwrap();
//!
//! let normals = mesh.vertices().attributes().get::<Vector3<f64>>(NORMAL).unwrap();
//! assert!((normals[VertexId::<u32>::new(0)] - Vector3::z()).norm() < 1e-12);
//! ```

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::Result;
use crate::mesh::{BrepMesh, FaceId, MeshIndex, VertexId, NORMAL, POSITION};

/// Element count above which normals are computed in parallel.
const PARALLEL_THRESHOLD: usize = 4096;

/// Compute the unit normal of every face into the face [`NORMAL`] attribute.
///
/// The normal is `normalize(cross(b - a, c - a))` over the positions of the
/// first three corners, so faces with more corners are assumed planar. A
/// face whose first three corners are collinear gets the zero vector.
///
/// # Errors
/// * [`MeshError::AttributeNotFound`] if the mesh has no vertex positions
/// * [`MeshError::AttributeType`] if a face `"normal"` attribute of another
///   type exists
///
/// [`MeshError::AttributeNotFound`]: crate::error::MeshError::AttributeNotFound
/// [`MeshError::AttributeType`]: crate::error::MeshError::AttributeType
pub fn generate_face_normals<I: MeshIndex>(mesh: &mut BrepMesh<I>) -> Result<()> {
    let normals = {
        let positions = mesh
            .vertices()
            .attributes()
            .get::<Point3<f64>>(POSITION)?
            .as_slice();
        let mesh = &*mesh;

        let face_normal = |i: usize| {
            let mut corners = mesh
                .face_vertices(FaceId::new(i))
                .map(|v| positions[v.index()]);
            match (corners.next(), corners.next(), corners.next()) {
                (Some(a), Some(b), Some(c)) => triangle_normal(&a, &b, &c),
                _ => Vector3::zeros(),
            }
        };

        let n = mesh.num_faces();
        if n > PARALLEL_THRESHOLD {
            (0..n).into_par_iter().map(face_normal).collect::<Vec<_>>()
        } else {
            (0..n).map(face_normal).collect::<Vec<_>>()
        }
    };

    let (attribute, _) = mesh
        .faces_mut()
        .attributes_mut()
        .try_emplace(NORMAL, Vector3::<f64>::zeros())?;
    attribute.as_mut_slice().copy_from_slice(&normals);
    Ok(())
}

/// Compute angle-weighted unit normals of every vertex into the vertex
/// [`NORMAL`] attribute.
///
/// Each face corner at a vertex contributes its face normal scaled by the
/// corner's interior angle. Face normals are generated first if the face
/// `"normal"` attribute is missing; an existing one is used as is. Vertices
/// without faces get the zero vector.
///
/// # Errors
/// Same as [`generate_face_normals`].
pub fn generate_vertex_normals<I: MeshIndex>(mesh: &mut BrepMesh<I>) -> Result<()> {
    if !mesh.faces().attributes().contains(NORMAL) {
        generate_face_normals(mesh)?;
    }

    let normals = {
        let positions = mesh
            .vertices()
            .attributes()
            .get::<Point3<f64>>(POSITION)?
            .as_slice();
        let face_normals = mesh
            .faces()
            .attributes()
            .get::<Vector3<f64>>(NORMAL)?
            .as_slice();
        let mesh = &*mesh;

        let vertex_normal = |i: usize| {
            let v = VertexId::new(i);
            let p = positions[i];
            let mut sum = Vector3::zeros();

            for e in mesh.vertex_edges(v) {
                for l in mesh.edge_loops(e) {
                    let corner = &mesh.loops()[l];
                    if corner.vertex() != v {
                        continue;
                    }
                    let previous = mesh.loops()[corner.face_previous()].vertex();
                    let next = mesh.loop_next_vertex(l);
                    let angle = corner_angle(
                        &p,
                        &positions[previous.index()],
                        &positions[next.index()],
                    );
                    sum += face_normals[corner.face().index()] * angle;
                }
            }

            sum.try_normalize(0.0).unwrap_or_else(Vector3::zeros)
        };

        let n = mesh.num_vertices();
        if n > PARALLEL_THRESHOLD {
            (0..n)
                .into_par_iter()
                .map(vertex_normal)
                .collect::<Vec<_>>()
        } else {
            (0..n).map(vertex_normal).collect::<Vec<_>>()
        }
    };

    let (attribute, _) = mesh
        .vertices_mut()
        .attributes_mut()
        .try_emplace(NORMAL, Vector3::<f64>::zeros())?;
    attribute.as_mut_slice().copy_from_slice(&normals);
    Ok(())
}

/// Unit normal of a triangle, or zero if it is degenerate.
pub fn triangle_normal(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Vector3<f64> {
    (b - a)
        .cross(&(c - a))
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}

/// Interior angle at `p` between the directions to `u` and `w`.
///
/// Zero if either neighbour coincides with `p`.
fn corner_angle(p: &Point3<f64>, u: &Point3<f64>, w: &Point3<f64>) -> f64 {
    match ((u - p).try_normalize(0.0), (w - p).try_normalize(0.0)) {
        (Some(du), Some(dw)) => du.dot(&dw).clamp(-1.0, 1.0).acos(),
        _ => 0.0,
    }
}
