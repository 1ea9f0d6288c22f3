//! # Brep
//!
//! A boundary-representation mesh kernel with per-element attributes and a
//! bounding volume hierarchy for ray queries.
//!
//! Brep stores polygon meshes as vertices, edges, loops (face corners), and
//! faces linked by intrusive circular lists, with named attribute arrays on
//! every element kind. On top of the kernel it provides derived attributes
//! (normals, barycentric tags) and nearest-hit ray casting.
//!
//! ## Features
//!
//! - **B-rep data structure**: arbitrary polygons, shared and non-manifold edges
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//! - **Typed attributes**: named per-element arrays that follow their elements
//! - **BVH**: binned-SAH construction and ray visitation
//! - **Ray casting**: nearest face hits through [`collider::MeshCollider`]
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use brep::prelude::*;
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//!
//! let mesh: BrepMesh = build_from_triangles(&positions, &faces).unwrap();
//! assert_eq!(mesh.num_vertices(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//! assert_eq!(mesh.num_faces(), 4);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use brep::prelude::*;
//! use nalgebra::Point3;
//!
//! # let positions = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: BrepMesh = build_from_triangles(&positions, &faces).unwrap();
//! // Edges around a vertex
//! let v = VertexId::new(0);
//! for e in mesh.vertex_edges(v) {
//!     println!("Edge {:?} to {:?}", e, mesh.edges()[e].other_vertex(v));
//! }
//!
//! // Corners of a face
//! let f = FaceId::new(0);
//! for l in mesh.face_loops(f) {
//!     println!("Corner {:?} at {:?}", l, mesh.loops()[l].vertex());
//! }
//! ```
//!
//! ## Ray Casting
//!
//! ```
//! use brep::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(1.0, 1.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: BrepMesh = build_from_triangles(&positions, &[[0, 1, 2], [0, 2, 3]]).unwrap();
//! let collider = MeshCollider::new(mesh).unwrap();
//!
//! let ray = Ray::new(Point3::new(0.25, 0.5, 1.0), Vector3::new(0.0, 0.0, -1.0));
//! let hit = collider.intersection(&ray).unwrap();
//! assert_eq!(hit.face, FaceId::new(1));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod bvh;
pub mod collider;
pub mod error;
pub mod geom;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use brep::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        generate_face_normals, generate_loop_barycentric, generate_vertex_normals,
    };
    pub use crate::bvh::{Bvh, BvhOptions, BvhPrimitive};
    pub use crate::collider::{MeshCollider, RayHit};
    pub use crate::error::{MeshError, Result};
    pub use crate::geom::{Aabb, Ray};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, Attribute, AttributeMap,
        BrepMesh, Edge, EdgeId, ElementId, Face, FaceId, Loop, LoopId, MeshIndex, Vertex,
        VertexId, BARYCENTRIC, NORMAL, POSITION,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
