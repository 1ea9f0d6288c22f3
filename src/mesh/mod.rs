//! Core mesh data structures.
//!
//! This module provides the boundary-representation (B-rep) mesh and its
//! element containers.
//!
//! # Overview
//!
//! The primary type is [`BrepMesh`], a polygon mesh made of four element
//! kinds:
//!
//! - [`Vertex`] - heads a cycle of incident edges
//! - [`Edge`] - joins two distinct vertices and heads a cycle of loops
//! - [`Loop`] - one corner of a face, linked into its edge's and its face's cycle
//! - [`Face`] - heads the cycle of its corners in winding order
//!
//! Faces can have any number of corners and edges can be shared by any
//! number of faces, so non-manifold input is representable.
//!
//! # Index Types
//!
//! Elements are identified by type-safe index wrappers ([`VertexId`],
//! [`EdgeId`], [`LoopId`], [`FaceId`]), generic over the underlying integer
//! type ([`MeshIndex`] trait). Ids are positions in dense storage: removing an
//! element moves the last element of its kind into the freed slot, so ids of
//! that kind held across a removal may be stale.
//!
//! # Attributes
//!
//! Each element kind has an [`AttributeMap`] of named, typed arrays, for
//! example the [`POSITION`] vertex attribute.
//!
//! # Construction
//!
//! ```
//! use brep::mesh::{build_from_triangles, BrepMesh};
//! use nalgebra::Point3;
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: BrepMesh = build_from_triangles(&positions, &faces).unwrap();
//! assert_eq!(mesh.num_edges(), 3);
//! ```

mod attribute;
mod brep;
mod builder;
mod container;
mod edge;
mod face;
mod index;
mod loops;
mod vertex;

pub use attribute::{Attribute, AttributeMap, BARYCENTRIC, NORMAL, POSITION};
pub use brep::BrepMesh;
pub use builder::{build_from_polygons, build_from_triangles, to_face_vertex};
pub use container::{Element, ElementContainer};
pub use edge::Edge;
pub use face::Face;
pub use index::{EdgeId, ElementId, FaceId, LoopId, MeshIndex, VertexId};
pub use loops::{Loop, LoopIter, LoopList};
pub use vertex::{EdgeList, Vertex, VertexEdgeIter};
