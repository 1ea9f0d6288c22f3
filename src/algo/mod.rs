//! Derived-attribute operations.
//!
//! Functions that compute attributes from mesh topology and vertex
//! positions:
//!
//! - **Normals**: per-face unit normals, angle-weighted per-vertex normals
//! - **Barycentric**: per-corner barycentric tags for wireframe rendering
//!
//! Results are stored in the mesh's attribute maps under the well-known
//! names ([`NORMAL`](crate::mesh::NORMAL),
//! [`BARYCENTRIC`](crate::mesh::BARYCENTRIC)).

pub mod barycentric;
pub mod normals;

pub use barycentric::generate_loop_barycentric;
pub use normals::{generate_face_normals, generate_vertex_normals};
