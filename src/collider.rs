//! Ray queries against a mesh.
//!
//! [`MeshCollider`] owns a triangle mesh together with a BVH over its faces
//! and answers nearest-hit ray queries.
//!
//! # Example
//!
//! ```
//! use brep::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! let positions = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let mesh: BrepMesh = build_from_triangles(&positions, &[[0, 1, 2]]).unwrap();
//! let collider = MeshCollider::new(mesh).unwrap();
//!
//! let ray = Ray::new(Point3::new(0.2, 0.2, 2.0), Vector3::new(0.0, 0.0, -1.0));
//! let hit = collider.intersection(&ray).unwrap();
//! assert!((hit.distance - 2.0).abs() < 1e-12);
//! assert_eq!(hit.normal, Vector3::z());
//! ```

use nalgebra::{Point3, Vector3};

use crate::algo::generate_face_normals;
use crate::bvh::{Bvh, BvhOptions};
use crate::error::Result;
use crate::geom::{ray_triangle, Ray};
use crate::mesh::{BrepMesh, FaceId, MeshIndex, NORMAL, POSITION};

/// The nearest intersection of a ray with a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<I: MeshIndex = u32> {
    /// Ray parameter of the hit point, in units of the ray direction.
    pub distance: f64,
    /// The face that was hit.
    pub face: FaceId<I>,
    /// Unit normal of that face.
    pub normal: Vector3<f64>,
}

/// A triangle mesh prepared for ray queries.
///
/// Faces are tested through their first three corners. Borrowing the mesh
/// through [`mesh_mut`](Self::mesh_mut) marks the collider stale: queries
/// report no hit until [`rebuild`](Self::rebuild) is called.
#[derive(Debug, Clone)]
pub struct MeshCollider<I: MeshIndex = u32> {
    mesh: BrepMesh<I>,
    bvh: Bvh,
    stale: bool,
}

impl<I: MeshIndex> MeshCollider<I> {
    /// Take ownership of a mesh and build a BVH over its faces.
    ///
    /// Face normals are generated if the mesh has none.
    ///
    /// # Errors
    /// [`MeshError::AttributeNotFound`](crate::error::MeshError::AttributeNotFound)
    /// if the mesh has no vertex positions.
    pub fn new(mesh: BrepMesh<I>) -> Result<Self> {
        Self::with_options(mesh, BvhOptions::default())
    }

    /// Like [`new`](Self::new), with explicit BVH options.
    pub fn with_options(mut mesh: BrepMesh<I>, options: BvhOptions) -> Result<Self> {
        mesh.vertices().attributes().get::<Point3<f64>>(POSITION)?;
        if !mesh.faces().attributes().contains(NORMAL) {
            generate_face_normals(&mut mesh)?;
        }

        let mut bvh = Bvh::with_options(options)?;
        bvh.build_mesh(&mesh)?;
        log::debug!(
            "mesh collider ready: {} faces, {} BVH nodes",
            mesh.num_faces(),
            bvh.node_count()
        );
        Ok(Self {
            mesh,
            bvh,
            stale: false,
        })
    }

    /// Find the nearest face hit by a ray.
    ///
    /// Returns `None` while the collider is stale.
    pub fn intersection(&self, ray: &Ray) -> Option<RayHit<I>> {
        if self.stale {
            return None;
        }
        let positions = self
            .mesh
            .vertices()
            .attributes()
            .get::<Point3<f64>>(POSITION)
            .ok()?;
        let normals = self
            .mesh
            .faces()
            .attributes()
            .get::<Vector3<f64>>(NORMAL)
            .ok()?;

        let mut nearest: Option<(f64, usize)> = None;
        self.bvh.visit(ray, |i| {
            let mut corners = self
                .mesh
                .face_vertices(FaceId::new(i))
                .map(|v| &positions[v]);
            let (Some(a), Some(b), Some(c)) = (corners.next(), corners.next(), corners.next())
            else {
                return;
            };
            if let Some((t, _, _)) = ray_triangle(ray, a, b, c) {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, i));
                }
            }
        });

        nearest.map(|(distance, i)| {
            let face = FaceId::new(i);
            RayHit {
                distance,
                face,
                normal: normals[face],
            }
        })
    }

    /// Regenerate face normals and the BVH after the mesh changed.
    pub fn rebuild(&mut self) -> Result<()> {
        generate_face_normals(&mut self.mesh)?;
        self.bvh.build_mesh(&self.mesh)?;
        self.stale = false;
        Ok(())
    }

    /// The collider mesh.
    #[inline]
    pub fn mesh(&self) -> &BrepMesh<I> {
        &self.mesh
    }

    /// The mesh, for modification. Call [`rebuild`](Self::rebuild) afterwards.
    #[inline]
    pub fn mesh_mut(&mut self) -> &mut BrepMesh<I> {
        self.stale = true;
        &mut self.mesh
    }

    /// True if the mesh was borrowed mutably since the last rebuild.
    #[inline]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// The face hierarchy.
    #[inline]
    pub fn bvh(&self) -> &Bvh {
        &self.bvh
    }

    /// Give the mesh back, dropping the BVH.
    pub fn into_mesh(self) -> BrepMesh<I> {
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::mesh::{build_from_polygons, build_from_triangles, VertexId};

    /// Two parallel unit squares at z = 0 and z = 1, two triangles each.
    fn slabs() -> BrepMesh {
        let mut positions = Vec::new();
        for z in [0.0, 1.0] {
            positions.push(Point3::new(0.0, 0.0, z));
            positions.push(Point3::new(1.0, 0.0, z));
            positions.push(Point3::new(1.0, 1.0, z));
            positions.push(Point3::new(0.0, 1.0, z));
        }
        let faces = [[0, 1, 2], [0, 2, 3], [4, 5, 6], [4, 6, 7]];
        build_from_triangles(&positions, &faces).unwrap()
    }

    #[test]
    fn test_nearest_hit() {
        let collider = MeshCollider::new(slabs()).unwrap();

        let down = Ray::new(Point3::new(0.75, 0.25, 3.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = collider.intersection(&down).unwrap();
        assert!((hit.distance - 2.0).abs() < 1e-12);
        assert_eq!(hit.face, FaceId::new(2));
        assert_eq!(hit.normal, Vector3::z());

        let up = Ray::new(Point3::new(0.25, 0.75, -1.0), Vector3::z());
        let hit = collider.intersection(&up).unwrap();
        assert!((hit.distance - 1.0).abs() < 1e-12);
        assert_eq!(hit.face, FaceId::new(1));
    }

    #[test]
    fn test_miss() {
        let collider = MeshCollider::new(slabs()).unwrap();

        let beside = Ray::new(Point3::new(2.0, 0.5, 3.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(collider.intersection(&beside), None);

        let away = Ray::new(Point3::new(0.5, 0.5, 3.0), Vector3::z());
        assert_eq!(collider.intersection(&away), None);
    }

    #[test]
    fn test_hits_match_brute_force() {
        let collider = MeshCollider::new(slabs()).unwrap();
        let positions = collider
            .mesh()
            .vertices()
            .attributes()
            .get::<Point3<f64>>(POSITION)
            .unwrap();

        for i in 0..10 {
            for j in 0..10 {
                let origin = Point3::new(0.05 + 0.1 * i as f64, 0.05 + 0.1 * j as f64, 2.0);
                let ray = Ray::new(origin, Vector3::new(0.01, -0.02, -1.0));

                let brute = collider
                    .mesh()
                    .faces()
                    .ids()
                    .filter_map(|f| {
                        let v: Vec<VertexId> = collider.mesh().face_vertices(f).collect();
                        ray_triangle(&ray, &positions[v[0]], &positions[v[1]], &positions[v[2]])
                            .map(|(t, _, _)| t)
                    })
                    .fold(None, |best: Option<f64>, t| {
                        Some(best.map_or(t, |b| b.min(t)))
                    });

                let hit = collider.intersection(&ray).map(|h| h.distance);
                assert_eq!(hit, brute);
            }
        }
    }

    #[test]
    fn test_requires_positions() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..3).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&v).unwrap();

        assert!(matches!(
            MeshCollider::new(mesh),
            Err(MeshError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_generates_face_normals() {
        let collider = MeshCollider::new(slabs()).unwrap();
        assert!(collider.mesh().faces().attributes().contains(NORMAL));
    }

    #[test]
    fn test_rebuild_after_move() {
        let mut collider = MeshCollider::new(slabs()).unwrap();
        {
            let positions = collider
                .mesh_mut()
                .vertices_mut()
                .attributes_mut()
                .get_mut::<Point3<f64>>(POSITION)
                .unwrap();
            for p in positions.as_mut_slice() {
                p.z += 10.0;
            }
        }
        collider.rebuild().unwrap();

        let down = Ray::new(Point3::new(0.75, 0.25, 20.0), Vector3::new(0.0, 0.0, -1.0));
        let hit = collider.intersection(&down).unwrap();
        assert!((hit.distance - 9.0).abs() < 1e-12);

        let mesh = collider.into_mesh();
        assert_eq!(mesh.num_faces(), 4);
    }

    #[test]
    fn test_no_hits_until_rebuild_after_removal() {
        let mut collider = MeshCollider::new(slabs()).unwrap();
        let ray = Ray::new(Point3::new(0.25, 0.75, 3.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(collider.intersection(&ray).unwrap().face, FaceId::new(3));

        // The tree still indexes four faces
        collider.mesh_mut().remove_face(FaceId::new(3));
        collider.mesh_mut().remove_face(FaceId::new(2));
        assert!(collider.is_stale());
        assert_eq!(collider.intersection(&ray), None);

        collider.rebuild().unwrap();
        assert!(!collider.is_stale());
        let hit = collider.intersection(&ray).unwrap();
        assert_eq!(hit.face, FaceId::new(1));
        assert!((hit.distance - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_quad_uses_first_triangle() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mesh: BrepMesh = build_from_polygons(&positions, &[[0, 1, 2, 3]]).unwrap();
        let collider = MeshCollider::new(mesh).unwrap();

        let inside_first = Ray::new(Point3::new(0.75, 0.25, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(collider.intersection(&inside_first).is_some());
        let outside_first = Ray::new(Point3::new(0.25, 0.75, 1.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(collider.intersection(&outside_first).is_none());
    }
}
