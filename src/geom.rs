//! Geometric primitives for spatial queries.
//!
//! Axis-aligned boxes, rays, and the two intersection tests the BVH and the
//! mesh collider are built on.

use nalgebra::{Point3, Vector3};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

impl Aabb {
    /// Create a box from its corners.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create an empty (inverted) box that any point expands.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// The smallest box containing every point.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for p in points {
            aabb.expand_point(p);
        }
        aabb
    }

    /// Grow this box to include another.
    pub fn expand(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Grow this box to include a point.
    pub fn expand_point(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Check whether a point lies inside or on the boundary.
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    /// Center of the box.
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Index of the longest axis (0=X, 1=Y, 2=Z). Ties go to the lower axis.
    pub fn longest_axis(&self) -> usize {
        let d = self.extent();
        if d.x >= d.y && d.x >= d.z {
            0
        } else if d.y >= d.z {
            1
        } else {
            2
        }
    }

    /// Surface area, or zero for an empty box.
    pub fn surface_area(&self) -> f64 {
        if !self.is_valid() {
            return 0.0;
        }
        let d = self.extent();
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Returns `true` unless the box is empty.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

/// A half-line `origin + t * direction`, `t >= 0`.
///
/// The direction need not be normalized; distances reported by the
/// intersection tests are in units of its length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Point3<f64>,
    /// Direction, not necessarily normalized.
    pub direction: Vector3<f64>,
}

impl Ray {
    /// Create a ray.
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    /// The point at parameter `t`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }
}

/// Slab test between a ray and a box.
///
/// Returns the entry and exit parameters `(t0, t1)`, or `None` if the ray
/// misses the box or the box lies entirely behind the origin. `t0` is
/// negative when the origin is inside the box.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<(f64, f64)> {
    let mut t0 = f64::NEG_INFINITY;
    let mut t1 = f64::INFINITY;

    for i in 0..3 {
        let d = ray.direction[i];
        let o = ray.origin[i];
        if d == 0.0 {
            // Parallel to this slab.
            if o < aabb.min[i] || o > aabb.max[i] {
                return None;
            }
        } else {
            let near = (aabb.min[i] - o) / d;
            let far = (aabb.max[i] - o) / d;
            t0 = t0.max(near.min(far));
            t1 = t1.min(near.max(far));
        }
    }

    if t0 > t1 || t1 < 0.0 {
        return None;
    }
    Some((t0, t1))
}

/// Möller–Trumbore ray/triangle intersection.
///
/// Returns `(t, u, v)`: the ray parameter of the hit and the barycentric
/// weights of `b` and `c`. Rays parallel to the triangle plane never hit.
pub fn ray_triangle(
    ray: &Ray,
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
) -> Option<(f64, f64, f64)> {
    let ab = b - a;
    let ac = c - a;

    let pv = ray.direction.cross(&ac);
    let det = ab.dot(&pv);
    if det == 0.0 {
        return None;
    }
    let inverse_det = 1.0 / det;

    let tv = ray.origin - a;
    let u = tv.dot(&pv) * inverse_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qv = tv.cross(&ab);
    let v = ray.direction.dot(&qv) * inverse_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = ac.dot(&qv) * inverse_det;
    if t < 0.0 {
        return None;
    }
    Some((t, u, v))
}
