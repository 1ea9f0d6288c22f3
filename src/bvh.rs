//! Bounding volume hierarchy for ray queries.
//!
//! The tree is stored as a flat array of nodes. An internal node has its two
//! children at consecutive slots; a leaf owns a contiguous range of a private
//! permutation of primitive indices. Construction splits each node on the
//! widest axis of its primitives' centroids, choosing the split plane with a
//! binned surface area heuristic.
//!
//! # Example
//!
//! ```
//! use brep::bvh::{Bvh, BvhOptions, BvhPrimitive};
//! use brep::geom::Ray;
//! use nalgebra::{Point3, Vector3};
//!
//! let primitives: Vec<BvhPrimitive> = (0..8)
//!     .map(|i| {
//!         let c = Point3::new(i as f64, 0.0, 0.0);
//!         BvhPrimitive::from_points(&[c, c + Vector3::new(0.5, 0.5, 0.5)])
//!     })
//!     .collect();
//!
//! let options = BvhOptions::default().with_max_leaf_size(1);
//! let mut bvh = Bvh::with_options(options).unwrap();
//! bvh.build(&primitives);
//!
//! let ray = Ray::new(Point3::new(3.25, 0.25, -1.0), Vector3::z());
//! let mut hits = Vec::new();
//! bvh.visit(&ray, |i| hits.push(i));
//! assert_eq!(hits, vec![3]);
//! ```

use std::ops::Range;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::geom::{ray_aabb, Aabb, Ray};
use crate::mesh::{BrepMesh, FaceId, MeshIndex, POSITION};

/// Face count above which mesh primitives are derived in parallel.
const PARALLEL_THRESHOLD: usize = 4096;

/// A primitive to be indexed: its bounding box and a representative point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhPrimitive {
    /// Point used to bin the primitive during construction.
    pub centroid: Point3<f64>,
    /// Bounds of the primitive.
    pub bounds: Aabb,
}

impl BvhPrimitive {
    /// Create a primitive from its centroid and bounds.
    pub fn new(centroid: Point3<f64>, bounds: Aabb) -> Self {
        Self { centroid, bounds }
    }

    /// Bound a point set, using the mean point as centroid.
    pub fn from_points(points: &[Point3<f64>]) -> Self {
        let bounds = Aabb::from_points(points);
        let sum = points
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords);
        let centroid = Point3::from(sum / points.len().max(1) as f64);
        Self { centroid, bounds }
    }
}

/// A node of the flattened tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNode {
    /// Bounds of every primitive below this node.
    pub bounds: Aabb,
    /// Number of primitives in a leaf; zero for an internal node.
    pub size: usize,
    /// First child for an internal node (the second is at `offset + 1`), or
    /// start of the leaf's range in [`Bvh::primitive_indices`].
    pub offset: usize,
}

impl BvhNode {
    /// True if the node stores primitives rather than children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.size != 0
    }

    /// Primitive index range of a leaf.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size
    }
}

/// Largest accepted [`BvhOptions::bins`].
pub const MAX_BINS: usize = 1024;

/// Options for BVH construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BvhOptions {
    /// Nodes with at most this many primitives are not split (default: 2).
    pub max_leaf_size: usize,

    /// Number of centroid bins evaluated per split (default: 16).
    pub bins: usize,
}

impl Default for BvhOptions {
    fn default() -> Self {
        Self {
            max_leaf_size: 2,
            bins: 16,
        }
    }
}

impl BvhOptions {
    /// Set the maximum number of primitives per leaf.
    pub fn with_max_leaf_size(mut self, max_leaf_size: usize) -> Self {
        self.max_leaf_size = max_leaf_size;
        self
    }

    /// Set the number of centroid bins.
    pub fn with_bins(mut self, bins: usize) -> Self {
        self.bins = bins;
        self
    }

    /// Check that the options describe a buildable tree.
    pub fn validate(&self) -> Result<()> {
        if self.max_leaf_size == 0 {
            return Err(MeshError::invalid_param(
                "max_leaf_size",
                self.max_leaf_size,
                "must be at least 1",
            ));
        }
        if self.bins < 2 {
            return Err(MeshError::invalid_param(
                "bins",
                self.bins,
                "must be at least 2",
            ));
        }
        if self.bins > MAX_BINS {
            return Err(MeshError::invalid_param(
                "bins",
                self.bins,
                "must be at most 1024",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bin {
    bounds: Aabb,
    count: usize,
}

/// Bounding volume hierarchy over a set of primitives.
#[derive(Debug, Clone, Default)]
pub struct Bvh {
    nodes: Vec<BvhNode>,
    primitive_indices: Vec<usize>,
    options: BvhOptions,
}

impl Bvh {
    /// Create an empty BVH with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty BVH with the given options.
    ///
    /// # Errors
    /// [`MeshError::InvalidParameter`] if the options fail validation.
    pub fn with_options(options: BvhOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            nodes: Vec::new(),
            primitive_indices: Vec::new(),
            options,
        })
    }

    /// Construction options.
    #[inline]
    pub fn options(&self) -> &BvhOptions {
        &self.options
    }

    /// Build the tree over `primitives`, discarding any previous tree.
    ///
    /// Primitive `i` is reported as index `i` by [`visit`](Self::visit).
    pub fn build(&mut self, primitives: &[BvhPrimitive]) {
        self.clear();
        if primitives.is_empty() {
            return;
        }

        let n = primitives.len();
        self.primitive_indices = (0..n).collect();
        self.nodes.reserve(2 * n - 1);

        let mut bounds = Aabb::empty();
        for p in primitives {
            bounds.expand(&p.bounds);
        }
        self.nodes.push(BvhNode {
            bounds,
            size: n,
            offset: 0,
        });

        let mut depth = 0;
        let mut pending = vec![(0usize, 1usize)];
        while let Some((node, level)) = pending.pop() {
            depth = depth.max(level);
            if let Some(left) = self.subdivide(primitives, node) {
                pending.push((left + 1, level + 1));
                pending.push((left, level + 1));
            }
        }

        log::debug!(
            "built BVH over {} primitives: {} nodes, {} leaves, depth {}",
            n,
            self.nodes.len(),
            self.nodes.iter().filter(|node| node.is_leaf()).count(),
            depth
        );
    }

    /// Build the tree over the faces of a mesh.
    ///
    /// Primitive `i` is face `i`, bounded by its corner positions. The tree
    /// goes stale when the mesh geometry or face set changes.
    ///
    /// # Errors
    /// [`MeshError::AttributeNotFound`] if the mesh has no vertex positions.
    pub fn build_mesh<I: MeshIndex>(&mut self, mesh: &BrepMesh<I>) -> Result<()> {
        let positions = mesh
            .vertices()
            .attributes()
            .get::<Point3<f64>>(POSITION)?
            .as_slice();

        let face_primitive = |i: usize| {
            let corners: Vec<Point3<f64>> = mesh
                .face_vertices(FaceId::new(i))
                .map(|v| positions[v.index()])
                .collect();
            BvhPrimitive::from_points(&corners)
        };

        let n = mesh.num_faces();
        let primitives: Vec<BvhPrimitive> = if n > PARALLEL_THRESHOLD {
            (0..n).into_par_iter().map(face_primitive).collect()
        } else {
            (0..n).map(face_primitive).collect()
        };

        self.build(&primitives);
        Ok(())
    }

    /// Call `visitor` with the index of every primitive in a leaf whose
    /// bounds the ray hits.
    ///
    /// The callback sees a superset of the primitives whose own bounds the
    /// ray hits, in no particular order. Exact tests are up to the caller.
    pub fn visit<F: FnMut(usize)>(&self, ray: &Ray, mut visitor: F) {
        if self.nodes.is_empty() {
            return;
        }

        let mut stack = Vec::with_capacity(64);
        stack.push(0);
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            if ray_aabb(ray, &node.bounds).is_none() {
                continue;
            }
            if node.is_leaf() {
                for &p in &self.primitive_indices[node.range()] {
                    visitor(p);
                }
            } else {
                stack.push(node.offset + 1);
                stack.push(node.offset);
            }
        }
    }

    /// Drop the tree. Options are kept.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.primitive_indices.clear();
    }

    /// True if nothing has been built.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes, including leaves.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The flattened nodes; the root is at index 0.
    #[inline]
    pub fn nodes(&self) -> &[BvhNode] {
        &self.nodes
    }

    /// The primitive permutation that leaf ranges index into.
    #[inline]
    pub fn primitive_indices(&self) -> &[usize] {
        &self.primitive_indices
    }

    /// Bounds of the whole tree, or `None` if it is empty.
    #[inline]
    pub fn bounds(&self) -> Option<&Aabb> {
        self.nodes.first().map(|node| &node.bounds)
    }

    /// Split a node in place. Returns the slot of its first child, or `None`
    /// if the node stays a leaf.
    fn subdivide(&mut self, primitives: &[BvhPrimitive], index: usize) -> Option<usize> {
        let node = self.nodes[index];
        if node.size <= self.options.max_leaf_size {
            return None;
        }

        let range = node.range();
        let mut centroid_bounds = Aabb::empty();
        for &p in &self.primitive_indices[range.clone()] {
            centroid_bounds.expand_point(&primitives[p].centroid);
        }
        let axis = centroid_bounds.longest_axis();
        let min = centroid_bounds.min[axis];
        let extent = centroid_bounds.max[axis] - min;
        // Coincident centroids cannot be separated.
        if extent <= 0.0 {
            return None;
        }

        let bin_count = self.options.bins;
        let scale = bin_count as f64 / extent;
        let bin_of = |p: usize| {
            let b = ((primitives[p].centroid[axis] - min) * scale) as usize;
            b.min(bin_count - 1)
        };

        let mut bins = vec![Bin::default(); bin_count];
        for &p in &self.primitive_indices[range.clone()] {
            let bin = &mut bins[bin_of(p)];
            bin.count += 1;
            bin.bounds.expand(&primitives[p].bounds);
        }
        let boundary = best_split(&bins);

        let indices = &mut self.primitive_indices[range.clone()];
        let mut left_count = 0;
        for j in 0..indices.len() {
            if bin_of(indices[j]) < boundary {
                indices.swap(left_count, j);
                left_count += 1;
            }
        }
        if left_count == 0 || left_count == node.size {
            return None;
        }

        let mid = range.start + left_count;
        let left = BvhNode {
            bounds: self.range_bounds(primitives, range.start..mid),
            size: left_count,
            offset: range.start,
        };
        let right = BvhNode {
            bounds: self.range_bounds(primitives, mid..range.end),
            size: node.size - left_count,
            offset: mid,
        };

        let first_child = self.nodes.len();
        self.nodes.push(left);
        self.nodes.push(right);
        let parent = &mut self.nodes[index];
        parent.size = 0;
        parent.offset = first_child;
        Some(first_child)
    }

    fn range_bounds(&self, primitives: &[BvhPrimitive], range: Range<usize>) -> Aabb {
        let mut bounds = Aabb::empty();
        for &p in &self.primitive_indices[range] {
            bounds.expand(&primitives[p].bounds);
        }
        bounds
    }
}

/// Pick the bin boundary with the lowest surface area cost.
///
/// Boundary `k` puts bins `0..k` on the left. Ties go to the lowest boundary.
fn best_split(bins: &[Bin]) -> usize {
    let n = bins.len();

    // right_cost[k] is the cost of bins k.. for boundary k.
    let mut right_cost = vec![0.0; n];
    let mut bounds = Aabb::empty();
    let mut count = 0;
    for k in (1..n).rev() {
        bounds.expand(&bins[k].bounds);
        count += bins[k].count;
        right_cost[k] = count as f64 * bounds.surface_area();
    }

    let mut best = (f64::INFINITY, 1);
    let mut bounds = Aabb::empty();
    let mut count = 0;
    for k in 1..n {
        bounds.expand(&bins[k - 1].bounds);
        count += bins[k - 1].count;
        let cost = count as f64 * bounds.surface_area() + right_cost[k];
        if cost < best.0 {
            best = (cost, k);
        }
    }
    best.1
}
