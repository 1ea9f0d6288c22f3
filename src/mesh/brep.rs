//! The B-rep mesh aggregate.

use super::attribute::AttributeMap;
use super::container::ElementContainer;
use super::edge::Edge;
use super::face::Face;
use super::index::{EdgeId, FaceId, LoopId, MeshIndex, VertexId};
use super::loops::{Cycle, Loop, LoopIter, LoopList};
use super::vertex::{Vertex, VertexEdgeIter};

/// A boundary-representation polygon mesh.
///
/// Vertices, edges, loops, and faces are stored in four dense
/// [`ElementContainer`]s, each with its own attribute map. Faces may have any
/// number of corners and an edge may be shared by any number of faces.
///
/// `Clone` produces an independent deep copy with identical ids.
#[derive(Debug, Clone)]
pub struct BrepMesh<I: MeshIndex = u32> {
    pub(crate) vertices: ElementContainer<Vertex<I>>,
    pub(crate) edges: ElementContainer<Edge<I>>,
    pub(crate) loops: ElementContainer<Loop<I>>,
    pub(crate) faces: ElementContainer<Face<I>>,
}

impl<I: MeshIndex> Default for BrepMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> BrepMesh<I> {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: ElementContainer::new(),
            edges: ElementContainer::new(),
            loops: ElementContainer::new(),
            faces: ElementContainer::new(),
        }
    }

    /// Create an empty mesh with room for the given number of vertices and faces.
    ///
    /// Edge and loop capacity is estimated for a triangle mesh.
    pub fn with_capacity(num_vertices: usize, num_faces: usize) -> Self {
        Self {
            vertices: ElementContainer::with_capacity(num_vertices),
            edges: ElementContainer::with_capacity(num_faces * 3 / 2),
            loops: ElementContainer::with_capacity(num_faces * 3),
            faces: ElementContainer::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Number of loops (face corners).
    #[inline]
    pub fn num_loops(&self) -> usize {
        self.loops.len()
    }

    /// Number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// The vertex container.
    #[inline]
    pub fn vertices(&self) -> &ElementContainer<Vertex<I>> {
        &self.vertices
    }

    /// The vertex container, for attribute access.
    #[inline]
    pub fn vertices_mut(&mut self) -> &mut ElementContainer<Vertex<I>> {
        &mut self.vertices
    }

    /// The edge container.
    #[inline]
    pub fn edges(&self) -> &ElementContainer<Edge<I>> {
        &self.edges
    }

    /// The edge container, for attribute access.
    #[inline]
    pub fn edges_mut(&mut self) -> &mut ElementContainer<Edge<I>> {
        &mut self.edges
    }

    /// The loop container.
    #[inline]
    pub fn loops(&self) -> &ElementContainer<Loop<I>> {
        &self.loops
    }

    /// The loop container, for attribute access.
    #[inline]
    pub fn loops_mut(&mut self) -> &mut ElementContainer<Loop<I>> {
        &mut self.loops
    }

    /// The face container.
    #[inline]
    pub fn faces(&self) -> &ElementContainer<Face<I>> {
        &self.faces
    }

    /// The face container, for attribute access.
    #[inline]
    pub fn faces_mut(&mut self) -> &mut ElementContainer<Face<I>> {
        &mut self.faces
    }

    // ==================== Traversal ====================

    /// Iterate over the edges incident to a vertex, in insertion order.
    pub fn vertex_edges(&self, v: VertexId<I>) -> VertexEdgeIter<'_, I> {
        VertexEdgeIter::new(&self.edges, v, &self.vertices[v].edges)
    }

    /// Iterate over the faces touching a vertex. Each face is reported once.
    pub fn vertex_faces(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        // A face reaches v through two of its edges; keep the one whose loop starts at v.
        self.vertex_edges(v)
            .flat_map(move |e| self.edge_loops(e))
            .filter(move |&l| self.loops[l].vertex == v)
            .map(|l| self.loops[l].face)
    }

    /// Iterate over the loops running along an edge.
    pub fn edge_loops(&self, e: EdgeId<I>) -> LoopIter<'_, I> {
        LoopIter::new(&self.loops, &self.edges[e].loops, Cycle::Edge)
    }

    /// Iterate over the faces using an edge, once per loop.
    pub fn edge_faces(&self, e: EdgeId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.edge_loops(e).map(|l| self.loops[l].face)
    }

    /// Iterate over the corners of a face in winding order.
    pub fn face_loops(&self, f: FaceId<I>) -> LoopIter<'_, I> {
        LoopIter::new(&self.loops, &self.faces[f].loops, Cycle::Face)
    }

    /// Iterate over the vertices of a face in winding order.
    pub fn face_vertices(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_loops(f).map(|l| self.loops[l].vertex)
    }

    /// Iterate over the boundary edges of a face in winding order.
    pub fn face_edges(&self, f: FaceId<I>) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.face_loops(f).map(|l| self.loops[l].edge)
    }

    /// The vertex at the far end of a loop's edge.
    #[inline]
    pub fn loop_next_vertex(&self, l: LoopId<I>) -> VertexId<I> {
        let corner = &self.loops[l];
        self.edges[corner.edge].other_vertex(corner.vertex)
    }

    // ==================== Validation ====================

    /// Check every connectivity invariant and attribute length.
    ///
    /// Intended for tests and debug assertions; the cost is linear in the
    /// size of the mesh.
    pub fn is_valid(&self) -> bool {
        let attributes_match = |map: &AttributeMap, len: usize| {
            map.element_count() == len && map.is_consistent()
        };
        if !(attributes_match(self.vertices.attributes(), self.vertices.len())
            && attributes_match(self.edges.attributes(), self.edges.len())
            && attributes_match(self.loops.attributes(), self.loops.len())
            && attributes_match(self.faces.attributes(), self.faces.len()))
        {
            return false;
        }

        let mut edge_refs = 0;
        for (v, vertex) in self.vertices.iter() {
            let list = &vertex.edges;
            if list.len == 0 {
                continue;
            }
            if !self.edges.contains(list.head) {
                return false;
            }
            let mut e = list.head;
            for _ in 0..list.len {
                let edge = &self.edges[e];
                if !edge.has_vertex(v) {
                    return false;
                }
                let next = edge.next_around(v);
                if !self.edges.contains(next) || self.edges[next].previous_around(v) != e {
                    return false;
                }
                e = next;
            }
            if e != list.head {
                return false;
            }
            edge_refs += list.len;
        }
        // Each edge sits in exactly two vertex cycles.
        if edge_refs != 2 * self.edges.len() {
            return false;
        }

        let mut edge_loop_refs = 0;
        for (e, edge) in self.edges.iter() {
            let [a, b] = edge.vertices;
            if a == b || !self.vertices.contains(a) || !self.vertices.contains(b) {
                return false;
            }
            if !self.cycle_closes(&edge.loops, Cycle::Edge, |l| l.edge == e) {
                return false;
            }
            edge_loop_refs += edge.loops.len;
        }

        let mut face_loop_refs = 0;
        for (f, face) in self.faces.iter() {
            if face.loops.len < 3 {
                return false;
            }
            if !self.cycle_closes(&face.loops, Cycle::Face, |l| l.face == f) {
                return false;
            }
            face_loop_refs += face.loops.len;
        }

        if edge_loop_refs != self.loops.len() || face_loop_refs != self.loops.len() {
            return false;
        }

        self.loops.iter().all(|(_, corner)| {
            let edge = &self.edges[corner.edge];
            edge.has_vertex(corner.vertex)
                && self.loops[corner.face_next].vertex == edge.other_vertex(corner.vertex)
        })
    }

    /// Walk a loop cycle and check that it closes after `len` steps with
    /// consistent back links and that every member satisfies `owned`.
    fn cycle_closes(
        &self,
        list: &LoopList<I>,
        cycle: Cycle,
        owned: impl Fn(&Loop<I>) -> bool,
    ) -> bool {
        if list.len == 0 {
            return true;
        }
        if !self.loops.contains(list.head) {
            return false;
        }
        let mut l = list.head;
        for _ in 0..list.len {
            let corner = &self.loops[l];
            if !owned(corner) {
                return false;
            }
            let next = corner.next(cycle);
            if !self.loops.contains(next) || self.loops[next].previous(cycle) != l {
                return false;
            }
            l = next;
        }
        l == list.head
    }
}
