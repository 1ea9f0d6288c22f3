//! Vertices and their incident-edge cycles.
//!
//! A vertex carries no data of its own besides the head of a circular list of
//! incident edges. The links of that list live in the edges: every edge has
//! one `next`/`previous` pair per endpoint, and the pair belonging to vertex
//! `v` is found with [`Edge::slot`]. Positions and other data are attributes.

use super::brep::BrepMesh;
use super::container::{Element, ElementContainer};
use super::edge::Edge;
use super::index::{EdgeId, MeshIndex, VertexId};

/// A vertex of a B-rep mesh.
#[derive(Debug, Clone, Copy)]
pub struct Vertex<I: MeshIndex = u32> {
    pub(crate) edges: EdgeList<I>,
}

impl<I: MeshIndex> Default for Vertex<I> {
    fn default() -> Self {
        Self {
            edges: EdgeList::default(),
        }
    }
}

impl<I: MeshIndex> Vertex<I> {
    /// Number of incident edges.
    #[inline]
    pub fn degree(&self) -> usize {
        self.edges.len
    }

    /// Returns `true` if no edge touches this vertex.
    #[inline]
    pub fn is_isolated(&self) -> bool {
        self.edges.len == 0
    }

    /// The incident-edge list.
    #[inline]
    pub fn edges(&self) -> &EdgeList<I> {
        &self.edges
    }
}

impl<I: MeshIndex> Element for Vertex<I> {
    type Id = VertexId<I>;
}

/// Head and length of a vertex's incident-edge cycle.
#[derive(Debug, Clone, Copy)]
pub struct EdgeList<I: MeshIndex = u32> {
    pub(crate) head: EdgeId<I>,
    pub(crate) len: usize,
}

impl<I: MeshIndex> Default for EdgeList<I> {
    fn default() -> Self {
        Self {
            head: EdgeId::invalid(),
            len: 0,
        }
    }
}

impl<I: MeshIndex> EdgeList<I> {
    /// The first incident edge, if any.
    #[inline]
    pub fn front(&self) -> Option<EdgeId<I>> {
        (self.len > 0).then_some(self.head)
    }

    /// Number of incident edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no incident edges.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `edge` to the cycle of `vertex`, splicing it in before the head.
    pub(crate) fn push_back(
        &mut self,
        edges: &mut ElementContainer<Edge<I>>,
        vertex: VertexId<I>,
        edge: EdgeId<I>,
    ) {
        let slot = edges[edge].slot(vertex);
        if self.len == 0 {
            let e = edges.get_mut(edge);
            e.vertex_next[slot] = edge;
            e.vertex_previous[slot] = edge;
            self.head = edge;
        } else {
            let head = self.head;
            let head_slot = edges[head].slot(vertex);
            let tail = edges[head].vertex_previous[head_slot];
            let tail_slot = edges[tail].slot(vertex);

            edges.get_mut(tail).vertex_next[tail_slot] = edge;
            {
                let e = edges.get_mut(edge);
                e.vertex_previous[slot] = tail;
                e.vertex_next[slot] = head;
            }
            edges.get_mut(head).vertex_previous[head_slot] = edge;
        }
        self.len += 1;
    }

    /// Unlink `edge` from the cycle of `vertex`.
    pub(crate) fn remove(
        &mut self,
        edges: &mut ElementContainer<Edge<I>>,
        vertex: VertexId<I>,
        edge: EdgeId<I>,
    ) {
        if self.len == 1 {
            self.head = EdgeId::invalid();
            self.len = 0;
            return;
        }

        let slot = edges[edge].slot(vertex);
        let next = edges[edge].vertex_next[slot];
        let previous = edges[edge].vertex_previous[slot];

        let previous_slot = edges[previous].slot(vertex);
        edges.get_mut(previous).vertex_next[previous_slot] = next;
        let next_slot = edges[next].slot(vertex);
        edges.get_mut(next).vertex_previous[next_slot] = previous;

        if self.head == edge {
            self.head = next;
        }
        self.len -= 1;
    }
}

/// Iterator over the edges incident to a vertex, in insertion order.
pub struct VertexEdgeIter<'a, I: MeshIndex = u32> {
    edges: &'a ElementContainer<Edge<I>>,
    vertex: VertexId<I>,
    current: EdgeId<I>,
    remaining: usize,
}

impl<'a, I: MeshIndex> VertexEdgeIter<'a, I> {
    pub(crate) fn new(
        edges: &'a ElementContainer<Edge<I>>,
        vertex: VertexId<I>,
        list: &EdgeList<I>,
    ) -> Self {
        Self {
            edges,
            vertex,
            current: list.head,
            remaining: list.len,
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexEdgeIter<'a, I> {
    type Item = EdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let result = self.current;
        let edge = &self.edges[result];
        self.current = edge.vertex_next[edge.slot(self.vertex)];
        self.remaining -= 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, I: MeshIndex> ExactSizeIterator for VertexEdgeIter<'a, I> {}

impl<I: MeshIndex> BrepMesh<I> {
    /// Add a new isolated vertex and return its ID.
    ///
    /// Every vertex attribute gets its fill value for the new vertex.
    pub fn add_vertex(&mut self) -> VertexId<I> {
        self.vertices.push(Vertex::default())
    }

    /// Remove a vertex along with every edge, loop, and face that uses it.
    ///
    /// The last vertex moves into the freed slot, so vertex ids held across
    /// this call may be stale. The same holds for edge, loop, and face ids.
    pub fn remove_vertex(&mut self, v: VertexId<I>) {
        while let Some(e) = self.vertices[v].edges.front() {
            self.remove_edge(e);
        }

        if let Some(moved) = self.vertices.swap_remove(v) {
            self.rename_vertex(moved, v);
        }
    }

    /// Remove every element of the mesh, attribute values included.
    ///
    /// Attribute definitions are kept; their arrays become empty.
    pub fn clear(&mut self) {
        while let Some(v) = self.vertices.back() {
            self.remove_vertex(v);
        }
    }

    /// Rewrite references to a vertex that moved from `from` to `to`.
    fn rename_vertex(&mut self, from: VertexId<I>, to: VertexId<I>) {
        let list = self.vertices[to].edges;
        let incident: Vec<EdgeId<I>> = VertexEdgeIter::new(&self.edges, from, &list).collect();

        for e in incident {
            let loops: Vec<_> = self.edge_loops(e).collect();
            for l in loops {
                let corner = self.loops.get_mut(l);
                if corner.vertex == from {
                    corner.vertex = to;
                }
            }

            let edge = self.edges.get_mut(e);
            let slot = edge.slot(from);
            edge.vertices[slot] = to;
        }
    }
}
