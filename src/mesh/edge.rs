//! Edges: vertex pairs with a cycle of loops.
//!
//! An edge joins two distinct vertices and heads the circular list of loops
//! that run along it, one per face corner using the edge. An edge with no
//! loops is a *wire* edge. Edges shared by more than two faces (non-manifold)
//! simply carry more loops.

use super::brep::BrepMesh;
use super::container::Element;
use super::index::{EdgeId, MeshIndex, VertexId};
use super::loops::LoopList;
use super::vertex::VertexEdgeIter;

/// An edge of a B-rep mesh.
#[derive(Debug, Clone, Copy)]
pub struct Edge<I: MeshIndex = u32> {
    pub(crate) vertices: [VertexId<I>; 2],
    pub(crate) vertex_next: [EdgeId<I>; 2],
    pub(crate) vertex_previous: [EdgeId<I>; 2],
    pub(crate) loops: LoopList<I>,
}

impl<I: MeshIndex> Edge<I> {
    fn new(a: VertexId<I>, b: VertexId<I>) -> Self {
        Self {
            vertices: [a, b],
            vertex_next: [EdgeId::invalid(); 2],
            vertex_previous: [EdgeId::invalid(); 2],
            loops: LoopList::default(),
        }
    }

    /// The two endpoints, in construction order.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 2] {
        self.vertices
    }

    /// Check whether `v` is one of the endpoints.
    #[inline]
    pub fn has_vertex(&self, v: VertexId<I>) -> bool {
        self.vertices[0] == v || self.vertices[1] == v
    }

    /// The endpoint opposite `v`.
    ///
    /// `v` must be an endpoint of this edge.
    #[inline]
    pub fn other_vertex(&self, v: VertexId<I>) -> VertexId<I> {
        self.vertices[(self.vertices[0] == v) as usize]
    }

    /// Which link pair threads this edge through the cycle of endpoint `v`.
    #[inline]
    pub fn slot(&self, v: VertexId<I>) -> usize {
        (self.vertices[1] == v) as usize
    }

    /// Next edge around endpoint `v`.
    #[inline]
    pub fn next_around(&self, v: VertexId<I>) -> EdgeId<I> {
        self.vertex_next[self.slot(v)]
    }

    /// Previous edge around endpoint `v`.
    #[inline]
    pub fn previous_around(&self, v: VertexId<I>) -> EdgeId<I> {
        self.vertex_previous[self.slot(v)]
    }

    /// The loops running along this edge.
    #[inline]
    pub fn loops(&self) -> &LoopList<I> {
        &self.loops
    }

    /// Returns `true` if the edge bounds no face.
    #[inline]
    pub fn is_wire(&self) -> bool {
        self.loops.is_empty()
    }
}

impl<I: MeshIndex> Element for Edge<I> {
    type Id = EdgeId<I>;
}

impl<I: MeshIndex> BrepMesh<I> {
    /// Add an edge between two vertices.
    ///
    /// Returns `None`, leaving the mesh untouched, if `a == b`. An edge is
    /// created even if one already joins the same pair; use [`find_edge`]
    /// first to share edges.
    ///
    /// [`find_edge`]: BrepMesh::find_edge
    pub fn add_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        if a == b {
            return None;
        }

        let e = self.edges.push(Edge::new(a, b));
        for v in [a, b] {
            let mut list = self.vertices[v].edges;
            list.push_back(&mut self.edges, v, e);
            self.vertices.get_mut(v).edges = list;
        }
        Some(e)
    }

    /// Find an edge joining `a` and `b`, in either order.
    ///
    /// Walks the incident-edge cycles of both vertices in lock-step, so the
    /// cost is bounded by the smaller of the two degrees.
    pub fn find_edge(&self, a: VertexId<I>, b: VertexId<I>) -> Option<EdgeId<I>> {
        if a == b {
            return None;
        }

        let list_a = &self.vertices[a].edges;
        let list_b = &self.vertices[b].edges;
        let steps = list_a.len.min(list_b.len);

        let walk_a = VertexEdgeIter::new(&self.edges, a, list_a);
        let walk_b = VertexEdgeIter::new(&self.edges, b, list_b);
        for (ea, eb) in walk_a.zip(walk_b).take(steps) {
            if self.edges[ea].has_vertex(b) {
                return Some(ea);
            }
            if self.edges[eb].has_vertex(a) {
                return Some(eb);
            }
        }
        None
    }

    /// Remove an edge along with every face that uses it.
    ///
    /// The last edge moves into the freed slot; see [`remove_vertex`] for the
    /// id invalidation rule.
    ///
    /// [`remove_vertex`]: BrepMesh::remove_vertex
    pub fn remove_edge(&mut self, e: EdgeId<I>) {
        // Face removal unlinks loops from this edge, so re-read the head each time.
        while let Some(l) = self.edges[e].loops.front() {
            let f = self.loops[l].face;
            self.remove_face(f);
        }

        let [a, b] = self.edges[e].vertices;
        for v in [a, b] {
            let mut list = self.vertices[v].edges;
            list.remove(&mut self.edges, v, e);
            self.vertices.get_mut(v).edges = list;
        }

        if let Some(moved) = self.edges.swap_remove(e) {
            self.rename_edge(moved, e);
        }
    }

    /// Remove every edge, and with them every face and loop.
    pub fn clear_edges(&mut self) {
        while let Some(e) = self.edges.back() {
            self.remove_edge(e);
        }
    }

    /// Rewrite references to an edge that moved from `from` to `to`.
    fn rename_edge(&mut self, from: EdgeId<I>, to: EdgeId<I>) {
        let edge = self.edges[to];

        for slot in 0..2 {
            let v = edge.vertices[slot];

            let mut next = edge.vertex_next[slot];
            let mut previous = edge.vertex_previous[slot];
            if next == from {
                next = to;
            }
            if previous == from {
                previous = to;
            }
            {
                let moved = self.edges.get_mut(to);
                moved.vertex_next[slot] = next;
                moved.vertex_previous[slot] = previous;
            }

            let previous_slot = self.edges[previous].slot(v);
            self.edges.get_mut(previous).vertex_next[previous_slot] = to;
            let next_slot = self.edges[next].slot(v);
            self.edges.get_mut(next).vertex_previous[next_slot] = to;

            let vertex = self.vertices.get_mut(v);
            if vertex.edges.head == from {
                vertex.edges.head = to;
            }
        }

        let loops: Vec<_> = self.edge_loops(to).collect();
        for l in loops {
            self.loops.get_mut(l).edge = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_loop_rejected() {
        let mut mesh = BrepMesh::<u32>::new();
        let v = mesh.add_vertex();

        assert_eq!(mesh.add_edge(v, v), None);
        assert_eq!(mesh.num_edges(), 0);
        assert!(mesh.vertices()[v].is_isolated());
    }

    #[test]
    fn test_add_edge_links_both_endpoints() {
        let mut mesh = BrepMesh::<u32>::new();
        let a = mesh.add_vertex();
        let b = mesh.add_vertex();
        let e = mesh.add_edge(a, b).unwrap();

        let edge = &mesh.edges()[e];
        assert_eq!(edge.vertices(), [a, b]);
        assert_ne!(edge.vertices()[0], edge.vertices()[1]);
        assert_eq!(edge.other_vertex(a), b);
        assert_eq!(edge.other_vertex(b), a);
        assert!(edge.is_wire());
        assert_eq!(mesh.vertex_edges(a).collect::<Vec<_>>(), vec![e]);
        assert_eq!(mesh.vertex_edges(b).collect::<Vec<_>>(), vec![e]);
    }

    #[test]
    fn test_find_edge_either_order() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..5).map(|_| mesh.add_vertex()).collect();
        let e01 = mesh.add_edge(v[0], v[1]).unwrap();
        let e02 = mesh.add_edge(v[0], v[2]).unwrap();
        let e30 = mesh.add_edge(v[3], v[0]).unwrap();

        assert_eq!(mesh.find_edge(v[0], v[1]), Some(e01));
        assert_eq!(mesh.find_edge(v[1], v[0]), Some(e01));
        assert_eq!(mesh.find_edge(v[2], v[0]), Some(e02));
        assert_eq!(mesh.find_edge(v[0], v[3]), Some(e30));
        assert_eq!(mesh.find_edge(v[1], v[2]), None);
        assert_eq!(mesh.find_edge(v[0], v[4]), None);
        assert_eq!(mesh.find_edge(v[0], v[0]), None);
    }

    #[test]
    fn test_find_edge_high_degree_hub() {
        let mut mesh = BrepMesh::<u32>::new();
        let hub = mesh.add_vertex();
        let spokes: Vec<_> = (0..32).map(|_| mesh.add_vertex()).collect();
        let edges: Vec<_> = spokes
            .iter()
            .map(|&s| mesh.add_edge(hub, s).unwrap())
            .collect();

        for (&s, &e) in spokes.iter().zip(&edges) {
            assert_eq!(mesh.find_edge(hub, s), Some(e));
            assert_eq!(mesh.find_edge(s, hub), Some(e));
        }
    }

    #[test]
    fn test_remove_wire_edge_moves_last() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..3).map(|_| mesh.add_vertex()).collect();
        let e01 = mesh.add_edge(v[0], v[1]).unwrap();
        mesh.add_edge(v[1], v[2]).unwrap();
        mesh.add_edge(v[2], v[0]).unwrap();

        mesh.remove_edge(e01);

        assert_eq!(mesh.num_edges(), 2);
        assert_eq!(mesh.find_edge(v[0], v[1]), None);
        // (2, 0) moved into slot 0
        assert_eq!(mesh.find_edge(v[2], v[0]), Some(EdgeId::new(0)));
        assert_eq!(mesh.vertices()[v[0]].degree(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_edge_removes_faces() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[2], v[3]]).unwrap();
        let diagonal = mesh.find_edge(v[0], v[2]).unwrap();

        mesh.remove_edge(diagonal);

        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_loops(), 0);
        assert_eq!(mesh.num_edges(), 4);
        assert!(mesh.edges().iter().all(|(_, e)| e.is_wire()));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_clear_edges_keeps_vertices() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..3).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();

        mesh.clear_edges();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.vertices().iter().all(|(_, v)| v.is_isolated()));
        assert!(mesh.is_valid());
    }
}
