//! Faces: closed cycles of loops.
//!
//! Faces are built from a vertex sequence. Consecutive vertices are joined by
//! an existing edge when one is found and by a new edge otherwise, so faces
//! that share a side share the edge object. Each corner becomes a loop linked
//! into both the edge's loop cycle and the face's loop cycle.

use super::brep::BrepMesh;
use super::container::Element;
use super::index::{EdgeId, FaceId, LoopId, MeshIndex, VertexId};
use super::loops::{Cycle, Loop, LoopList};

/// A face of a B-rep mesh.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    pub(crate) loops: LoopList<I>,
}

impl<I: MeshIndex> Default for Face<I> {
    fn default() -> Self {
        Self {
            loops: LoopList::default(),
        }
    }
}

impl<I: MeshIndex> Face<I> {
    /// The corners of this face in winding order.
    #[inline]
    pub fn loops(&self) -> &LoopList<I> {
        &self.loops
    }

    /// Number of corners (equal to the number of boundary edges).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.loops.len
    }
}

impl<I: MeshIndex> Element for Face<I> {
    type Id = FaceId<I>;
}

impl<I: MeshIndex> BrepMesh<I> {
    /// Add a face bounded by `vertices`, in winding order.
    ///
    /// Returns `None`, leaving the mesh untouched, if fewer than three
    /// vertices are given or two cyclically consecutive vertices are equal.
    /// Missing edges are created; existing edges are shared.
    ///
    /// Corner `i` of the new face starts at `vertices[i]` and runs along the
    /// edge to `vertices[(i + 1) % n]`.
    pub fn add_face(&mut self, vertices: &[VertexId<I>]) -> Option<FaceId<I>> {
        let n = vertices.len();
        if n < 3 {
            return None;
        }
        if (0..n).any(|i| vertices[i] == vertices[(i + 1) % n]) {
            return None;
        }

        let mut edges: Vec<EdgeId<I>> = Vec::with_capacity(n);
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let e = match self.find_edge(a, b) {
                Some(e) => e,
                None => self.add_edge(a, b)?,
            };
            edges.push(e);
        }

        let f = self.faces.push(Face::default());
        for (&v, &e) in vertices.iter().zip(&edges) {
            let l = self.loops.push(Loop::new(v, e, f));
            self.edges
                .get_mut(e)
                .loops
                .push_back(&mut self.loops, l, Cycle::Edge);
            self.faces
                .get_mut(f)
                .loops
                .push_back(&mut self.loops, l, Cycle::Face);
        }
        Some(f)
    }

    /// Remove a face and its loops. Edges and vertices are kept.
    ///
    /// The last face moves into the freed slot, and removing each loop moves
    /// the last loop; see [`remove_vertex`] for the id invalidation rule.
    ///
    /// [`remove_vertex`]: BrepMesh::remove_vertex
    pub fn remove_face(&mut self, f: FaceId<I>) {
        // Loop removal renumbers loops, so take the current head each time.
        while let Some(l) = self.faces[f].loops.front() {
            let e = self.loops[l].edge;
            self.edges
                .get_mut(e)
                .loops
                .remove(&mut self.loops, l, Cycle::Edge);
            self.faces
                .get_mut(f)
                .loops
                .remove(&mut self.loops, l, Cycle::Face);

            if let Some(moved) = self.loops.swap_remove(l) {
                self.rename_loop(moved, l);
            }
        }

        if self.faces.swap_remove(f).is_some() {
            self.rename_face(f);
        }
    }

    /// Remove every face and loop. Edges and vertices are kept.
    pub fn clear_faces(&mut self) {
        while let Some(f) = self.faces.back() {
            self.remove_face(f);
        }
    }

    /// Flip the winding order of a face.
    ///
    /// Each loop takes the other endpoint of its edge as its vertex and its
    /// face links are swapped. Edges and loops are not reallocated, and
    /// reversing twice restores the original face.
    pub fn reverse_face(&mut self, f: FaceId<I>) {
        let loops: Vec<_> = self.face_loops(f).collect();
        for l in loops {
            let e = self.loops[l].edge;
            let other = self.edges[e].other_vertex(self.loops[l].vertex);

            let corner = self.loops.get_mut(l);
            corner.vertex = other;
            std::mem::swap(&mut corner.face_next, &mut corner.face_previous);
        }
    }

    /// Point the loops of a face that just moved into slot `to` at it.
    fn rename_face(&mut self, to: FaceId<I>) {
        let loops: Vec<_> = self.face_loops(to).collect();
        for l in loops {
            self.loops.get_mut(l).face = to;
        }
    }

    /// Rewrite references to a loop that moved from `from` to `to`.
    fn rename_loop(&mut self, from: LoopId<I>, to: LoopId<I>) {
        let rename = |id: LoopId<I>| if id == from { to } else { id };

        let corner = {
            let corner = self.loops.get_mut(to);
            corner.edge_next = rename(corner.edge_next);
            corner.edge_previous = rename(corner.edge_previous);
            corner.face_next = rename(corner.face_next);
            corner.face_previous = rename(corner.face_previous);
            *corner
        };

        self.loops.get_mut(corner.edge_previous).edge_next = to;
        self.loops.get_mut(corner.edge_next).edge_previous = to;
        self.loops.get_mut(corner.face_previous).face_next = to;
        self.loops.get_mut(corner.face_next).face_previous = to;

        self.edges.get_mut(corner.edge).loops.rename(from, to);
        self.faces.get_mut(corner.face).loops.rename(from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_mesh() -> (BrepMesh<u32>, Vec<VertexId>) {
        let mut mesh = BrepMesh::new();
        let v: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
        (mesh, v)
    }

    fn rotation_of(walk: &[VertexId], expected: &[VertexId]) -> bool {
        let n = expected.len();
        walk.len() == n
            && (0..n).any(|shift| (0..n).all(|i| walk[i] == expected[(i + shift) % n]))
    }

    #[test]
    fn test_degenerate_faces_rejected() {
        let (mut mesh, v) = quad_mesh();

        assert_eq!(mesh.add_face(&[]), None);
        assert_eq!(mesh.add_face(&[v[0], v[1]]), None);
        assert_eq!(mesh.add_face(&[v[0], v[1], v[1]]), None);
        assert_eq!(mesh.add_face(&[v[0], v[1], v[2], v[0]]), None);

        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_edges(), 0);
        assert_eq!(mesh.num_loops(), 0);
    }

    #[test]
    fn test_face_cycle_closure() {
        let (mut mesh, v) = quad_mesh();
        let f = mesh.add_face(&v).unwrap();

        let n = mesh.faces()[f].vertex_count();
        assert_eq!(n, 4);

        let start = mesh.faces()[f].loops().front().unwrap();
        let mut l = start;
        let mut walk = Vec::new();
        for _ in 0..n {
            walk.push(mesh.loops()[l].vertex());
            l = mesh.loops()[l].face_next();
        }
        assert_eq!(l, start);
        assert!(rotation_of(&walk, &v));
    }

    #[test]
    fn test_loop_vertex_on_its_edge() {
        let (mut mesh, v) = quad_mesh();
        let f = mesh.add_face(&v).unwrap();

        for l in mesh.face_loops(f) {
            let corner = &mesh.loops()[l];
            let edge = &mesh.edges()[corner.edge()];
            assert!(edge.has_vertex(corner.vertex()));
            let next = &mesh.loops()[corner.face_next()];
            assert_eq!(edge.other_vertex(corner.vertex()), next.vertex());
        }
    }

    #[test]
    fn test_shared_edge() {
        let (mut mesh, v) = quad_mesh();
        let f0 = mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        let f1 = mesh.add_face(&[v[0], v[2], v[3]]).unwrap();

        assert_eq!(mesh.num_edges(), 5);
        let diagonal = mesh.find_edge(v[2], v[0]).unwrap();
        let faces: Vec<_> = mesh
            .edge_loops(diagonal)
            .map(|l| mesh.loops()[l].face())
            .collect();
        assert_eq!(faces, vec![f0, f1]);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_non_manifold_edge() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..5).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[1], v[0], v[3]]).unwrap();
        mesh.add_face(&[v[0], v[1], v[4]]).unwrap();

        let e = mesh.find_edge(v[0], v[1]).unwrap();
        assert_eq!(mesh.edges()[e].loops().len(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_face_keeps_edges() {
        let (mut mesh, v) = quad_mesh();
        let f0 = mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        let f1 = mesh.add_face(&[v[0], v[2], v[3]]).unwrap();

        mesh.remove_face(f0);

        // f1 moved into slot 0
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_loops(), 3);
        assert_eq!(mesh.num_edges(), 5);
        let moved = FaceId::new(0);
        assert_ne!(f1, moved);
        assert!(rotation_of(
            &mesh.face_vertices(moved).collect::<Vec<_>>(),
            &[v[0], v[2], v[3]]
        ));
        let e01 = mesh.find_edge(v[0], v[1]).unwrap();
        assert!(mesh.edges()[e01].is_wire());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_face_with_interleaved_loops() {
        let mut mesh = BrepMesh::<u32>::new();
        let v: Vec<_> = (0..6).map(|_| mesh.add_vertex()).collect();
        let fans: Vec<_> = (1..5)
            .map(|i| mesh.add_face(&[v[0], v[i], v[i + 1]]).unwrap())
            .collect();

        mesh.remove_face(fans[1]);
        assert_eq!(mesh.num_faces(), 3);
        assert_eq!(mesh.num_loops(), 9);
        assert!(mesh.is_valid());

        mesh.remove_face(FaceId::new(0));
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.num_loops(), 6);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_reverse_face() {
        let (mut mesh, v) = quad_mesh();
        let f = mesh.add_face(&v).unwrap();

        mesh.reverse_face(f);
        let walk: Vec<_> = mesh.face_vertices(f).collect();
        let reversed = [v[3], v[2], v[1], v[0]];
        assert!(rotation_of(&walk, &reversed));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let (mut mesh, v) = quad_mesh();
        let f = mesh.add_face(&v).unwrap();
        let before: Vec<_> = mesh
            .face_loops(f)
            .map(|l| {
                let c = mesh.loops()[l];
                (l, c.vertex(), c.face_next(), c.face_previous())
            })
            .collect();

        mesh.reverse_face(f);
        mesh.reverse_face(f);

        let after: Vec<_> = mesh
            .face_loops(f)
            .map(|l| {
                let c = mesh.loops()[l];
                (l, c.vertex(), c.face_next(), c.face_previous())
            })
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_clear_faces() {
        let (mut mesh, v) = quad_mesh();
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[2], v[3]]).unwrap();

        mesh.clear_faces();

        assert_eq!(mesh.num_faces(), 0);
        assert_eq!(mesh.num_loops(), 0);
        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());
    }
}
