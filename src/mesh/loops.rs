//! Loops and the two loop cycles.
//!
//! A loop is one corner of a face's boundary walk. Every loop is threaded
//! through two intrusive circular doubly-linked lists at once:
//!
//! - the **edge cycle** (`edge_next` / `edge_previous`), holding every loop
//!   that runs along the same edge (one per face using the edge), and
//! - the **face cycle** (`face_next` / `face_previous`), holding the corners of
//!   one face in winding order.
//!
//! Both cycles are described by a [`LoopList`] (head plus explicit length)
//! stored in the owning edge or face.

use super::container::{Element, ElementContainer};
use super::index::{EdgeId, FaceId, LoopId, MeshIndex, VertexId};

/// One corner of a face.
#[derive(Debug, Clone, Copy)]
pub struct Loop<I: MeshIndex = u32> {
    pub(crate) vertex: VertexId<I>,
    pub(crate) edge: EdgeId<I>,
    pub(crate) face: FaceId<I>,
    pub(crate) edge_next: LoopId<I>,
    pub(crate) edge_previous: LoopId<I>,
    pub(crate) face_next: LoopId<I>,
    pub(crate) face_previous: LoopId<I>,
}

impl<I: MeshIndex> Loop<I> {
    pub(crate) fn new(vertex: VertexId<I>, edge: EdgeId<I>, face: FaceId<I>) -> Self {
        Self {
            vertex,
            edge,
            face,
            edge_next: LoopId::invalid(),
            edge_previous: LoopId::invalid(),
            face_next: LoopId::invalid(),
            face_previous: LoopId::invalid(),
        }
    }

    /// The vertex at which this corner starts.
    #[inline]
    pub fn vertex(&self) -> VertexId<I> {
        self.vertex
    }

    /// The edge leaving this corner along the face boundary.
    #[inline]
    pub fn edge(&self) -> EdgeId<I> {
        self.edge
    }

    /// The face this corner belongs to.
    #[inline]
    pub fn face(&self) -> FaceId<I> {
        self.face
    }

    /// Next loop along the same edge.
    #[inline]
    pub fn edge_next(&self) -> LoopId<I> {
        self.edge_next
    }

    /// Previous loop along the same edge.
    #[inline]
    pub fn edge_previous(&self) -> LoopId<I> {
        self.edge_previous
    }

    /// Next corner of the face.
    #[inline]
    pub fn face_next(&self) -> LoopId<I> {
        self.face_next
    }

    /// Previous corner of the face.
    #[inline]
    pub fn face_previous(&self) -> LoopId<I> {
        self.face_previous
    }

    #[inline]
    pub(crate) fn next(&self, cycle: Cycle) -> LoopId<I> {
        match cycle {
            Cycle::Edge => self.edge_next,
            Cycle::Face => self.face_next,
        }
    }

    #[inline]
    pub(crate) fn previous(&self, cycle: Cycle) -> LoopId<I> {
        match cycle {
            Cycle::Edge => self.edge_previous,
            Cycle::Face => self.face_previous,
        }
    }

    #[inline]
    fn set_next(&mut self, cycle: Cycle, id: LoopId<I>) {
        match cycle {
            Cycle::Edge => self.edge_next = id,
            Cycle::Face => self.face_next = id,
        }
    }

    #[inline]
    fn set_previous(&mut self, cycle: Cycle, id: LoopId<I>) {
        match cycle {
            Cycle::Edge => self.edge_previous = id,
            Cycle::Face => self.face_previous = id,
        }
    }
}

impl<I: MeshIndex> Element for Loop<I> {
    type Id = LoopId<I>;
}

/// Which pair of links a loop-list operation threads through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Cycle {
    Edge,
    Face,
}

/// Head and length of a circular loop list.
#[derive(Debug, Clone, Copy)]
pub struct LoopList<I: MeshIndex = u32> {
    pub(crate) head: LoopId<I>,
    pub(crate) len: usize,
}

impl<I: MeshIndex> Default for LoopList<I> {
    fn default() -> Self {
        Self {
            head: LoopId::invalid(),
            len: 0,
        }
    }
}

impl<I: MeshIndex> LoopList<I> {
    /// The first loop, if any.
    #[inline]
    pub fn front(&self) -> Option<LoopId<I>> {
        (self.len > 0).then_some(self.head)
    }

    /// Number of loops.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no loops.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append `id` to the list, splicing it in before the head.
    pub(crate) fn push_back(
        &mut self,
        loops: &mut ElementContainer<Loop<I>>,
        id: LoopId<I>,
        cycle: Cycle,
    ) {
        if self.len == 0 {
            let l = loops.get_mut(id);
            l.set_next(cycle, id);
            l.set_previous(cycle, id);
            self.head = id;
        } else {
            let head = self.head;
            let tail = loops[head].previous(cycle);
            loops.get_mut(tail).set_next(cycle, id);
            {
                let l = loops.get_mut(id);
                l.set_previous(cycle, tail);
                l.set_next(cycle, head);
            }
            loops.get_mut(head).set_previous(cycle, id);
        }
        self.len += 1;
    }

    /// Unlink `id` from the list.
    pub(crate) fn remove(
        &mut self,
        loops: &mut ElementContainer<Loop<I>>,
        id: LoopId<I>,
        cycle: Cycle,
    ) {
        if self.len == 1 {
            self.head = LoopId::invalid();
            self.len = 0;
            return;
        }

        let next = loops[id].next(cycle);
        let previous = loops[id].previous(cycle);
        loops.get_mut(previous).set_next(cycle, next);
        loops.get_mut(next).set_previous(cycle, previous);
        if self.head == id {
            self.head = next;
        }
        self.len -= 1;
    }

    /// Point references to `from` at `to` after a loop moved slots.
    #[inline]
    pub(crate) fn rename(&mut self, from: LoopId<I>, to: LoopId<I>) {
        if self.len > 0 && self.head == from {
            self.head = to;
        }
    }
}

/// Iterator over the loops of one cycle.
pub struct LoopIter<'a, I: MeshIndex = u32> {
    loops: &'a ElementContainer<Loop<I>>,
    current: LoopId<I>,
    remaining: usize,
    cycle: Cycle,
}

impl<'a, I: MeshIndex> LoopIter<'a, I> {
    pub(crate) fn new(
        loops: &'a ElementContainer<Loop<I>>,
        list: &LoopList<I>,
        cycle: Cycle,
    ) -> Self {
        Self {
            loops,
            current: list.head,
            remaining: list.len,
            cycle,
        }
    }
}

impl<'a, I: MeshIndex> Iterator for LoopIter<'a, I> {
    type Item = LoopId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let result = self.current;
        self.current = self.loops[result].next(self.cycle);
        self.remaining -= 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, I: MeshIndex> ExactSizeIterator for LoopIter<'a, I> {}
