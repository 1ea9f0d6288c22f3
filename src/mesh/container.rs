//! Dense element storage.
//!
//! Each element kind lives in an [`ElementContainer`]: a `Vec` whose positions
//! are the element ids, plus the kind's [`AttributeMap`]. Appending assigns
//! the next index. Removal moves the last element into the freed slot, which
//! keeps indices contiguous for the attribute arrays. The mesh rewrites every
//! reference to the moved element.

use std::ops::Index;

use super::attribute::AttributeMap;
use super::index::ElementId;

/// An element stored in an [`ElementContainer`].
pub trait Element: Clone {
    /// The id type addressing this element kind.
    type Id: ElementId;
}

/// Dense, index-addressable storage for one element kind.
#[derive(Debug, Clone)]
pub struct ElementContainer<T: Element> {
    elements: Vec<T>,
    attributes: AttributeMap,
}

impl<T: Element> Default for ElementContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Element> ElementContainer<T> {
    pub(crate) fn new() -> Self {
        Self {
            elements: Vec::new(),
            attributes: AttributeMap::new(),
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            attributes: AttributeMap::new(),
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the container holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Check whether an id refers to a live element.
    #[inline]
    pub fn contains(&self, id: T::Id) -> bool {
        id.to_index() < self.elements.len()
    }

    /// Get an element by id.
    #[inline]
    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.elements.get(id.to_index())
    }

    /// Id of the first element.
    #[inline]
    pub fn front(&self) -> Option<T::Id> {
        (!self.elements.is_empty()).then(|| T::Id::from_index(0))
    }

    /// Id of the last element.
    #[inline]
    pub fn back(&self) -> Option<T::Id> {
        self.elements.len().checked_sub(1).map(T::Id::from_index)
    }

    /// Iterate over all ids in index order.
    pub fn ids(&self) -> impl Iterator<Item = T::Id> + '_ {
        (0..self.elements.len()).map(T::Id::from_index)
    }

    /// Iterate over all elements with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (T::Id, &T)> + '_ {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (T::Id::from_index(i), e))
    }

    /// Per-element attributes.
    #[inline]
    pub fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }

    /// Per-element attributes, for modification.
    #[inline]
    pub fn attributes_mut(&mut self) -> &mut AttributeMap {
        &mut self.attributes
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: T::Id) -> &mut T {
        &mut self.elements[id.to_index()]
    }

    /// Append an element and one fill value per attribute.
    pub(crate) fn push(&mut self, element: T) -> T::Id {
        let id = T::Id::from_index(self.elements.len());
        self.attributes.push_element();
        self.elements.push(element);
        id
    }

    /// Remove an element by moving the last element into its slot.
    ///
    /// Returns the previous id of the moved element, or `None` if the removed
    /// element was the last one.
    pub(crate) fn swap_remove(&mut self, id: T::Id) -> Option<T::Id> {
        let index = id.to_index();
        let last = self.elements.len() - 1;
        self.attributes.swap_remove_element(index);
        self.elements.swap_remove(index);
        (index != last).then(|| T::Id::from_index(last))
    }
}

impl<T: Element> Index<T::Id> for ElementContainer<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: T::Id) -> &T {
        &self.elements[id.to_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    #[derive(Debug, Clone, PartialEq)]
    struct Tag(u8);

    impl Element for Tag {
        type Id = VertexId;
    }

    #[test]
    fn test_push_assigns_dense_ids() {
        let mut c = ElementContainer::new();
        let a = c.push(Tag(1));
        let b = c.push(Tag(2));

        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(c.len(), 2);
        assert_eq!(c.front(), Some(a));
        assert_eq!(c.back(), Some(b));
    }

    #[test]
    fn test_swap_remove_moves_last() {
        let mut c = ElementContainer::new();
        let ids: Vec<VertexId> = (0..4).map(|i| c.push(Tag(i))).collect();
        c.attributes_mut()
            .emplace("tag", 0u8)
            .unwrap()
            .as_mut_slice()
            .copy_from_slice(&[0, 1, 2, 3]);

        let moved = c.swap_remove(ids[1]);
        assert_eq!(moved, Some(VertexId::new(3)));
        assert_eq!(c[ids[1]], Tag(3));
        let tags = c.attributes().get::<u8>("tag").unwrap();
        assert_eq!(tags.as_slice(), &[0, 3, 2]);

        assert_eq!(c.swap_remove(VertexId::new(2)), None);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_empty_container() {
        let c: ElementContainer<Tag> = ElementContainer::new();
        assert!(c.is_empty());
        assert_eq!(c.front(), None);
        assert_eq!(c.back(), None);
        assert!(!c.contains(VertexId::new(0)));
    }
}
