//! Named per-element attributes.
//!
//! Every element container owns an [`AttributeMap`]: a set of named, typed
//! arrays that run parallel to the container. Slot `i` of each array belongs
//! to the element with index `i`. The container keeps the arrays in lock-step
//! with its own growth and shrinkage, so attribute values follow their element
//! when removal moves it to a new index.
//!
//! Attributes are looked up by name at runtime. Collaborators should not
//! assume a fixed schema; they check with [`AttributeMap::contains`] or create
//! on demand with [`AttributeMap::try_emplace`].
//!
//! # Example
//!
//! ```
//! use brep::prelude::*;
//! use nalgebra::Vector3;
//!
//! let mut mesh: BrepMesh = BrepMesh::new();
//! let v = mesh.add_vertex();
//!
//! let (normals, created) = mesh
//!     .vertices_mut()
//!     .attributes_mut()
//!     .try_emplace(NORMAL, Vector3::<f64>::zeros())
//!     .unwrap();
//! assert!(created);
//! normals[v] = Vector3::z();
//!
//! let normals = mesh.vertices().attributes().get::<Vector3<f64>>(NORMAL).unwrap();
//! assert_eq!(normals[v], Vector3::z());
//! ```

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use super::index::ElementId;
use crate::error::{MeshError, Result};

/// Vertex position attribute name (`Point3<f64>`).
pub const POSITION: &str = "position";

/// Vertex or face normal attribute name (`Vector3<f64>`).
pub const NORMAL: &str = "normal";

/// Loop barycentric coordinate attribute name (`Vector3<f64>`).
pub const BARYCENTRIC: &str = "barycentric";

/// Type-erased storage shared by all attributes of a map.
pub(crate) trait AttributeStorage: Send + Sync {
    fn len(&self) -> usize;
    fn push_fill(&mut self);
    fn swap_remove(&mut self, index: usize);
    fn clone_boxed(&self) -> Box<dyn AttributeStorage>;
    fn value_type(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A named array holding one value of type `T` per element.
#[derive(Debug, Clone)]
pub struct Attribute<T> {
    name: String,
    values: Vec<T>,
    fill: T,
}

impl<T: Clone> Attribute<T> {
    fn new(name: &str, len: usize, fill: T) -> Self {
        Self {
            name: name.to_owned(),
            values: vec![fill.clone(); len],
            fill,
        }
    }

    /// The attribute's name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values (equal to the owning container's element count).
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the attribute holds no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value assigned to elements created after the attribute.
    #[inline]
    pub fn fill(&self) -> &T {
        &self.fill
    }

    /// Get the value of an element, if the id is in range.
    #[inline]
    pub fn get<K: ElementId>(&self, id: K) -> Option<&T> {
        self.values.get(id.to_index())
    }

    /// All values, ordered by element index.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// All values, ordered by element index.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Reset every value to `value`.
    pub fn fill_with(&mut self, value: T) {
        for v in &mut self.values {
            *v = value.clone();
        }
    }
}

impl<T, K: ElementId> Index<K> for Attribute<T> {
    type Output = T;

    #[inline]
    fn index(&self, id: K) -> &T {
        &self.values[id.to_index()]
    }
}

impl<T, K: ElementId> IndexMut<K> for Attribute<T> {
    #[inline]
    fn index_mut(&mut self, id: K) -> &mut T {
        &mut self.values[id.to_index()]
    }
}

impl<T: Clone + Send + Sync + 'static> AttributeStorage for Attribute<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn push_fill(&mut self) {
        self.values.push(self.fill.clone());
    }

    fn swap_remove(&mut self, index: usize) {
        self.values.swap_remove(index);
    }

    fn clone_boxed(&self) -> Box<dyn AttributeStorage> {
        Box::new(self.clone())
    }

    fn value_type(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Maps names to the attributes of one element kind.
#[derive(Default)]
pub struct AttributeMap {
    element_count: usize,
    attributes: HashMap<String, Box<dyn AttributeStorage>>,
}

impl AttributeMap {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of attributes.
    #[inline]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns `true` if there are no attributes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Number of elements each attribute covers.
    #[inline]
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Iterate over attribute names (in no particular order).
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.attributes.keys().map(String::as_str)
    }

    /// Check whether an attribute with the given name exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Create an attribute, replacing any existing attribute of the same name.
    ///
    /// Every existing element is assigned `fill`, as is every element added later.
    pub fn emplace<T>(&mut self, name: &str, fill: T) -> Result<&mut Attribute<T>>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.attributes.remove(name);
        self.try_emplace(name, fill).map(|(attribute, _)| attribute)
    }

    /// Get an attribute, creating it first if no attribute has the given name.
    ///
    /// The returned flag is `true` if the attribute was created. Fails with
    /// [`MeshError::AttributeType`] if the existing attribute stores another type.
    pub fn try_emplace<T>(&mut self, name: &str, fill: T) -> Result<(&mut Attribute<T>, bool)>
    where
        T: Clone + Send + Sync + 'static,
    {
        let created = !self.attributes.contains_key(name);
        let count = self.element_count;
        let slot = self
            .attributes
            .entry(name.to_owned())
            .or_insert_with(|| Box::new(Attribute::new(name, count, fill)));
        let attribute = slot
            .as_any_mut()
            .downcast_mut::<Attribute<T>>()
            .ok_or_else(|| type_error::<T>(name))?;
        Ok((attribute, created))
    }

    /// Get an attribute by name.
    pub fn get<T: 'static>(&self, name: &str) -> Result<&Attribute<T>> {
        let slot = self
            .attributes
            .get(name)
            .ok_or_else(|| MeshError::attribute_not_found(name))?;
        slot.as_any()
            .downcast_ref::<Attribute<T>>()
            .ok_or_else(|| type_error::<T>(name))
    }

    /// Get an attribute by name for modification.
    pub fn get_mut<T: 'static>(&mut self, name: &str) -> Result<&mut Attribute<T>> {
        let slot = self
            .attributes
            .get_mut(name)
            .ok_or_else(|| MeshError::attribute_not_found(name))?;
        slot.as_any_mut()
            .downcast_mut::<Attribute<T>>()
            .ok_or_else(|| type_error::<T>(name))
    }

    /// Remove an attribute. Returns `true` if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.attributes.remove(name).is_some()
    }

    /// Remove all attributes.
    pub fn clear(&mut self) {
        self.attributes.clear();
    }

    /// Check that every attribute covers exactly `element_count` elements.
    pub(crate) fn is_consistent(&self) -> bool {
        self.attributes
            .values()
            .all(|a| a.len() == self.element_count)
    }

    pub(crate) fn push_element(&mut self) {
        for attribute in self.attributes.values_mut() {
            attribute.push_fill();
        }
        self.element_count += 1;
    }

    pub(crate) fn swap_remove_element(&mut self, index: usize) {
        for attribute in self.attributes.values_mut() {
            attribute.swap_remove(index);
        }
        self.element_count -= 1;
    }
}

fn type_error<T>(name: &str) -> MeshError {
    MeshError::AttributeType {
        name: name.to_owned(),
        expected: type_name::<T>(),
    }
}

impl Clone for AttributeMap {
    fn clone(&self) -> Self {
        Self {
            element_count: self.element_count,
            attributes: self
                .attributes
                .iter()
                .map(|(name, attribute)| (name.clone(), attribute.clone_boxed()))
                .collect(),
        }
    }
}

impl fmt::Debug for AttributeMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, attribute) in &self.attributes {
            map.entry(name, &attribute.value_type());
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::VertexId;

    fn map_with(count: usize) -> AttributeMap {
        let mut map = AttributeMap::new();
        for _ in 0..count {
            map.push_element();
        }
        map
    }

    #[test]
    fn test_emplace_fills_existing_elements() {
        let mut map = map_with(3);
        let weights = map.emplace("weight", 1.5f64).unwrap();
        assert_eq!(weights.len(), 3);
        assert!(weights.as_slice().iter().all(|&w| w == 1.5));
    }

    #[test]
    fn test_emplace_replaces() {
        let mut map = map_with(2);
        let labels = map.emplace("label", 7u32).unwrap();
        labels[VertexId::<u32>::new(0)] = 9;
        let labels = map.emplace("label", 0u32).unwrap();
        assert_eq!(labels.as_slice(), &[0, 0]);
    }

    #[test]
    fn test_try_emplace_keeps_existing() {
        let mut map = map_with(2);
        let labels = map.emplace("label", 7u32).unwrap();
        labels[VertexId::<u32>::new(1)] = 3;

        let (labels, created) = map.try_emplace("label", 0u32).unwrap();
        assert!(!created);
        assert_eq!(labels.as_slice(), &[7, 3]);
    }

    #[test]
    fn test_type_mismatch() {
        let mut map = map_with(1);
        map.emplace("label", 7u32).unwrap();

        assert!(matches!(
            map.get::<f32>("label"),
            Err(MeshError::AttributeType { .. })
        ));
        assert!(matches!(
            map.try_emplace("label", 0.0f32),
            Err(MeshError::AttributeType { .. })
        ));
    }

    #[test]
    fn test_missing_attribute() {
        let map = map_with(1);
        assert!(!map.contains("position"));
        assert_eq!(
            map.get::<f64>("position").unwrap_err(),
            MeshError::attribute_not_found("position")
        );
    }

    #[test]
    fn test_lock_step_growth_and_removal() {
        let mut map = map_with(0);
        map.emplace("id", 0usize).unwrap();
        for i in 0..4 {
            map.push_element();
            map.get_mut::<usize>("id").unwrap().as_mut_slice()[i] = i;
        }

        map.swap_remove_element(1);
        assert_eq!(map.element_count(), 3);
        assert_eq!(map.get::<usize>("id").unwrap().as_slice(), &[0, 3, 2]);
        assert!(map.is_consistent());
    }

    #[test]
    fn test_clone_is_deep() {
        let mut map = map_with(2);
        map.emplace("value", 1i32).unwrap();

        let copy = map.clone();
        map.get_mut::<i32>("value").unwrap().fill_with(5);

        assert_eq!(copy.get::<i32>("value").unwrap().as_slice(), &[1, 1]);
        assert_eq!(map.get::<i32>("value").unwrap().as_slice(), &[5, 5]);
    }

    #[test]
    fn test_remove() {
        let mut map = map_with(1);
        map.emplace("value", 1i32).unwrap();
        assert!(map.remove("value"));
        assert!(!map.remove("value"));
        assert!(map.is_empty());
    }
}
