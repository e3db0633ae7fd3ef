//! Ordered line-item collection keyed by [`ItemId`].

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::ItemId;

/// Ordered collection of line items.
///
/// Insertion order is display- and export-significant and is preserved across
/// edits. Positions are only used to *resolve* an item; once resolved, all
/// mutation goes through the item's identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemList<T> {
    items: Vec<T>,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> ItemList<T>
where
    T: Entity<Id = ItemId>,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Resolve a position to the identifier of the item currently there.
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.items.get(index).map(|item| *item.id())
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Remove by identifier, shifting later items down (order preserved).
    pub fn remove(&mut self, id: &ItemId) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut T> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}

impl<'a, T> IntoIterator for &'a ItemList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
