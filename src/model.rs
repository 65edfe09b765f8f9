//! Items and the ordered in-memory restaurant list.
//!
//! The list carries no persistence logic. The lifecycle host replaces it on
//! load and hands it to the store on save; everything in between is plain
//! in-memory mutation by position.

use serde::Serialize;
use std::collections::BTreeSet;
use thiserror::Error;
use uuid::Uuid;

use crate::generate_item_id;

/// Error type for list mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("index {index} is out of range (list has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("restaurant name cannot be empty")]
    EmptyLabel,
}

/// One restaurant entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    /// Session-local identity, regenerated on every load.
    pub id: Uuid,
    /// Free-text label shown in the list.
    pub short_disc: String,
}

impl Item {
    /// Create an item with a fresh identity.
    pub fn new(short_disc: impl Into<String>) -> Self {
        Self {
            id: generate_item_id(),
            short_disc: short_disc.into(),
        }
    }
}

/// Ordered, mutable list of items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListModel {
    items: Vec<Item>,
}

impl ListModel {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item as-is. Label validation is the caller's business.
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Append a new item built from `label`.
    pub fn add(&mut self, label: impl Into<String>) -> Result<&Item, ModelError> {
        let label = label.into();
        if label.is_empty() {
            return Err(ModelError::EmptyLabel);
        }
        self.items.push(Item::new(label));
        let last = self.items.len() - 1;
        Ok(&self.items[last])
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<Item, ModelError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Remove every item whose index appears in `indices`.
    ///
    /// Duplicate indices are ignored. If any index is out of range nothing is
    /// removed. Returns the removed items in list order.
    pub fn remove_at_offsets<I>(&mut self, indices: I) -> Result<Vec<Item>, ModelError>
    where
        I: IntoIterator<Item = usize>,
    {
        let offsets: BTreeSet<usize> = indices.into_iter().collect();
        if let Some(&max) = offsets.iter().next_back() {
            self.check_index(max)?;
        }

        let mut removed = Vec::with_capacity(offsets.len());
        for index in offsets.into_iter().rev() {
            removed.push(self.items.remove(index));
        }
        removed.reverse();
        Ok(removed)
    }

    /// Replace the label of the item at `index`, keeping its identity.
    pub fn update_label(
        &mut self,
        index: usize,
        label: impl Into<String>,
    ) -> Result<&Item, ModelError> {
        let label = label.into();
        if label.is_empty() {
            return Err(ModelError::EmptyLabel);
        }
        self.check_index(index)?;
        let item = &mut self.items[index];
        item.short_disc = label;
        Ok(item)
    }

    /// Replace the whole list.
    pub fn replace_all(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Labels in list order.
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.short_disc.as_str()).collect()
    }

    fn check_index(&self, index: usize) -> Result<(), ModelError> {
        if index >= self.items.len() {
            return Err(ModelError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        Ok(())
    }
}

impl From<Vec<Item>> for ListModel {
    fn from(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl<'a> IntoIterator for &'a ListModel {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
