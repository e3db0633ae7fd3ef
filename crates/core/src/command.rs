//! Command and event shapes shared by every document aggregate.
//!
//! All four document types expose the same mutation surface: add an item,
//! remove an item by position, update one item field, set one header field.
//! Only the field identifiers and the typed changes differ, so the shapes are
//! generic over them.

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// Intent coming from the form: raw, uncoerced text for field updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentCommand<H, F> {
    /// Append a new item with type-specific defaults.
    AddItem,
    /// Remove the item at `index`; out of range is a no-op.
    RemoveItem { index: usize },
    /// Set one field of the item at `index` from raw input.
    UpdateItem { index: usize, field: F, value: String },
    /// Set one header field from raw input.
    SetHeaderField { field: H, value: String },
}

/// Accepted change, with raw input already coerced into typed values.
///
/// - `I`: the line item type
/// - `HC`: typed header change
/// - `IC`: typed item change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DocumentEvent<I, HC, IC> {
    ItemAdded(I),
    ItemRemoved { item_id: ItemId },
    ItemChanged { item_id: ItemId, change: IC },
    HeaderChanged(HC),
}

impl<I, HC, IC> DocumentEvent<I, HC, IC> {
    /// Stable event name, used in logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            DocumentEvent::ItemAdded(_) => "document.item.added",
            DocumentEvent::ItemRemoved { .. } => "document.item.removed",
            DocumentEvent::ItemChanged { .. } => "document.item.changed",
            DocumentEvent::HeaderChanged(_) => "document.header.changed",
        }
    }
}
