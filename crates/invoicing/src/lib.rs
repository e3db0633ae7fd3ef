//! Invoicing documents: the delivery note ("nota de entrega").
//!
//! Pure domain logic only: no IO, no rendering.

pub mod delivery_note;

pub use delivery_note::{
    DeliveryNote, DeliveryNoteCommand, DeliveryNoteEvent, DeliveryNoteField, DeliveryNoteHeader,
    DeliveryNoteHeaderChange, DeliveryNoteItem, DeliveryNoteItemChange, DeliveryNoteItemField,
};
