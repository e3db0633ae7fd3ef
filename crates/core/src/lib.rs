//! `docforge-core` — building blocks shared by every document type.
//!
//! This crate contains **pure domain** primitives (no IO, no rendering).

pub mod aggregate;
pub mod calendar;
pub mod coerce;
pub mod command;
pub mod entity;
pub mod error;
pub mod fields;
pub mod id;
pub mod issuer;
pub mod items;
pub mod money;

pub use aggregate::{Aggregate, AggregateRoot};
pub use command::{DocumentCommand, DocumentEvent};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, ItemId};
pub use issuer::IssuerProfile;
pub use items::ItemList;
