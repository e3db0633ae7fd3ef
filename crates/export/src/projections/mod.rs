//! Per-document projections into [`DocumentPayload`].
//!
//! Projections are pure: they read the aggregate's current state and its
//! derived values, and never mutate it.

use chrono::NaiveDate;

use crate::payload::DocumentPayload;

pub mod delivery_note;
pub mod quotation;
pub mod statement;
pub mod warehouse_receipt;

/// A document that can be snapshotted for export.
///
/// `as_of` is the session's "today"; it resolves date-relative values such
/// as statement aging.
pub trait Project {
    fn project(&self, as_of: NaiveDate) -> DocumentPayload;
}

pub fn project<D: Project>(document: &D, as_of: NaiveDate) -> DocumentPayload {
    document.project(as_of)
}

/// Keep non-empty lines only.
pub(crate) fn present<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    lines
        .into_iter()
        .map(Into::into)
        .filter(|line: &String| !line.trim().is_empty())
        .collect()
}

/// `"{label}{value}"` when `value` is non-empty.
pub(crate) fn labelled(label: &str, value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| format!("{label}{value}"))
}
