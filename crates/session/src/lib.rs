//! `docforge-session` — the editing session behind the document generator.
//!
//! Owns one instance of each document, turns form input into commands, and
//! drives exports without ever mutating document state.

pub mod artifact;
pub mod config;
pub mod edit;
pub mod error;
pub mod session;

pub use artifact::{ExportArtifact, ExportOutcome};
pub use config::SessionConfig;
pub use edit::{DocumentType, EditEvent, UiAction};
pub use error::SessionError;
pub use session::Session;
