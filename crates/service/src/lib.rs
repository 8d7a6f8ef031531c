//! Service layer for the translation read API.
//! - `store`: read-only record store abstraction and its backends.
//! - `translation`: query rules (scan vs lookup, not-found policy).
//! - Clear error types shared with the HTTP layer.

pub mod errors;
pub mod store;
pub mod translation;

pub use translation::{QueryOutcome, TranslationService};
