//! Cross-cutting error types for seer.
//!
//! Domain-specific errors (`SchemaError`, `ApplyError`) live in their
//! respective crates and wrap `CoreError` where a vocabulary operation fails.

use thiserror::Error;

/// Errors raised by vocabulary and collection operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A schema item name is empty after trimming.
    #[error("{kind} name is empty")]
    EmptyName { kind: &'static str },

    /// An insert targeted a name that is already taken.
    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },
}
