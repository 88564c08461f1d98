//! Reconciliation and transform error types.

use seer_core::CoreError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A name is empty, or refers to nothing in the vocabulary or mapping.
    #[error("{kind} lookup failed for '{name}'")]
    Lookup { kind: &'static str, name: String },

    /// The working vocabulary refused a resolved item.
    #[error("cannot insert {kind} '{name}': {source}")]
    Insert {
        kind: &'static str,
        name: String,
        #[source]
        source: CoreError,
    },
}
