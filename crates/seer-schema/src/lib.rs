//! # seer-schema
//!
//! Merges a model's vocabulary into a project's vocabulary and rewrites the
//! model's predictions against the merged result.
//!
//! - [`reconcile`] resolves every model class and tag to an existing project
//!   item or a new one, suffixing names on semantic collisions.
//! - [`transform`] filters a prediction to the kept classes/tags and swaps
//!   each definition for its resolved counterpart.
//!
//! Both are pure: they never touch storage and never mutate their inputs.

mod error;
mod mapping;
mod reconcile;
mod suffix;
mod transform;

pub use error::SchemaError;
pub use mapping::{Mapping, NameMapping};
pub use reconcile::{Reconciliation, SuffixPolicy, reconcile, reconcile_items};
pub use suffix::{generate, suffixed_name};
pub use transform::transform;
