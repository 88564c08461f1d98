//! # seer-core
//!
//! Core types shared across all seer crates.
//!
//! This crate provides the foundational vocabulary model:
//! - Class and tag definitions with name-independent semantic equality
//! - Keyed schema collections and the project vocabulary
//! - Prediction annotations (labels, geometry, tags) as returned by a model
//! - Job access scopes and the selection context of a labeling session
//! - The apply state machine enum
//! - Cross-cutting error types

pub mod annotation;
pub mod collection;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod schema;
pub mod scope;
pub mod vocabulary;

pub use annotation::{Geometry, Label, PredictionAnnotation, Tag, TagValue};
pub use collection::SchemaCollection;
pub use enums::{ApplyStage, GeometryKind, TagValueType};
pub use errors::CoreError;
pub use ids::SessionContext;
pub use schema::{ClassDef, SchemaItem, TagDef};
pub use scope::{AccessScope, JobInfo};
pub use vocabulary::{KeepSet, Vocabulary};
