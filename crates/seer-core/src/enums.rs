//! Geometry kinds, tag value types, and the apply state machine.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! `ApplyStage` provides `allowed_next_states()` so the orchestrator can
//! refuse an out-of-order transition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// GeometryKind
// ---------------------------------------------------------------------------

/// Shape discriminator of a class definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Rectangle,
    Polygon,
    Polyline,
    Point,
    Bitmap,
    GraphNodes,
    Cuboid,
    AnyShape,
}

impl GeometryKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Polygon => "polygon",
            Self::Polyline => "polyline",
            Self::Point => "point",
            Self::Bitmap => "bitmap",
            Self::GraphNodes => "graph_nodes",
            Self::Cuboid => "cuboid",
            Self::AnyShape => "any_shape",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TagValueType
// ---------------------------------------------------------------------------

/// Value type of a tag definition.
///
/// `OneOf` carries its allowed values; two enumerations are the same kind
/// only when their value lists match exactly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TagValueType {
    None,
    AnyString,
    AnyNumber,
    OneOf { values: Vec<String> },
}

impl TagValueType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::AnyString => "any_string",
            Self::AnyNumber => "any_number",
            Self::OneOf { .. } => "one_of",
        }
    }
}

impl fmt::Display for TagValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ApplyStage
// ---------------------------------------------------------------------------

/// Stage of a single apply invocation.
///
/// ```text
/// idle → locked → invoking → reconciling → persisting → completed
///          │          │           │             │
///          └──────────┴───────────┴─────────────┴──────→ failed
/// invoking → completed   (prediction count ≠ 1, or superseded)
/// ```
///
/// `Completed` and `Failed` are both reached only after edit controls have
/// been re-enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplyStage {
    Idle,
    Locked,
    Invoking,
    Reconciling,
    Persisting,
    Completed,
    Failed,
}

impl ApplyStage {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle => &[Self::Locked],
            Self::Locked => &[Self::Invoking, Self::Failed],
            Self::Invoking => &[Self::Reconciling, Self::Completed, Self::Failed],
            Self::Reconciling => &[Self::Persisting, Self::Failed],
            Self::Persisting => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether edit controls are disabled while in this stage.
    #[must_use]
    pub const fn holds_lock(self) -> bool {
        matches!(
            self,
            Self::Locked | Self::Invoking | Self::Reconciling | Self::Persisting
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Locked => "locked",
            Self::Invoking => "invoking",
            Self::Reconciling => "reconciling",
            Self::Persisting => "persisting",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ApplyStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
