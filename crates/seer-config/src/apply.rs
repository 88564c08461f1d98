//! Apply workflow toggles.

use serde::{Deserialize, Serialize};

const fn default_attach_frame_tags() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplyConfig {
    /// Discard results of an apply that was overtaken by a newer one.
    #[serde(default)]
    pub staleness_guard: bool,

    /// Attach retained frame-level tags to the target frame.
    #[serde(default = "default_attach_frame_tags")]
    pub attach_frame_tags: bool,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            staleness_guard: false,
            attach_frame_tags: default_attach_frame_tags(),
        }
    }
}
