//! Vocabulary reconciliation settings.

use serde::{Deserialize, Serialize};

fn default_suffix() -> String {
    "model".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReconcileConfig {
    /// Appended to model class/tag names that clash with project ones.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Suffix model names even when the plain name is free.
    #[serde(default)]
    pub force_suffix: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            force_suffix: false,
        }
    }
}
