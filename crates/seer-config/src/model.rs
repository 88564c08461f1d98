//! Deployed model connection settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Session-info probe timeout, in seconds.
const fn default_connect_timeout_secs() -> u64 {
    3
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Task id of the deployed model session to connect to.
    #[serde(default)]
    pub session_id: Option<u64>,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl ModelConfig {
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.session_id.is_some()
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            session_id: None,
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
