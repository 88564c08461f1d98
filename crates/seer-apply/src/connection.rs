//! Connection to a deployed model session.
//!
//! The model's vocabulary and default settings are fetched once on connect
//! and stay fixed until the connection is dropped; reconnecting replaces them.

use std::time::Duration;

use seer_core::ids::ModelSessionId;
use seer_core::{KeepSet, Vocabulary};

use crate::collaborators::{InferenceClient, SessionInfo};
use crate::error::{ConnectionError, InferenceError};

#[derive(Debug)]
pub struct ModelConnection<C> {
    session_id: ModelSessionId,
    client: C,
    info: SessionInfo,
    vocabulary: Vocabulary,
    default_settings: serde_json::Value,
}

impl<C: InferenceClient> ModelConnection<C> {
    /// Probe the session (bounded by `timeout`) and load its vocabulary and
    /// default inference settings.
    pub async fn connect(
        client: C,
        session_id: ModelSessionId,
        timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let info = match tokio::time::timeout(timeout, client.session_info()).await {
            Ok(Ok(info)) => info,
            Ok(Err(source)) => return Err(ConnectionError::Unreachable { session_id, source }),
            Err(_) => {
                return Err(ConnectionError::Unreachable {
                    session_id,
                    source: InferenceError::Timeout(timeout),
                });
            }
        };

        let vocabulary = client
            .model_vocabulary()
            .await
            .map_err(|source| ConnectionError::Vocabulary { session_id, source })?;

        let default_settings = match client.default_settings().await {
            Ok(settings) if !is_blank(&settings) => settings,
            Ok(_) => {
                tracing::info!(session_id, "model doesn't support custom inference settings");
                serde_json::Value::Object(serde_json::Map::new())
            }
            Err(error) => {
                tracing::warn!(session_id, %error, "couldn't load default inference settings");
                serde_json::Value::Object(serde_json::Map::new())
            }
        };

        tracing::info!(
            session_id,
            model = %info.model_name,
            classes = vocabulary.classes.len(),
            tags = vocabulary.tags.len(),
            "connected to model session"
        );

        Ok(Self {
            session_id,
            client,
            info,
            vocabulary,
            default_settings,
        })
    }
}

impl<C> ModelConnection<C> {
    #[must_use]
    pub const fn session_id(&self) -> ModelSessionId {
        self.session_id
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    #[must_use]
    pub const fn info(&self) -> &SessionInfo {
        &self.info
    }

    #[must_use]
    pub const fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub const fn default_settings(&self) -> &serde_json::Value {
        &self.default_settings
    }

    /// Every class and tag the model reports, the initial UI selection.
    #[must_use]
    pub fn default_selection(&self) -> KeepSet {
        self.vocabulary.keep_all()
    }

    /// Parse user-edited YAML settings, falling back to the model defaults
    /// when the text is blank or does not parse.
    #[must_use]
    pub fn settings_from_text(&self, text: &str) -> serde_json::Value {
        if text.trim().is_empty() {
            return self.default_settings.clone();
        }
        match serde_yaml::from_str::<serde_json::Value>(text) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!(
                    session_id = self.session_id,
                    %error,
                    "model inference launched without additional settings"
                );
                self.default_settings.clone()
            }
        }
    }

    /// Drop model state and hand the client back.
    pub fn disconnect(self) -> C {
        tracing::info!(session_id = self.session_id, "disconnected from model session");
        self.client
    }
}

fn is_blank(settings: &serde_json::Value) -> bool {
    match settings {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
