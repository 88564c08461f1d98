//! # seer-config
//!
//! Layered configuration loading for seer using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SEER_*` prefix, `__` as separator)
//! 2. An explicit file passed with `--config`, if any
//! 3. Project-level `.seer/config.toml`
//! 4. User-level `~/.config/seer/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `SEER_RECONCILE__SUFFIX` -> `reconcile.suffix`,
//! `SEER_APPLY__STALENESS_GUARD` -> `apply.staleness_guard`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use seer_config::SeerConfig;
//!
//! let config = SeerConfig::load().expect("config");
//! if config.model.is_configured() {
//!     println!("model session: {:?}", config.model.session_id);
//! }
//! ```

mod apply;
mod error;
mod model;
mod reconcile;

pub use apply::ApplyConfig;
pub use error::ConfigError;
pub use model::ModelConfig;
pub use reconcile::ReconcileConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SeerConfig {
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub apply: ApplyConfig,
}

impl SeerConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT read `.env`; the binary loads it before calling this.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, layering `extra` above the discovered TOML files.
    pub fn load_from(extra: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Self::figment();
        if let Some(path) = extra {
            figment = figment.merge(Toml::file(path));
        }
        let config: Self = figment
            .merge(Env::prefixed("SEER_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the file-backed part of the provider chain.
    ///
    /// Environment variables are merged by the `load*` functions so an
    /// explicit `--config` file still ranks below them.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".seer/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    /// Reject values the reconciler and model connection cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reconcile.suffix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "reconcile.suffix".into(),
                reason: "suffix must not be empty".into(),
            });
        }
        if self.model.connect_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "model.connect_timeout_secs".into(),
                reason: "timeout must be at least one second".into(),
            });
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("seer").join("config.toml"))
    }
}
