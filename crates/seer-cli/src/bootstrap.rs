use anyhow::Context;

use crate::cli::GlobalFlags;

/// Load `.env` (if any) and the layered seer configuration.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<seer_config::SeerConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded dotenv file"),
        Err(error) if error.not_found() => {}
        Err(error) => return Err(error).context("failed to load .env"),
    }

    seer_config::SeerConfig::load_from(flags.config.as_deref())
        .context("failed to load seer configuration")
}
