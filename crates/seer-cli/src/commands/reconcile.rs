use serde::Serialize;

use seer_config::SeerConfig;
use seer_core::Vocabulary;
use seer_schema::Mapping;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReconcileArgs;
use crate::commands::shared::prepare;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    pub changed: bool,
    pub vocabulary: Vocabulary,
    pub mapping: Mapping,
}

pub fn run(args: &ReconcileArgs, config: &SeerConfig) -> anyhow::Result<ReconcileReport> {
    let prepared = prepare(args, config)?;
    Ok(ReconcileReport {
        changed: prepared.reconciliation.changed(&prepared.project),
        vocabulary: prepared.reconciliation.vocabulary,
        mapping: prepared.reconciliation.mapping,
    })
}

/// Handle `seer reconcile`.
pub fn handle(args: &ReconcileArgs, config: &SeerConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&run(args, config)?, flags.format)
}
