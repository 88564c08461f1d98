use serde::Serialize;

use seer_config::SeerConfig;
use seer_core::{PredictionAnnotation, Vocabulary};
use seer_schema::{Mapping, transform};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::TransformArgs;
use crate::commands::shared::prepare;
use crate::output::output;
use crate::replay::read_json;

#[derive(Debug, Serialize)]
pub struct TransformReport {
    pub changed: bool,
    pub vocabulary: Vocabulary,
    pub mapping: Mapping,
    pub annotation: PredictionAnnotation,
}

pub fn run(args: &TransformArgs, config: &SeerConfig) -> anyhow::Result<TransformReport> {
    let prepared = prepare(&args.reconcile, config)?;
    let prediction: PredictionAnnotation = read_json(&args.prediction)?;
    let reconciliation = prepared.reconciliation;

    let annotation = transform(
        &prediction,
        &reconciliation.vocabulary,
        &reconciliation.mapping,
        &prepared.keep,
    )?;
    tracing::debug!(
        labels_in = prediction.labels.len(),
        labels_out = annotation.labels.len(),
        tags_out = annotation.tag_count(),
        "transformed prediction"
    );

    Ok(TransformReport {
        changed: reconciliation.changed(&prepared.project),
        vocabulary: reconciliation.vocabulary,
        mapping: reconciliation.mapping,
        annotation,
    })
}

/// Handle `seer transform`.
pub fn handle(args: &TransformArgs, config: &SeerConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&run(args, config)?, flags.format)
}
