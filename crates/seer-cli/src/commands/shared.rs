use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use seer_config::{ReconcileConfig, SeerConfig};
use seer_core::{KeepSet, Vocabulary};
use seer_schema::{Reconciliation, SuffixPolicy, reconcile};

use crate::cli::root_commands::ReconcileArgs;
use crate::replay::{ModelFile, read_json};

/// `--model` accepts a recorded model file or a bare vocabulary.
#[derive(Deserialize)]
#[serde(untagged)]
enum ModelInput {
    Recorded(ModelFile),
    Plain(Vocabulary),
}

pub fn read_model_vocabulary(path: &Path) -> anyhow::Result<Vocabulary> {
    Ok(match read_json::<ModelInput>(path)? {
        ModelInput::Recorded(file) => file.vocabulary,
        ModelInput::Plain(vocabulary) => vocabulary,
    })
}

/// The user's selection; an absent list selects every model item.
pub fn keep_set(model: &Vocabulary, classes: Option<&[String]>, tags: Option<&[String]>) -> KeepSet {
    let all = model.keep_all();
    KeepSet::new(
        classes.map_or(all.classes, |names| names.iter().cloned().collect()),
        tags.map_or(all.tags, |names| names.iter().cloned().collect()),
    )
}

/// Config policy with command-line overrides on top.
pub fn suffix_policy(config: &ReconcileConfig, args: &ReconcileArgs) -> anyhow::Result<SuffixPolicy> {
    let suffix = args.suffix.clone().unwrap_or_else(|| config.suffix.clone());
    anyhow::ensure!(!suffix.trim().is_empty(), "--suffix must not be empty");
    Ok(SuffixPolicy::new(
        suffix,
        args.force_suffix || config.force_suffix,
    ))
}

/// Inputs and result of one offline reconciliation.
pub struct Prepared {
    pub project: Vocabulary,
    pub keep: KeepSet,
    pub reconciliation: Reconciliation,
}

pub fn prepare(args: &ReconcileArgs, config: &SeerConfig) -> anyhow::Result<Prepared> {
    let project: Vocabulary = read_json(&args.project)?;
    let model = read_model_vocabulary(&args.model)?;
    let keep = keep_set(&model, args.classes.as_deref(), args.tags.as_deref());
    let model_items = model
        .select(&keep)
        .map_err(|(kind, name)| anyhow::anyhow!("model has no {kind} named '{name}'"))?;
    let policy = suffix_policy(&config.reconcile, args)?;

    let reconciliation = reconcile(&project, &model_items, &policy)
        .context("failed to reconcile model vocabulary")?;
    tracing::debug!(
        classes = reconciliation.mapping.classes.len(),
        tags = reconciliation.mapping.tags.len(),
        suffix = %policy.suffix,
        force = policy.force,
        "reconciled model vocabulary"
    );

    Ok(Prepared {
        project,
        keep,
        reconciliation,
    })
}
