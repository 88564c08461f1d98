use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Merge a model vocabulary into a project vocabulary.
    Reconcile(ReconcileArgs),
    /// Reconcile, then rewrite a prediction against the result.
    Transform(TransformArgs),
    /// Run a full apply against a directory-backed workspace.
    Apply(ApplyArgs),
    /// Print the JSON Schema of an input file.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ReconcileArgs {
    /// Project vocabulary (JSON)
    #[arg(long)]
    pub project: PathBuf,
    /// Model vocabulary (JSON)
    #[arg(long)]
    pub model: PathBuf,
    /// Model classes to keep (default: all)
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,
    /// Model tags to keep (default: all)
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
    /// Suffix for clashing names (overrides config)
    #[arg(long)]
    pub suffix: Option<String>,
    /// Suffix model names even when the plain name is free
    #[arg(long)]
    pub force_suffix: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TransformArgs {
    #[command(flatten)]
    pub reconcile: ReconcileArgs,
    /// Model prediction for one frame (JSON)
    #[arg(long)]
    pub prediction: PathBuf,
}

#[derive(Clone, Debug, Args)]
pub struct ApplyArgs {
    /// Directory holding vocabulary.json, model.json and optionally job.json
    #[arg(long)]
    pub workspace: PathBuf,
    /// Target frame index
    #[arg(long)]
    pub frame: u32,
    /// Target video id
    #[arg(long, default_value_t = 1)]
    pub video: u64,
    /// Project id recorded in the session context
    #[arg(long, default_value_t = 1)]
    pub project_id: u64,
    /// Labeling user
    #[arg(long, default_value_t = 1)]
    pub user: u64,
    /// Model session id (overrides config and model.json)
    #[arg(long)]
    pub session: Option<u64>,
    /// Inference settings as YAML text (default: model defaults)
    #[arg(long)]
    pub settings: Option<String>,
    /// Model classes to keep (default: all)
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,
    /// Model tags to keep (default: all)
    #[arg(long, value_delimiter = ',')]
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Input file to describe
    #[arg(value_enum)]
    pub target: SchemaTarget,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaTarget {
    Vocabulary,
    Prediction,
    Model,
    Job,
}
