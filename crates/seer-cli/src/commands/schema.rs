use schemars::schema_for;

use seer_core::{JobInfo, PredictionAnnotation, Vocabulary};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaTarget};
use crate::output::output;
use crate::replay::ModelFile;

pub fn schema_value(target: SchemaTarget) -> anyhow::Result<serde_json::Value> {
    let schema = match target {
        SchemaTarget::Vocabulary => schema_for!(Vocabulary),
        SchemaTarget::Prediction => schema_for!(PredictionAnnotation),
        SchemaTarget::Model => schema_for!(ModelFile),
        SchemaTarget::Job => schema_for!(JobInfo),
    };
    Ok(serde_json::to_value(schema)?)
}

/// Handle `seer schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_value(args.target)?, flags.format)
}
