use anyhow::Context;

use seer_apply::{
    ApplyOptions, ApplyOrchestrator, ApplyOutcome, LabelingSession, ModelConnection,
    VocabularyCache, policy_from_config,
};
use seer_config::SeerConfig;
use seer_core::SessionContext;
use seer_core::ids::SessionId;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ApplyArgs;
use crate::commands::shared::keep_set;
use crate::output::output;
use crate::replay::{MODEL_FILE, ModelFile, ReplayModel, ReplayPlatform, read_json};

/// Labeling session id used for replays; there is no live tool session.
const REPLAY_SESSION: SessionId = 1;

pub async fn run(args: &ApplyArgs, config: &SeerConfig) -> anyhow::Result<ApplyOutcome> {
    let platform = ReplayPlatform::open(&args.workspace)?;
    let model_file: ModelFile = read_json(&args.workspace.join(MODEL_FILE))?;
    let session_id = args
        .session
        .or(config.model.session_id)
        .or(model_file.session_id)
        .context("no model session; pass --session or set model.session_id")?;

    let connection = ModelConnection::connect(
        ReplayModel::new(model_file),
        session_id,
        config.model.connect_timeout(),
    )
    .await?;

    let context = SessionContext {
        team_id: 1,
        session_id: REPLAY_SESSION,
        dataset_id: 1,
        project_id: args.project_id,
        video_id: args.video,
        frame_index: args.frame,
        user_id: args.user,
        job_id: platform.job().map(|job| job.job_id),
    };
    let cache = VocabularyCache::new();
    let mut session = LabelingSession::new(context.clone());
    session
        .on_selection_changed(&platform, &cache, context)
        .await
        .context("failed to load labeling context")?;

    let selection = keep_set(
        connection.vocabulary(),
        args.classes.as_deref(),
        args.tags.as_deref(),
    );
    let settings = args.settings.as_deref().map_or_else(
        || connection.default_settings().clone(),
        |text| connection.settings_from_text(text),
    );
    let policy = policy_from_config(&config.reconcile);

    let orchestrator = ApplyOrchestrator::new(platform, ApplyOptions::from_config(&config.apply));
    let ctx = session
        .apply_context(&connection, &cache, &selection, &policy, settings)
        .context("job scope not resolved for the labeling context")?;
    let result = orchestrator.apply(ctx).await;

    // Whatever was created before a failure stays created.
    orchestrator.platform().flush()?;
    Ok(result?)
}

/// Handle `seer apply`.
pub async fn handle(args: &ApplyArgs, config: &SeerConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&run(args, config).await?, flags.format)
}
