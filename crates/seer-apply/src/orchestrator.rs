//! The apply workflow: lock the session, run the model on one frame, fold
//! the prediction into the project vocabulary and persist it, then unlock.
//!
//! ```text
//! idle → locked → invoking → reconciling → persisting → completed
//!          └─────────┴────────────┴─────────────┴──────→ failed
//! ```
//!
//! Edit controls are re-enabled on every exit after `locked`, including
//! errors and panics inside the locked section. A failed apply is not rolled
//! back: a vocabulary push that already happened stays.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Serialize;

use seer_config::{ApplyConfig, ReconcileConfig};
use seer_core::ids::{ObjectId, SessionId, VideoId};
use seer_core::{AccessScope, ApplyStage, ClassDef, KeepSet, PredictionAnnotation, SessionContext};
use seer_schema::{SchemaError, SuffixPolicy, reconcile, transform};

use crate::cache::VocabularyCache;
use crate::clock::{RequestClock, RequestTicket};
use crate::collaborators::{
    AnnotationStore, EditControlGate, InferenceClient, InferenceRequest, TagTarget,
    VocabularyStore,
};
use crate::connection::ModelConnection;
use crate::error::{ApplyError, ApplyFailed, StoreError};
use crate::scope::effective_keep_set;

/// Orchestrator switches, usually taken from `[apply]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOptions {
    pub staleness_guard: bool,
    pub attach_frame_tags: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self::from_config(&ApplyConfig::default())
    }
}

impl ApplyOptions {
    #[must_use]
    pub const fn from_config(config: &ApplyConfig) -> Self {
        Self {
            staleness_guard: config.staleness_guard,
            attach_frame_tags: config.attach_frame_tags,
        }
    }
}

#[must_use]
pub fn policy_from_config(config: &ReconcileConfig) -> SuffixPolicy {
    SuffixPolicy::new(config.suffix.clone(), config.force_suffix)
}

/// Everything one apply needs. Built fresh per request.
#[derive(Debug)]
pub struct ApplyContext<'a, C> {
    /// Target video and frame, plus the project and job they belong to.
    pub session: SessionContext,
    pub connection: &'a ModelConnection<C>,
    pub cache: &'a VocabularyCache,
    /// Classes and tags the user picked from the model vocabulary.
    pub selection: &'a KeepSet,
    pub policy: &'a SuffixPolicy,
    pub scope: &'a AccessScope,
    pub settings: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub objects_created: usize,
    pub figures_created: usize,
    pub tags_attached: usize,
    pub vocabulary_updated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ApplyOutcome {
    Applied(ApplyReport),
    /// The model did not return exactly one prediction; nothing was written.
    NoPrediction { returned: usize },
    /// A newer apply started while this one was waiting on the model.
    Superseded,
}

struct StageTracker {
    stage: ApplyStage,
    video_id: VideoId,
    frame_index: u32,
}

impl StageTracker {
    const fn new(video_id: VideoId, frame_index: u32) -> Self {
        Self {
            stage: ApplyStage::Idle,
            video_id,
            frame_index,
        }
    }

    fn advance(&mut self, next: ApplyStage) {
        debug_assert!(
            self.stage.can_transition_to(next),
            "invalid apply transition {} -> {next}",
            self.stage
        );
        tracing::debug!(
            video_id = self.video_id,
            frame_index = self.frame_index,
            from = %self.stage,
            to = %next,
            "apply stage"
        );
        self.stage = next;
    }
}

/// Runs applies against one platform.
pub struct ApplyOrchestrator<P> {
    platform: P,
    clock: RequestClock,
    options: ApplyOptions,
}

impl<P> ApplyOrchestrator<P>
where
    P: VocabularyStore + AnnotationStore + EditControlGate,
{
    pub fn new(platform: P, options: ApplyOptions) -> Self {
        Self {
            platform,
            clock: RequestClock::new(),
            options,
        }
    }

    pub const fn platform(&self) -> &P {
        &self.platform
    }

    pub const fn options(&self) -> ApplyOptions {
        self.options
    }

    /// Run one apply for the frame in `ctx.session`.
    ///
    /// # Errors
    ///
    /// [`ApplyFailed`] carrying the stage that failed and the cause. Edit
    /// controls have been re-enabled unless disabling them already failed.
    pub async fn apply<C: InferenceClient>(
        &self,
        ctx: ApplyContext<'_, C>,
    ) -> Result<ApplyOutcome, ApplyFailed> {
        let ticket = self.clock.issue();
        let session_id = ctx.session.session_id;
        let mut tracker = StageTracker::new(ctx.session.video_id, ctx.session.frame_index);

        if let Err(source) = self.platform.disable_controls(session_id).await {
            tracing::warn!(session_id, error = %source, "couldn't lock session for apply");
            return Err(ApplyFailed {
                stage: ApplyStage::Idle,
                source: ApplyError::Controls(source),
            });
        }
        tracker.advance(ApplyStage::Locked);

        let result = AssertUnwindSafe(self.run_locked(&ctx, &ticket, &mut tracker))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(ApplyError::Panicked(panic_message(payload.as_ref()))));
        let reached = tracker.stage;
        debug_assert!(reached.holds_lock(), "apply left the locked section at {reached}");

        let unlocked = self.platform.enable_controls(session_id).await;
        Self::finish(session_id, reached, result, unlocked, &mut tracker)
    }

    fn finish(
        session_id: SessionId,
        reached: ApplyStage,
        result: Result<ApplyOutcome, ApplyError>,
        unlocked: Result<(), StoreError>,
        tracker: &mut StageTracker,
    ) -> Result<ApplyOutcome, ApplyFailed> {
        let result = match (result, unlocked) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(source)) => Err(ApplyError::Controls(source)),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(unlock_error)) => {
                tracing::error!(session_id, error = %unlock_error, "couldn't unlock session after failed apply");
                Err(error)
            }
        };

        match result {
            Ok(outcome) => {
                tracker.advance(ApplyStage::Completed);
                tracing::info!(
                    session_id,
                    video_id = tracker.video_id,
                    frame_index = tracker.frame_index,
                    ?outcome,
                    "apply finished"
                );
                Ok(outcome)
            }
            Err(source) => {
                tracker.advance(ApplyStage::Failed);
                tracing::warn!(
                    session_id,
                    video_id = tracker.video_id,
                    frame_index = tracker.frame_index,
                    stage = %reached,
                    error = %source,
                    "apply failed"
                );
                Err(ApplyFailed {
                    stage: reached,
                    source,
                })
            }
        }
    }

    fn superseded(&self, ticket: &RequestTicket) -> bool {
        if !self.options.staleness_guard || self.clock.is_current(ticket) {
            return false;
        }
        tracing::info!(
            seq = ticket.seq,
            issued_at = %ticket.issued_at,
            "discarding prediction of superseded apply"
        );
        true
    }

    async fn run_locked<C: InferenceClient>(
        &self,
        ctx: &ApplyContext<'_, C>,
        ticket: &RequestTicket,
        tracker: &mut StageTracker,
    ) -> Result<ApplyOutcome, ApplyError> {
        let session = &ctx.session;

        tracker.advance(ApplyStage::Invoking);
        let request =
            InferenceRequest::single_frame(session.video_id, session.frame_index, ctx.settings.clone());
        let mut predictions = ctx.connection.client().run_inference(request).await?;
        if predictions.len() != 1 {
            tracing::info!(
                video_id = session.video_id,
                frame_index = session.frame_index,
                returned = predictions.len(),
                "expected a single prediction, nothing to apply"
            );
            return Ok(ApplyOutcome::NoPrediction {
                returned: predictions.len(),
            });
        }
        if self.superseded(ticket) {
            return Ok(ApplyOutcome::Superseded);
        }
        let prediction = predictions.swap_remove(0);

        tracker.advance(ApplyStage::Reconciling);
        if let Some(scope_job) = ctx.scope.job_id() {
            if session.job_id != Some(scope_job) {
                return Err(ApplyError::ScopeMismatch {
                    scope_job,
                    session_job: session.job_id,
                });
            }
        }
        let keep = effective_keep_set(ctx.scope, ctx.selection)?;
        let model_items = ctx
            .connection
            .vocabulary()
            .select(&keep)
            .map_err(|(kind, name)| SchemaError::Lookup {
                kind,
                name: name.to_string(),
            })?;

        let mut entry = ctx.cache.lock(session.project_id).await;
        // A newer apply may have started while this one waited on the project.
        if self.superseded(ticket) {
            return Ok(ApplyOutcome::Superseded);
        }
        let project = entry.load(&self.platform).await?.clone();
        let reconciliation = reconcile(&project, &model_items, ctx.policy)?;
        let annotation = transform(
            &prediction,
            &reconciliation.vocabulary,
            &reconciliation.mapping,
            &keep,
        )?;

        tracker.advance(ApplyStage::Persisting);
        let vocabulary_updated = reconciliation.changed(&project);
        if vocabulary_updated {
            self.platform
                .put_vocabulary(session.project_id, &reconciliation.vocabulary)
                .await?;
            tracing::info!(
                project_id = session.project_id,
                classes = reconciliation.vocabulary.classes.len(),
                tags = reconciliation.vocabulary.tags.len(),
                "project vocabulary updated"
            );
            entry.replace(reconciliation.vocabulary);
        }

        let mut report = self.persist(session, &annotation).await?;
        report.vocabulary_updated = vocabulary_updated;
        Ok(ApplyOutcome::Applied(report))
    }

    /// Objects and figures first, then tags; tags need the object ids.
    async fn persist(
        &self,
        session: &SessionContext,
        annotation: &PredictionAnnotation,
    ) -> Result<ApplyReport, ApplyError> {
        let mut report = ApplyReport::default();
        let video_id = session.video_id;

        let classes: Vec<ClassDef> = annotation.labels.iter().map(|l| l.class.clone()).collect();
        let object_ids: Vec<ObjectId> = if classes.is_empty() {
            Vec::new()
        } else {
            self.platform.create_objects_bulk(video_id, &classes).await?
        };
        if object_ids.len() != classes.len() {
            return Err(StoreError::Rejected(format!(
                "requested {} objects, store created {}",
                classes.len(),
                object_ids.len()
            ))
            .into());
        }
        report.objects_created = object_ids.len();

        for (label, &object_id) in annotation.labels.iter().zip(&object_ids) {
            self.platform
                .create_figure(video_id, object_id, session.frame_index, &label.geometry)
                .await?;
            report.figures_created += 1;
        }

        for (label, &object_id) in annotation.labels.iter().zip(&object_ids) {
            for tag in &label.tags {
                self.platform
                    .attach_tag(TagTarget::Object { object_id }, &tag.def, &tag.value)
                    .await?;
                report.tags_attached += 1;
            }
        }

        if self.options.attach_frame_tags {
            let target = TagTarget::Frame {
                video_id,
                frame_index: session.frame_index,
            };
            for tag in &annotation.frame_tags {
                self.platform.attach_tag(target, &tag.def, &tag.value).await?;
                report.tags_attached += 1;
            }
        }

        Ok(report)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}
