//! Labeling-session state driven by the tool's "selection changed" trigger.

use seer_core::{AccessScope, KeepSet, SessionContext};
use seer_schema::SuffixPolicy;

use crate::cache::VocabularyCache;
use crate::collaborators::{JobInfoLookup, VocabularyStore};
use crate::connection::ModelConnection;
use crate::error::StoreError;
use crate::orchestrator::ApplyContext;
use crate::scope::ScopeTracker;

/// The labeler's current position plus the job scope resolved for it.
#[derive(Debug)]
pub struct LabelingSession {
    context: SessionContext,
    scope: ScopeTracker,
}

impl LabelingSession {
    #[must_use]
    pub fn new(context: SessionContext) -> Self {
        Self {
            context,
            scope: ScopeTracker::new(),
        }
    }

    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Take a new selection context: warm the project's vocabulary cache and
    /// re-resolve the job scope if the job changed.
    pub async fn on_selection_changed<P>(
        &mut self,
        platform: &P,
        cache: &VocabularyCache,
        context: SessionContext,
    ) -> Result<&AccessScope, StoreError>
    where
        P: VocabularyStore + JobInfoLookup,
    {
        tracing::debug!(
            project_id = context.project_id,
            video_id = context.video_id,
            frame_index = context.frame_index,
            job_id = ?context.job_id,
            "selection changed"
        );
        self.context = context;
        cache.warm(platform, self.context.project_id).await?;
        self.scope
            .observe(platform, self.context.user_id, self.context.job_id)
            .await
    }

    /// Move to another frame of the same video.
    pub fn set_frame(&mut self, frame_index: u32) {
        self.context = self.context.at_frame(frame_index);
    }

    /// Scope for the current job, once resolved.
    #[must_use]
    pub fn scope(&self) -> Option<&AccessScope> {
        self.scope.scope_for(self.context.job_id)
    }

    /// Assemble an apply for the current frame. `None` until the scope of
    /// the current job has been resolved.
    #[must_use]
    pub fn apply_context<'a, C>(
        &'a self,
        connection: &'a ModelConnection<C>,
        cache: &'a VocabularyCache,
        selection: &'a KeepSet,
        policy: &'a SuffixPolicy,
        settings: serde_json::Value,
    ) -> Option<ApplyContext<'a, C>> {
        Some(ApplyContext {
            session: self.context.clone(),
            connection,
            cache,
            selection,
            policy,
            scope: self.scope()?,
            settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::{ApplyOptions, ApplyOrchestrator, ApplyOutcome};
    use crate::test_support::{FakeModel, FakePlatform};
    use pretty_assertions::assert_eq;
    use seer_core::{JobInfo, Vocabulary};
    use std::time::Duration;

    fn context(project_id: u64, job_id: Option<u64>) -> SessionContext {
        SessionContext {
            team_id: 1,
            session_id: 2,
            dataset_id: 3,
            project_id,
            video_id: 4,
            frame_index: 0,
            user_id: 5,
            job_id,
        }
    }

    fn platform() -> FakePlatform {
        FakePlatform::new()
            .with_vocabulary(1, Vocabulary::default())
            .with_vocabulary(2, Vocabulary::default())
            .with_job(JobInfo {
                job_id: 9,
                assignee_id: 5,
                allowed_classes: ["car".to_string()].into(),
                allowed_tags: Default::default(),
                dynamic_restriction_enabled: true,
            })
    }

    #[tokio::test]
    async fn selection_change_warms_each_project_once() {
        let platform = platform();
        let cache = VocabularyCache::new();
        let mut session = LabelingSession::new(context(1, None));

        session
            .on_selection_changed(&platform, &cache, context(1, None))
            .await
            .unwrap();
        session
            .on_selection_changed(&platform, &cache, context(1, None))
            .await
            .unwrap();
        session
            .on_selection_changed(&platform, &cache, context(2, None))
            .await
            .unwrap();

        assert_eq!(platform.vocabulary_fetches(), 2);
        assert_eq!(session.context().project_id, 2);
    }

    #[tokio::test]
    async fn apply_context_needs_resolved_scope() {
        let platform = platform();
        let cache = VocabularyCache::new();
        let connection = ModelConnection::connect(FakeModel::new(), 11, Duration::from_secs(3))
            .await
            .unwrap();
        let selection = connection.default_selection();
        let policy = SuffixPolicy::default();
        let mut session = LabelingSession::new(context(1, Some(9)));

        assert!(
            session
                .apply_context(&connection, &cache, &selection, &policy, serde_json::json!({}))
                .is_none()
        );

        let scope = session
            .on_selection_changed(&platform, &cache, context(1, Some(9)))
            .await
            .unwrap();
        assert!(scope.owned_by_current_user());

        session.set_frame(30);
        let ctx = session
            .apply_context(&connection, &cache, &selection, &policy, serde_json::json!({}))
            .unwrap();
        assert_eq!(ctx.session.frame_index, 30);
        assert_eq!(ctx.scope.job_id(), Some(9));
    }

    #[tokio::test]
    async fn session_drives_an_apply() {
        let platform = platform();
        let cache = VocabularyCache::new();
        let connection = ModelConnection::connect(FakeModel::new(), 11, Duration::from_secs(3))
            .await
            .unwrap();
        let selection = connection.default_selection();
        let policy = SuffixPolicy::default();
        let mut session = LabelingSession::new(context(1, None));
        session
            .on_selection_changed(&platform, &cache, context(1, None))
            .await
            .unwrap();

        let orchestrator = ApplyOrchestrator::new(platform, ApplyOptions::default());
        let ctx = session
            .apply_context(&connection, &cache, &selection, &policy, serde_json::json!({}))
            .unwrap();
        let outcome = orchestrator.apply(ctx).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::NoPrediction { returned: 0 });
        assert_eq!(orchestrator.platform().vocabulary_fetches(), 1);
    }
}
