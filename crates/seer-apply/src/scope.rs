//! Resolve which part of the vocabulary the current user may apply to.

use seer_core::AccessScope;
use seer_core::KeepSet;
use seer_core::ids::{JobId, UserId};

use crate::collaborators::JobInfoLookup;
use crate::error::{ApplyError, StoreError};

/// Scope of `user` in `job`; no job means no restriction.
pub async fn resolve_scope<J: JobInfoLookup>(
    jobs: &J,
    user_id: UserId,
    job_id: Option<JobId>,
) -> Result<AccessScope, StoreError> {
    let Some(job_id) = job_id else {
        return Ok(AccessScope::Unrestricted);
    };
    let job = jobs.get_job_info(job_id).await?;
    let scope = AccessScope::for_job(user_id, &job);
    tracing::debug!(
        job_id,
        user_id,
        assignee_id = job.assignee_id,
        owned = scope.owned_by_current_user(),
        "resolved job scope"
    );
    Ok(scope)
}

/// Class/tag names an apply may actually use under `scope`.
///
/// A job owned by the user narrows the selection to the job's allowed names,
/// provided the job opted into dynamic restriction.
pub fn effective_keep_set(scope: &AccessScope, selection: &KeepSet) -> Result<KeepSet, ApplyError> {
    match scope {
        AccessScope::Unrestricted => Ok(selection.clone()),
        AccessScope::RestrictedToJob {
            job_id,
            dynamic_restriction_enabled: false,
            ..
        } => Err(ApplyError::ConfigurationRequired { job_id: *job_id }),
        AccessScope::RestrictedToJob {
            allowed_classes,
            allowed_tags,
            ..
        } => Ok(selection.intersect(allowed_classes, allowed_tags)),
    }
}

/// Remembers the scope of the last observed job context.
///
/// The scope is re-resolved whenever the job id changes, and is only handed
/// out for the job it was resolved for.
#[derive(Debug, Default)]
pub struct ScopeTracker {
    resolved: Option<(Option<JobId>, AccessScope)>,
}

impl ScopeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current job context, resolving the scope if it changed.
    pub async fn observe<J: JobInfoLookup>(
        &mut self,
        jobs: &J,
        user_id: UserId,
        job_id: Option<JobId>,
    ) -> Result<&AccessScope, StoreError> {
        let stale = !matches!(&self.resolved, Some((known, _)) if *known == job_id);
        if stale {
            self.resolved = None;
            let scope = resolve_scope(jobs, user_id, job_id).await?;
            self.resolved = Some((job_id, scope));
        }
        self.resolved
            .as_ref()
            .map(|(_, scope)| scope)
            .ok_or(StoreError::Unavailable("job scope not resolved".into()))
    }

    /// Scope for `job_id`, or `None` if the tracker last saw another job.
    #[must_use]
    pub fn scope_for(&self, job_id: Option<JobId>) -> Option<&AccessScope> {
        match &self.resolved {
            Some((known, scope)) if *known == job_id => Some(scope),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.resolved = None;
    }
}
