//! Job-scoped vocabulary restrictions.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids::{JobId, UserId};

/// Job metadata as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobInfo {
    pub job_id: JobId,
    pub assignee_id: UserId,
    #[serde(default)]
    pub allowed_classes: BTreeSet<String>,
    #[serde(default)]
    pub allowed_tags: BTreeSet<String>,
    #[serde(default)]
    pub dynamic_restriction_enabled: bool,
}

/// Which part of the vocabulary the current user may apply predictions to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum AccessScope {
    /// No job, or a job assigned to somebody else.
    #[default]
    Unrestricted,
    /// A job owned by the current user.
    RestrictedToJob {
        job_id: JobId,
        allowed_classes: BTreeSet<String>,
        allowed_tags: BTreeSet<String>,
        dynamic_restriction_enabled: bool,
    },
}

impl AccessScope {
    /// Scope for `user` working inside `job`.
    #[must_use]
    pub fn for_job(user: UserId, job: &JobInfo) -> Self {
        if job.assignee_id != user {
            return Self::Unrestricted;
        }
        Self::RestrictedToJob {
            job_id: job.job_id,
            allowed_classes: job.allowed_classes.clone(),
            allowed_tags: job.allowed_tags.clone(),
            dynamic_restriction_enabled: job.dynamic_restriction_enabled,
        }
    }

    /// The job this scope was resolved for, if it restricts anything.
    #[must_use]
    pub const fn job_id(&self) -> Option<JobId> {
        match self {
            Self::Unrestricted => None,
            Self::RestrictedToJob { job_id, .. } => Some(*job_id),
        }
    }

    #[must_use]
    pub const fn owned_by_current_user(&self) -> bool {
        matches!(self, Self::RestrictedToJob { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(assignee_id: UserId) -> JobInfo {
        JobInfo {
            job_id: 7,
            assignee_id,
            allowed_classes: ["car".to_string()].into(),
            allowed_tags: BTreeSet::new(),
            dynamic_restriction_enabled: true,
        }
    }

    #[test]
    fn foreign_job_is_unrestricted() {
        let scope = AccessScope::for_job(1, &job(2));
        assert_eq!(scope, AccessScope::Unrestricted);
        assert!(!scope.owned_by_current_user());
        assert_eq!(scope.job_id(), None);
    }

    #[test]
    fn owned_job_restricts() {
        let scope = AccessScope::for_job(2, &job(2));
        assert!(scope.owned_by_current_user());
        assert_eq!(scope.job_id(), Some(7));
        let json = serde_json::to_value(&scope).unwrap();
        assert_eq!(json["scope"], "restricted_to_job");
        assert_eq!(json["allowed_classes"][0], "car");
    }
}
