//! Error types for the apply workflow and its collaborators.

use std::time::Duration;

use seer_core::ApplyStage;
use seer_core::ids::{JobId, ModelSessionId};
use seer_schema::SchemaError;
use thiserror::Error;

/// Failure of the remote inference service.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Failure of a platform store (vocabulary, annotations, jobs, controls).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
}

/// Failure to establish a model connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error(
        "couldn't connect to model session {session_id}; make sure the model is deployed and try again: {source}"
    )]
    Unreachable {
        session_id: ModelSessionId,
        #[source]
        source: InferenceError,
    },

    #[error("model session {session_id} returned an unusable vocabulary: {source}")]
    Vocabulary {
        session_id: ModelSessionId,
        #[source]
        source: InferenceError,
    },
}

/// A reason an apply was aborted.
#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("inference call failed: {0}")]
    Inference(#[from] InferenceError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StoreError),

    #[error("edit controls could not be toggled: {0}")]
    Controls(#[source] StoreError),

    #[error(
        "job {job_id} does not enable dynamic class/tag restriction; enable it in the job settings to apply predictions"
    )]
    ConfigurationRequired { job_id: JobId },

    #[error("access scope was resolved for job {scope_job} but the session is in job {session_job:?}")]
    ScopeMismatch {
        scope_job: JobId,
        session_job: Option<JobId>,
    },

    #[error("apply panicked: {0}")]
    Panicked(String),
}

/// Umbrella error surfaced to the caller of `apply`.
///
/// Edit controls have always been re-enabled (or an attempt was made and
/// logged) by the time this is returned.
#[derive(Debug, Error)]
#[error("apply failed while {stage}: {source}")]
pub struct ApplyFailed {
    pub stage: ApplyStage,
    #[source]
    pub source: ApplyError,
}
