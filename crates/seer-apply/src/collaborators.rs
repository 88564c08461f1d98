//! Interfaces to the services the apply workflow drives.
//!
//! The inference service and the labeling platform are remote; seer only
//! needs the handful of calls below. Implementations decide transport,
//! retries and timeouts.

use async_trait::async_trait;
use seer_core::ids::{FigureId, JobId, ObjectId, ProjectId, SessionId, VideoId};
use seer_core::{ClassDef, Geometry, JobInfo, PredictionAnnotation, TagDef, TagValue, Vocabulary};
use serde::{Deserialize, Serialize};

use crate::error::{InferenceError, StoreError};

/// Inference over a run of frames of one video, forward from `start_frame`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub video_id: VideoId,
    pub start_frame: u32,
    pub frame_count: u32,
    #[serde(default)]
    pub settings: serde_json::Value,
}

impl InferenceRequest {
    /// Just `frame`.
    #[must_use]
    pub const fn single_frame(video_id: VideoId, frame: u32, settings: serde_json::Value) -> Self {
        Self {
            video_id,
            start_frame: frame,
            frame_count: 1,
            settings,
        }
    }
}

/// What a deployed model reports about itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub model_name: String,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

/// Where a tag is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum TagTarget {
    Object { object_id: ObjectId },
    Frame { video_id: VideoId, frame_index: u32 },
}

/// A deployed detection/segmentation model.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn session_info(&self) -> Result<SessionInfo, InferenceError>;

    /// Classes and tags the model can emit.
    async fn model_vocabulary(&self) -> Result<Vocabulary, InferenceError>;

    async fn default_settings(&self) -> Result<serde_json::Value, InferenceError>;

    async fn run_inference(
        &self,
        request: InferenceRequest,
    ) -> Result<Vec<PredictionAnnotation>, InferenceError>;
}

#[async_trait]
pub trait VocabularyStore: Send + Sync {
    async fn get_vocabulary(&self, project_id: ProjectId) -> Result<Vocabulary, StoreError>;

    async fn put_vocabulary(
        &self,
        project_id: ProjectId,
        vocabulary: &Vocabulary,
    ) -> Result<(), StoreError>;
}

#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Create one video object per class, returning ids in input order.
    async fn create_objects_bulk(
        &self,
        video_id: VideoId,
        classes: &[ClassDef],
    ) -> Result<Vec<ObjectId>, StoreError>;

    async fn create_figure(
        &self,
        video_id: VideoId,
        object_id: ObjectId,
        frame_index: u32,
        geometry: &Geometry,
    ) -> Result<FigureId, StoreError>;

    async fn attach_tag(
        &self,
        target: TagTarget,
        def: &TagDef,
        value: &TagValue,
    ) -> Result<(), StoreError>;
}

/// Enables and disables the labeling tool's edit controls for a session.
#[async_trait]
pub trait EditControlGate: Send + Sync {
    async fn disable_controls(&self, session_id: SessionId) -> Result<(), StoreError>;

    async fn enable_controls(&self, session_id: SessionId) -> Result<(), StoreError>;
}

#[async_trait]
pub trait JobInfoLookup: Send + Sync {
    async fn get_job_info(&self, job_id: JobId) -> Result<JobInfo, StoreError>;
}
