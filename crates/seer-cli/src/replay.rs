//! Directory-backed stand-ins for the labeling platform and the model, used
//! by `seer apply` to replay a recorded model run offline.
//!
//! Layout of a workspace directory:
//!
//! - `vocabulary.json` project vocabulary, rewritten when reconciliation adds items
//! - `model.json` model vocabulary, default settings and per-frame predictions
//! - `job.json` optional job the labeling user works in
//! - `annotations.json` objects, figures and tags created so far

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::Context;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use seer_apply::{
    AnnotationStore, EditControlGate, InferenceClient, InferenceError, InferenceRequest,
    JobInfoLookup, SessionInfo, StoreError, TagTarget, VocabularyStore,
};
use seer_core::ids::{FigureId, JobId, ModelSessionId, ObjectId, ProjectId, SessionId, VideoId};
use seer_core::{ClassDef, Geometry, JobInfo, PredictionAnnotation, TagDef, TagValue, Vocabulary};

pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const MODEL_FILE: &str = "model.json";
pub const JOB_FILE: &str = "job.json";
pub const ANNOTATIONS_FILE: &str = "annotations.json";

/// Recorded output of a deployed model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ModelFile {
    #[serde(default)]
    pub session_id: Option<ModelSessionId>,
    #[serde(default)]
    pub model_name: String,
    pub vocabulary: Vocabulary,
    #[serde(default)]
    pub settings: serde_json::Value,
    /// Predictions keyed by frame index.
    #[serde(default)]
    pub predictions: BTreeMap<u32, Vec<PredictionAnnotation>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub id: ObjectId,
    pub video_id: VideoId,
    pub class: ClassDef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureRecord {
    pub id: FigureId,
    pub object_id: ObjectId,
    pub frame_index: u32,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRecord {
    #[serde(flatten)]
    pub target: TagTarget,
    pub tag: TagDef,
    pub value: TagValue,
}

/// Contents of `annotations.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationLog {
    #[serde(default)]
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub figures: Vec<FigureRecord>,
    #[serde(default)]
    pub tags: Vec<TagRecord>,
}

impl AnnotationLog {
    fn next_object_id(&self) -> ObjectId {
        self.objects.iter().map(|o| o.id).max().map_or(1, |id| id + 1)
    }

    fn next_figure_id(&self) -> FigureId {
        self.figures.iter().map(|f| f.id).max().map_or(1, |id| id + 1)
    }
}

pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}

/// The labeling platform, backed by JSON files in one directory.
#[derive(Debug)]
pub struct ReplayPlatform {
    root: PathBuf,
    job: Option<JobInfo>,
    annotations: Mutex<AnnotationLog>,
}

impl ReplayPlatform {
    pub fn open(root: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(
            root.join(VOCABULARY_FILE).is_file(),
            "{} has no {VOCABULARY_FILE}",
            root.display()
        );
        let job_path = root.join(JOB_FILE);
        let job = if job_path.is_file() {
            Some(read_json(&job_path)?)
        } else {
            None
        };
        let annotations_path = root.join(ANNOTATIONS_FILE);
        let annotations = if annotations_path.is_file() {
            read_json(&annotations_path)?
        } else {
            AnnotationLog::default()
        };
        Ok(Self {
            root: root.to_path_buf(),
            job,
            annotations: Mutex::new(annotations),
        })
    }

    pub const fn job(&self) -> Option<&JobInfo> {
        self.job.as_ref()
    }

    /// Write everything created so far to `annotations.json`.
    pub fn flush(&self) -> anyhow::Result<()> {
        let log = self.log().clone();
        write_json(&self.root.join(ANNOTATIONS_FILE), &log)
    }

    fn log(&self) -> std::sync::MutexGuard<'_, AnnotationLog> {
        self.annotations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

fn unavailable(error: &anyhow::Error) -> StoreError {
    StoreError::Unavailable(format!("{error:#}"))
}

#[async_trait]
impl VocabularyStore for ReplayPlatform {
    async fn get_vocabulary(&self, project_id: ProjectId) -> Result<Vocabulary, StoreError> {
        tracing::debug!(project_id, "reading project vocabulary");
        read_json(&self.root.join(VOCABULARY_FILE)).map_err(|e| unavailable(&e))
    }

    async fn put_vocabulary(
        &self,
        project_id: ProjectId,
        vocabulary: &Vocabulary,
    ) -> Result<(), StoreError> {
        tracing::debug!(project_id, "writing project vocabulary");
        write_json(&self.root.join(VOCABULARY_FILE), vocabulary).map_err(|e| unavailable(&e))
    }
}

#[async_trait]
impl AnnotationStore for ReplayPlatform {
    async fn create_objects_bulk(
        &self,
        video_id: VideoId,
        classes: &[ClassDef],
    ) -> Result<Vec<ObjectId>, StoreError> {
        let mut log = self.log();
        let first = log.next_object_id();
        let ids: Vec<ObjectId> = (first..).take(classes.len()).collect();
        log.objects
            .extend(ids.iter().zip(classes).map(|(&id, class)| ObjectRecord {
                id,
                video_id,
                class: class.clone(),
            }));
        Ok(ids)
    }

    async fn create_figure(
        &self,
        _video_id: VideoId,
        object_id: ObjectId,
        frame_index: u32,
        geometry: &Geometry,
    ) -> Result<FigureId, StoreError> {
        let mut log = self.log();
        if !log.objects.iter().any(|o| o.id == object_id) {
            return Err(StoreError::NotFound {
                entity: "object",
                id: object_id,
            });
        }
        let id = log.next_figure_id();
        log.figures.push(FigureRecord {
            id,
            object_id,
            frame_index,
            geometry: geometry.clone(),
        });
        Ok(id)
    }

    async fn attach_tag(
        &self,
        target: TagTarget,
        def: &TagDef,
        value: &TagValue,
    ) -> Result<(), StoreError> {
        self.log().tags.push(TagRecord {
            target,
            tag: def.clone(),
            value: value.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl EditControlGate for ReplayPlatform {
    async fn disable_controls(&self, session_id: SessionId) -> Result<(), StoreError> {
        tracing::info!(session_id, "edit controls disabled");
        Ok(())
    }

    async fn enable_controls(&self, session_id: SessionId) -> Result<(), StoreError> {
        tracing::info!(session_id, "edit controls enabled");
        Ok(())
    }
}

#[async_trait]
impl JobInfoLookup for ReplayPlatform {
    async fn get_job_info(&self, job_id: JobId) -> Result<JobInfo, StoreError> {
        self.job
            .iter()
            .find(|job| job.job_id == job_id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "job",
                id: job_id,
            })
    }
}

/// A model that answers from `model.json`.
#[derive(Debug)]
pub struct ReplayModel {
    file: ModelFile,
}

impl ReplayModel {
    pub const fn new(file: ModelFile) -> Self {
        Self { file }
    }
}

#[async_trait]
impl InferenceClient for ReplayModel {
    async fn session_info(&self) -> Result<SessionInfo, InferenceError> {
        Ok(SessionInfo {
            model_name: self.file.model_name.clone(),
            details: serde_json::Map::new(),
        })
    }

    async fn model_vocabulary(&self) -> Result<Vocabulary, InferenceError> {
        Ok(self.file.vocabulary.clone())
    }

    async fn default_settings(&self) -> Result<serde_json::Value, InferenceError> {
        Ok(self.file.settings.clone())
    }

    async fn run_inference(
        &self,
        request: InferenceRequest,
    ) -> Result<Vec<PredictionAnnotation>, InferenceError> {
        tracing::debug!(
            video_id = request.video_id,
            start_frame = request.start_frame,
            frame_count = request.frame_count,
            settings = %request.settings,
            "replaying inference"
        );
        Ok(self
            .file
            .predictions
            .get(&request.start_frame)
            .cloned()
            .unwrap_or_default())
    }
}
