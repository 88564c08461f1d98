//! In-memory collaborators that record every call.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use seer_core::ids::{FigureId, JobId, ObjectId, ProjectId, SessionId, VideoId};
use seer_core::{
    ClassDef, Geometry, GeometryKind, JobInfo, PredictionAnnotation, SchemaCollection, TagDef,
    TagValue, TagValueType, Vocabulary,
};

use crate::collaborators::{
    AnnotationStore, EditControlGate, InferenceClient, InferenceRequest, JobInfoLookup,
    SessionInfo, TagTarget, VocabularyStore,
};
use crate::error::{InferenceError, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Disable(SessionId),
    Enable(SessionId),
    GetVocabulary(ProjectId),
    PutVocabulary(ProjectId),
    GetJob(JobId),
    CreateObjects(Vec<String>),
    CreateFigure { object_id: ObjectId, frame_index: u32 },
    AttachTag { target: TagTarget, name: String },
}

#[derive(Debug, Default)]
struct Failures {
    disable: bool,
    enable: bool,
    put: bool,
    figure: bool,
}

#[derive(Debug)]
pub struct FakePlatform {
    vocabularies: Mutex<HashMap<ProjectId, Vocabulary>>,
    jobs: HashMap<JobId, JobInfo>,
    calls: Mutex<Vec<Call>>,
    next_object: Mutex<ObjectId>,
    next_figure: Mutex<FigureId>,
    fail: Failures,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            vocabularies: Mutex::default(),
            jobs: HashMap::new(),
            calls: Mutex::default(),
            next_object: Mutex::new(100),
            next_figure: Mutex::new(1000),
            fail: Failures::default(),
        }
    }

    pub fn with_vocabulary(self, project_id: ProjectId, vocabulary: Vocabulary) -> Self {
        self.vocabularies
            .lock()
            .unwrap()
            .insert(project_id, vocabulary);
        self
    }

    pub fn with_job(mut self, job: JobInfo) -> Self {
        self.jobs.insert(job.job_id, job);
        self
    }

    pub fn failing_disable(mut self) -> Self {
        self.fail.disable = true;
        self
    }

    pub fn failing_enable(mut self) -> Self {
        self.fail.enable = true;
        self
    }

    pub fn failing_put(mut self) -> Self {
        self.fail.put = true;
        self
    }

    pub fn failing_figures(mut self) -> Self {
        self.fail.figure = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn stored_vocabulary(&self, project_id: ProjectId) -> Option<Vocabulary> {
        self.vocabularies.lock().unwrap().get(&project_id).cloned()
    }

    pub fn vocabulary_fetches(&self) -> usize {
        self.count(|call| matches!(call, Call::GetVocabulary(_)))
    }

    pub fn job_fetches(&self) -> usize {
        self.count(|call| matches!(call, Call::GetJob(_)))
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl VocabularyStore for FakePlatform {
    async fn get_vocabulary(&self, project_id: ProjectId) -> Result<Vocabulary, StoreError> {
        self.record(Call::GetVocabulary(project_id));
        self.stored_vocabulary(project_id)
            .ok_or(StoreError::NotFound {
                entity: "project",
                id: project_id,
            })
    }

    async fn put_vocabulary(
        &self,
        project_id: ProjectId,
        vocabulary: &Vocabulary,
    ) -> Result<(), StoreError> {
        self.record(Call::PutVocabulary(project_id));
        if self.fail.put {
            return Err(StoreError::Rejected("vocabulary update refused".into()));
        }
        self.vocabularies
            .lock()
            .unwrap()
            .insert(project_id, vocabulary.clone());
        Ok(())
    }
}

#[async_trait]
impl AnnotationStore for FakePlatform {
    async fn create_objects_bulk(
        &self,
        _video_id: VideoId,
        classes: &[ClassDef],
    ) -> Result<Vec<ObjectId>, StoreError> {
        self.record(Call::CreateObjects(
            classes.iter().map(|c| c.name.clone()).collect(),
        ));
        let mut next = self.next_object.lock().unwrap();
        Ok(classes
            .iter()
            .map(|_| {
                let id = *next;
                *next += 1;
                id
            })
            .collect())
    }

    async fn create_figure(
        &self,
        _video_id: VideoId,
        object_id: ObjectId,
        frame_index: u32,
        _geometry: &Geometry,
    ) -> Result<FigureId, StoreError> {
        self.record(Call::CreateFigure {
            object_id,
            frame_index,
        });
        if self.fail.figure {
            return Err(StoreError::Unavailable("figure service down".into()));
        }
        let mut next = self.next_figure.lock().unwrap();
        let id = *next;
        *next += 1;
        Ok(id)
    }

    async fn attach_tag(
        &self,
        target: TagTarget,
        def: &TagDef,
        _value: &TagValue,
    ) -> Result<(), StoreError> {
        self.record(Call::AttachTag {
            target,
            name: def.name.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl EditControlGate for FakePlatform {
    async fn disable_controls(&self, session_id: SessionId) -> Result<(), StoreError> {
        self.record(Call::Disable(session_id));
        if self.fail.disable {
            return Err(StoreError::Unavailable("session gone".into()));
        }
        Ok(())
    }

    async fn enable_controls(&self, session_id: SessionId) -> Result<(), StoreError> {
        self.record(Call::Enable(session_id));
        if self.fail.enable {
            return Err(StoreError::Unavailable("session gone".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl JobInfoLookup for FakePlatform {
    async fn get_job_info(&self, job_id: JobId) -> Result<JobInfo, StoreError> {
        self.record(Call::GetJob(job_id));
        self.jobs.get(&job_id).cloned().ok_or(StoreError::NotFound {
            entity: "job",
            id: job_id,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceBehavior {
    Succeed,
    Fail,
    Panic,
}

/// Model returning canned predictions.
#[derive(Debug)]
pub struct FakeModel {
    vocabulary: Vocabulary,
    settings: serde_json::Value,
    predictions: Vec<PredictionAnnotation>,
    behavior: InferenceBehavior,
    session_fails: bool,
    session_delay: Option<Duration>,
    inference_delay: Option<Duration>,
    requests: Mutex<Vec<InferenceRequest>>,
}

/// `car` (polygon) and `speed` (number).
pub fn model_vocabulary() -> Vocabulary {
    Vocabulary::new(
        SchemaCollection::from_items([ClassDef::new("car", GeometryKind::Polygon)]).unwrap(),
        SchemaCollection::from_items([TagDef::new("speed", TagValueType::AnyNumber)]).unwrap(),
    )
}

impl FakeModel {
    pub fn new() -> Self {
        Self {
            vocabulary: model_vocabulary(),
            settings: serde_json::json!({}),
            predictions: Vec::new(),
            behavior: InferenceBehavior::Succeed,
            session_fails: false,
            session_delay: None,
            inference_delay: None,
            requests: Mutex::default(),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_settings(mut self, settings: serde_json::Value) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_predictions(mut self, predictions: Vec<PredictionAnnotation>) -> Self {
        self.predictions = predictions;
        self
    }

    pub fn with_inference(mut self, behavior: InferenceBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn failing_session_info(mut self) -> Self {
        self.session_fails = true;
        self
    }

    pub fn with_session_delay(mut self, delay: Duration) -> Self {
        self.session_delay = Some(delay);
        self
    }

    pub fn with_inference_delay(mut self, delay: Duration) -> Self {
        self.inference_delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<InferenceRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for FakeModel {
    async fn session_info(&self) -> Result<SessionInfo, InferenceError> {
        if let Some(delay) = self.session_delay {
            tokio::time::sleep(delay).await;
        }
        if self.session_fails {
            return Err(InferenceError::Transport("connection refused".into()));
        }
        Ok(SessionInfo {
            model_name: "fake-detector".into(),
            details: serde_json::Map::new(),
        })
    }

    async fn model_vocabulary(&self) -> Result<Vocabulary, InferenceError> {
        Ok(self.vocabulary.clone())
    }

    async fn default_settings(&self) -> Result<serde_json::Value, InferenceError> {
        Ok(self.settings.clone())
    }

    async fn run_inference(
        &self,
        request: InferenceRequest,
    ) -> Result<Vec<PredictionAnnotation>, InferenceError> {
        self.requests.lock().unwrap().push(request);
        if let Some(delay) = self.inference_delay {
            tokio::time::sleep(delay).await;
        }
        match self.behavior {
            InferenceBehavior::Succeed => Ok(self.predictions.clone()),
            InferenceBehavior::Fail => Err(InferenceError::Timeout(Duration::from_secs(30))),
            InferenceBehavior::Panic => panic!("model worker crashed"),
        }
    }
}
