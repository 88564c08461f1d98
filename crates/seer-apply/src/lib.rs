//! # seer-apply
//!
//! Runs a deployed model over one video frame and folds its prediction into
//! the labeling project.
//!
//! An apply is a single critical section over the labeling session's edit
//! controls: disable them, call the model for exactly one frame, reconcile
//! the model vocabulary into the project vocabulary, persist the vocabulary
//! and the remapped annotation, then re-enable the controls whatever
//! happened in between.
//!
//! The remote services (model, vocabulary store, annotation store, edit
//! controls, job lookup) are traits in [`collaborators`]; the host injects
//! implementations. Per-project vocabulary state lives in an explicit
//! [`VocabularyCache`] owned by the host rather than in process globals.

pub mod cache;
pub mod clock;
pub mod collaborators;
pub mod connection;
pub mod error;
pub mod orchestrator;
pub mod scope;
pub mod session;

#[cfg(test)]
mod test_support;

pub use cache::{ProjectVocabulary, VocabularyCache};
pub use clock::{RequestClock, RequestTicket};
pub use collaborators::{
    AnnotationStore, EditControlGate, InferenceClient, InferenceRequest, JobInfoLookup,
    SessionInfo, TagTarget, VocabularyStore,
};
pub use connection::ModelConnection;
pub use error::{ApplyError, ApplyFailed, ConnectionError, InferenceError, StoreError};
pub use orchestrator::{
    ApplyContext, ApplyOptions, ApplyOrchestrator, ApplyOutcome, ApplyReport, policy_from_config,
};
pub use scope::{ScopeTracker, effective_keep_set, resolve_scope};
pub use session::LabelingSession;
