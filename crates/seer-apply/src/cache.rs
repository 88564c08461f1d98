//! Per-project vocabulary cache.
//!
//! Each project id gets its own async mutex. Holding a [`ProjectVocabulary`]
//! gives exclusive access to that project's cached vocabulary for the span of
//! a reconcile + persist, while other projects proceed independently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use seer_core::Vocabulary;
use seer_core::ids::ProjectId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::collaborators::VocabularyStore;
use crate::error::StoreError;

type Slot = Arc<AsyncMutex<Option<Vocabulary>>>;

#[derive(Debug, Default)]
pub struct VocabularyCache {
    slots: Mutex<HashMap<ProjectId, Slot>>,
}

impl VocabularyCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, project_id: ProjectId) -> Slot {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(project_id).or_default())
    }

    /// Exclusive access to one project's entry. Waits for other holders.
    pub async fn lock(&self, project_id: ProjectId) -> ProjectVocabulary {
        ProjectVocabulary {
            project_id,
            guard: self.slot(project_id).lock_owned().await,
        }
    }

    /// Fetch the project's vocabulary from `store` unless already cached.
    pub async fn warm<S: VocabularyStore>(
        &self,
        store: &S,
        project_id: ProjectId,
    ) -> Result<(), StoreError> {
        self.lock(project_id).await.load(store).await.map(|_| ())
    }

    /// Copy of the cached vocabulary, if any.
    pub async fn get(&self, project_id: ProjectId) -> Option<Vocabulary> {
        self.lock(project_id).await.cached().cloned()
    }
}

/// Locked cache entry for one project.
pub struct ProjectVocabulary {
    project_id: ProjectId,
    guard: OwnedMutexGuard<Option<Vocabulary>>,
}

impl ProjectVocabulary {
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    #[must_use]
    pub fn cached(&self) -> Option<&Vocabulary> {
        self.guard.as_ref()
    }

    /// Cached vocabulary, fetched from `store` on a miss.
    pub async fn load<S: VocabularyStore>(&mut self, store: &S) -> Result<&Vocabulary, StoreError> {
        if self.guard.is_none() {
            let vocabulary = store.get_vocabulary(self.project_id).await?;
            tracing::debug!(
                project_id = self.project_id,
                classes = vocabulary.classes.len(),
                tags = vocabulary.tags.len(),
                "cached project vocabulary"
            );
            *self.guard = Some(vocabulary);
        }
        self.guard
            .as_ref()
            .ok_or(StoreError::NotFound {
                entity: "vocabulary",
                id: self.project_id,
            })
    }

    pub fn replace(&mut self, vocabulary: Vocabulary) {
        *self.guard = Some(vocabulary);
    }
}
