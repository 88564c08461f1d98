//! Platform identifiers and the selection context of a labeling session.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub type TeamId = u64;
pub type SessionId = u64;
pub type DatasetId = u64;
pub type ProjectId = u64;
pub type VideoId = u64;
pub type JobId = u64;
pub type UserId = u64;
pub type ObjectId = u64;
pub type FigureId = u64;
pub type ModelSessionId = u64;

/// What the labeler is looking at right now.
///
/// Replaced wholesale every time the labeling tool reports a selection
/// change; components receive it by value instead of reading shared globals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SessionContext {
    pub team_id: TeamId,
    pub session_id: SessionId,
    pub dataset_id: DatasetId,
    pub project_id: ProjectId,
    pub video_id: VideoId,
    pub frame_index: u32,
    pub user_id: UserId,
    #[serde(default)]
    pub job_id: Option<JobId>,
}

impl SessionContext {
    /// Same session, different frame.
    #[must_use]
    pub fn at_frame(&self, frame_index: u32) -> Self {
        Self {
            frame_index,
            ..self.clone()
        }
    }
}
