use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum QueueStatus {
    Queued,
    Active,
    Complete,
    Error { message: String },
}

impl QueueStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, QueueStatus::Complete | QueueStatus::Error { .. })
    }

    pub fn label(&self) -> &str {
        match self {
            QueueStatus::Queued => "queued",
            QueueStatus::Active => "active",
            QueueStatus::Complete => "done",
            QueueStatus::Error { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueItemInfo {
    pub id: u64,
    pub video_id: String,
    pub title: String,
    pub status: QueueStatus,
    pub percent: f64,
    pub file_path: Option<String>,
    pub file_size_bytes: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueueItemProgress {
    pub id: u64,
    pub title: String,
    pub percent: f64,
}

pub trait EventEmitter: Send + Sync + Clone + 'static {
    fn emit_queue_state(&self, items: &[QueueItemInfo]);
    fn emit_progress(&self, progress: &QueueItemProgress);
}
