use ytmp3_core::core::events::{EventEmitter, QueueItemInfo, QueueItemProgress, QueueStatus};

/// Reports queue activity through tracing, for the terminal.
#[derive(Clone, Default)]
pub struct LogEventEmitter;

impl EventEmitter for LogEventEmitter {
    fn emit_queue_state(&self, items: &[QueueItemInfo]) {
        let pending = items
            .iter()
            .filter(|i| matches!(i.status, QueueStatus::Queued | QueueStatus::Active))
            .count();
        tracing::debug!("Queue: {} item(s), {} pending", items.len(), pending);
    }

    fn emit_progress(&self, progress: &QueueItemProgress) {
        tracing::debug!("[{}] {}: {:.1}%", progress.id, progress.title, progress.percent);
    }
}
