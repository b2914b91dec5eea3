use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use ytmp3_core::core::events::{EventEmitter, QueueItemInfo, QueueItemProgress, QueueStatus};

use crate::models::media::{DownloadJob, DownloadResult};
use crate::platforms::traits::AudioDownloader;

pub struct QueueItem {
    pub id: u64,
    pub job: DownloadJob,
    pub status: QueueStatus,
    pub percent: f64,
    pub file_path: Option<String>,
    pub file_size_bytes: Option<u64>,
}

impl QueueItem {
    pub fn to_info(&self) -> QueueItemInfo {
        QueueItemInfo {
            id: self.id,
            video_id: self.job.video_id.clone(),
            title: self.job.title.clone(),
            status: self.status.clone(),
            percent: self.percent,
            file_path: self.file_path.clone(),
            file_size_bytes: self.file_size_bytes,
        }
    }
}

/// Bookkeeping for every job handed to the queue, in arrival order.
#[derive(Default)]
pub struct QueueState {
    pub items: Vec<QueueItem>,
    next_id: u64,
}

impl QueueState {
    pub fn push(&mut self, job: DownloadJob) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(QueueItem {
            id,
            job,
            status: QueueStatus::Queued,
            percent: 0.0,
            file_path: None,
            file_size_bytes: None,
        });
        id
    }

    pub fn job(&self, id: u64) -> Option<DownloadJob> {
        self.items.iter().find(|i| i.id == id).map(|i| i.job.clone())
    }

    pub fn mark_active(&mut self, id: u64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.status = QueueStatus::Active;
        }
    }

    pub fn mark_complete(&mut self, id: u64, result: &anyhow::Result<DownloadResult>) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            match result {
                Ok(dl) => {
                    item.status = QueueStatus::Complete;
                    item.percent = 100.0;
                    item.file_path = Some(dl.file_path.to_string_lossy().to_string());
                    item.file_size_bytes = Some(dl.file_size_bytes);
                }
                Err(e) => {
                    item.status = QueueStatus::Error {
                        message: e.to_string(),
                    };
                }
            }
        }
    }

    pub fn update_progress(&mut self, id: u64, percent: f64) {
        if let Some(item) = self.items.iter_mut().find(|i| i.id == id) {
            item.percent = percent;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|i| !i.status.is_finished()).count()
    }

    pub fn get_state(&self) -> Vec<QueueItemInfo> {
        self.items.iter().map(|i| i.to_info()).collect()
    }
}

pub struct ProgressThrottle {
    last_emit: Option<std::time::Instant>,
    min_interval: std::time::Duration,
}

impl ProgressThrottle {
    pub fn new(min_interval_ms: u64) -> Self {
        Self {
            last_emit: None,
            min_interval: std::time::Duration::from_millis(min_interval_ms),
        }
    }

    pub fn should_emit(&mut self) -> bool {
        let now = std::time::Instant::now();
        match self.last_emit {
            Some(last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emit = Some(now);
                true
            }
        }
    }
}

/// FIFO of download jobs drained by a single background worker.
///
/// Producers never wait on downloads: `enqueue` records the job and returns.
/// The worker runs one job at a time to completion; failures are logged and
/// recorded, never retried.
pub struct DownloadQueue<E: EventEmitter> {
    state: Arc<Mutex<QueueState>>,
    sender: Option<mpsc::UnboundedSender<u64>>,
    worker: Option<JoinHandle<()>>,
    cancel_token: CancellationToken,
    emitter: E,
}

impl<E: EventEmitter> DownloadQueue<E> {
    pub fn start(downloader: Arc<dyn AudioDownloader>, emitter: E) -> Self {
        let state = Arc::new(Mutex::new(QueueState::default()));
        let (sender, receiver) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        let worker = tokio::spawn(run_worker(
            state.clone(),
            receiver,
            downloader,
            emitter.clone(),
            cancel_token.clone(),
        ));

        Self {
            state,
            sender: Some(sender),
            worker: Some(worker),
            cancel_token,
            emitter,
        }
    }

    pub async fn enqueue(&self, job: DownloadJob) -> anyhow::Result<u64> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Download queue is closed"))?;

        let mut q = self.state.lock().await;
        let title = job.title.clone();
        let id = q.push(job);
        if sender.send(id).is_err() {
            q.mark_complete(id, &Err(anyhow::anyhow!("Download worker stopped")));
            return Err(anyhow::anyhow!("Download worker stopped"));
        }
        tracing::info!("Queued '{}' as #{}", title, id);
        self.emitter.emit_queue_state(&q.get_state());
        Ok(id)
    }

    pub async fn snapshot(&self) -> Vec<QueueItemInfo> {
        self.state.lock().await.get_state()
    }

    pub async fn pending_count(&self) -> usize {
        self.state.lock().await.pending_count()
    }

    /// Stops accepting jobs. With `wait` the worker finishes everything
    /// already queued; without it the current download is abandoned.
    pub async fn shutdown(mut self, wait: bool) {
        self.sender.take();
        if !wait {
            self.cancel_token.cancel();
        }
        if let Some(worker) = self.worker.take() {
            if let Err(e) = worker.await {
                tracing::error!("Download worker panicked: {}", e);
            }
        }
    }
}

impl<E: EventEmitter> Drop for DownloadQueue<E> {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn run_worker<E: EventEmitter>(
    state: Arc<Mutex<QueueState>>,
    mut receiver: mpsc::UnboundedReceiver<u64>,
    downloader: Arc<dyn AudioDownloader>,
    emitter: E,
    cancel_token: CancellationToken,
) {
    loop {
        let id = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            next = receiver.recv() => match next {
                Some(id) => id,
                None => break,
            },
        };

        let job = {
            let mut q = state.lock().await;
            let Some(job) = q.job(id) else { continue };
            q.mark_active(id);
            emitter.emit_queue_state(&q.get_state());
            job
        };

        let (tx, mut rx) = mpsc::channel::<f64>(32);
        let state_progress = state.clone();
        let emitter_progress = emitter.clone();
        let title = job.title.clone();
        let progress_forwarder = tokio::spawn(async move {
            let mut throttle = ProgressThrottle::new(250);
            while let Some(percent) = rx.recv().await {
                if !throttle.should_emit() && percent < 100.0 {
                    continue;
                }
                state_progress.lock().await.update_progress(id, percent);
                emitter_progress.emit_progress(&QueueItemProgress {
                    id,
                    title: title.clone(),
                    percent,
                });
            }
        });

        let result = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => Err(anyhow::anyhow!("Download cancelled")),
            r = downloader.download(&job, tx) => r,
        };

        let _ = progress_forwarder.await;

        match &result {
            Ok(dl) => tracing::info!("#{} '{}' saved to {}", id, job.title, dl.file_path.display()),
            Err(e) => tracing::error!("#{} '{}' failed: {}", id, job.title, e),
        }

        let mut q = state.lock().await;
        q.mark_complete(id, &result);
        emitter.emit_queue_state(&q.get_state());
    }

    tracing::debug!("Download worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::core::events::LogEventEmitter;

    /// Records call order and the peak number of overlapping downloads.
    #[derive(Default)]
    struct FakeDownloader {
        calls: std::sync::Mutex<Vec<String>>,
        running: AtomicUsize,
        peak: AtomicUsize,
        delay_ms: u64,
    }

    #[async_trait]
    impl AudioDownloader for FakeDownloader {
        fn name(&self) -> &str {
            "fake"
        }

        async fn download(
            &self,
            job: &DownloadJob,
            progress: mpsc::Sender<f64>,
        ) -> anyhow::Result<DownloadResult> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(job.video_id.clone());

            let _ = progress.send(50.0).await;
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
            self.running.fetch_sub(1, Ordering::SeqCst);

            if job.video_id.starts_with("bad") {
                anyhow::bail!("extractor error for {}", job.video_id);
            }
            Ok(DownloadResult {
                file_path: job.output_dir.join(format!("{}.mp3", job.title)),
                file_size_bytes: 42,
            })
        }
    }

    fn job(id: &str) -> DownloadJob {
        DownloadJob {
            video_id: id.into(),
            title: format!("title {}", id),
            output_dir: PathBuf::from("out"),
        }
    }

    fn fake(delay_ms: u64) -> Arc<FakeDownloader> {
        Arc::new(FakeDownloader {
            delay_ms,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn runs_jobs_in_order_one_at_a_time() {
        let downloader = fake(20);
        let queue = DownloadQueue::start(downloader.clone(), LogEventEmitter);
        for id in ["a", "b", "c"] {
            queue.enqueue(job(id)).await.unwrap();
        }
        queue.shutdown(true).await;

        assert_eq!(*downloader.calls.lock().unwrap(), vec!["a", "b", "c"]);
        assert_eq!(downloader.peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn enqueue_does_not_wait_for_downloads() {
        let downloader = fake(5_000);
        let queue = DownloadQueue::start(downloader, LogEventEmitter);
        let started = std::time::Instant::now();
        queue.enqueue(job("a")).await.unwrap();
        queue.enqueue(job("b")).await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(queue.pending_count().await, 2);
        queue.shutdown(false).await;
    }

    #[tokio::test]
    async fn failure_does_not_stop_later_jobs() {
        let downloader = fake(1);
        let queue = DownloadQueue::start(downloader.clone(), LogEventEmitter);
        queue.enqueue(job("bad1")).await.unwrap();
        queue.enqueue(job("good")).await.unwrap();

        for _ in 0..200 {
            if queue.pending_count().await == 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let state = queue.snapshot().await;
        assert!(matches!(&state[0].status, QueueStatus::Error { message } if message.contains("bad1")));
        assert_eq!(state[1].status, QueueStatus::Complete);
        assert_eq!(state[1].percent, 100.0);
        assert_eq!(state[1].file_size_bytes, Some(42));
        queue.shutdown(true).await;
    }

    #[tokio::test]
    async fn shutdown_without_wait_abandons_pending_work() {
        let downloader = fake(5_000);
        let queue = DownloadQueue::start(downloader.clone(), LogEventEmitter);
        queue.enqueue(job("a")).await.unwrap();
        queue.enqueue(job("b")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        tokio::time::timeout(Duration::from_secs(2), queue.shutdown(false))
            .await
            .expect("shutdown should not wait for downloads");
        assert_eq!(*downloader.calls.lock().unwrap(), vec!["a"]);
    }

    #[test]
    fn ids_are_sequential() {
        let mut state = QueueState::default();
        assert_eq!(state.push(job("a")), 1);
        assert_eq!(state.push(job("b")), 2);
        assert_eq!(state.pending_count(), 2);
        state.mark_active(1);
        state.mark_complete(1, &Err(anyhow::anyhow!("x")));
        assert_eq!(state.pending_count(), 1);
        assert_eq!(state.get_state()[0].status.label(), "failed");
    }

    #[test]
    fn throttle_allows_first_emit() {
        let mut throttle = ProgressThrottle::new(10_000);
        assert!(throttle.should_emit());
        assert!(!throttle.should_emit());
    }
}
