use async_trait::async_trait;

use crate::models::media::{DownloadJob, DownloadResult};

#[async_trait]
pub trait AudioDownloader: Send + Sync {
    fn name(&self) -> &str;
    async fn download(
        &self,
        job: &DownloadJob,
        progress: tokio::sync::mpsc::Sender<f64>,
    ) -> anyhow::Result<DownloadResult>;
}
