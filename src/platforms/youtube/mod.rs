use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::{mpsc, OnceCell};

use crate::core::ytdlp;
use crate::models::media::{AudioOptions, DownloadJob, DownloadResult};
use crate::platforms::traits::AudioDownloader;

/// Saves a YouTube video's audio track through yt-dlp. The yt-dlp binary is
/// located (or fetched) on first use and reused afterwards.
pub struct YouTubeAudioDownloader {
    options: AudioOptions,
    ytdlp_path: OnceCell<PathBuf>,
}

impl Default for YouTubeAudioDownloader {
    fn default() -> Self {
        Self::new(AudioOptions::default())
    }
}

impl YouTubeAudioDownloader {
    pub fn new(options: AudioOptions) -> Self {
        Self {
            options,
            ytdlp_path: OnceCell::new(),
        }
    }

    pub fn with_ytdlp(options: AudioOptions, ytdlp_path: PathBuf) -> Self {
        Self {
            options,
            ytdlp_path: OnceCell::new_with(Some(ytdlp_path)),
        }
    }

    async fn ytdlp(&self) -> anyhow::Result<&PathBuf> {
        self.ytdlp_path.get_or_try_init(ytdlp::ensure_ytdlp).await
    }
}

#[async_trait]
impl AudioDownloader for YouTubeAudioDownloader {
    fn name(&self) -> &str {
        "youtube"
    }

    async fn download(
        &self,
        job: &DownloadJob,
        progress: mpsc::Sender<f64>,
    ) -> anyhow::Result<DownloadResult> {
        let ytdlp_path = self.ytdlp().await?;
        tracing::info!("Preparing to download '{}'", job.title);
        let result = ytdlp::download_audio(ytdlp_path, job, &self.options, progress).await?;
        tracing::info!(
            "Download completed and saved to {} ({} bytes)",
            result.file_path.display(),
            result.file_size_bytes
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_surfaces_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = YouTubeAudioDownloader::with_ytdlp(
            AudioOptions::default(),
            dir.path().join("no-such-yt-dlp"),
        );
        let job = DownloadJob {
            video_id: "abc".into(),
            title: "Song".into(),
            output_dir: dir.path().join("out"),
        };
        let (tx, _rx) = mpsc::channel(4);
        let err = downloader.download(&job, tx).await.unwrap_err();
        assert!(err.to_string().contains("Failed to start yt-dlp"));
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn name_is_youtube() {
        assert_eq!(YouTubeAudioDownloader::default().name(), "youtube");
    }
}
