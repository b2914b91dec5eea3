use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use ytmp3_core::models::search::{SearchItem, WATCH_URL_BASE};
use ytmp3_core::models::settings::DownloadSettings;

/// One unit of work for the downloader: which video, what to call it, where
/// to put it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadJob {
    pub video_id: String,
    pub title: String,
    pub output_dir: PathBuf,
}

impl DownloadJob {
    pub fn new(item: &SearchItem, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            video_id: item.video_id.clone(),
            title: item.title.clone(),
            output_dir: output_dir.into(),
        }
    }

    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_BASE, self.video_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioOptions {
    pub audio_format: String,
    pub audio_quality: String,
    pub extra_flags: Vec<String>,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self::from(&DownloadSettings::default())
    }
}

impl From<&DownloadSettings> for AudioOptions {
    fn from(s: &DownloadSettings) -> Self {
        Self {
            audio_format: s.audio_format.clone(),
            audio_quality: s.audio_quality.clone(),
            extra_flags: s.extra_ytdlp_flags.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResult {
    pub file_path: PathBuf,
    pub file_size_bytes: u64,
}
