use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::sync::mpsc;

use crate::core::queue::ProgressThrottle;
use crate::models::media::{DownloadJob, DownloadResult};
use crate::models::settings::AppSettings;
use crate::platforms::traits::AudioDownloader;

pub mod config;
pub mod dependencies;
pub mod get;
pub mod quick;
pub mod search;
pub mod shell;

pub fn output_dir(flag: Option<PathBuf>, settings: &AppSettings) -> PathBuf {
    flag.unwrap_or_else(|| settings.download.default_output_dir.clone())
}

pub fn depth(flag: Option<u32>, settings: &AppSettings) -> u32 {
    flag.unwrap_or(settings.search.default_depth)
}

pub fn ensure_output_dir(dir: &Path) -> anyhow::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create output directory {}", dir.display()))?;
        tracing::info!("Created output directory at {}", dir.display());
    }
    Ok(())
}

/// Writes `prompt` and reads one trimmed line from stdin; `None` at EOF.
///
/// Stdin is read on the current worker thread, so this must run on the
/// multi-threaded runtime.
pub fn read_line(prompt: &str) -> std::io::Result<Option<String>> {
    tokio::task::block_in_place(|| {
        let mut out = std::io::stdout().lock();
        write!(out, "{}", prompt)?;
        out.flush()?;
        let mut line = String::new();
        if std::io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    })
}

/// Runs one download in the foreground, logging progress as it arrives.
pub async fn download_now(
    downloader: &dyn AudioDownloader,
    job: &DownloadJob,
) -> anyhow::Result<DownloadResult> {
    let (tx, mut rx) = mpsc::channel::<f64>(32);
    let title = job.title.clone();
    let reporter = tokio::spawn(async move {
        let mut throttle = ProgressThrottle::new(1_000);
        while let Some(percent) = rx.recv().await {
            if throttle.should_emit() || percent >= 100.0 {
                tracing::info!("{}: {:.1}%", title, percent);
            }
        }
    });

    let result = downloader.download(job, tx).await;
    let _ = reporter.await;
    result
}
