use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{anyhow, Context};
use futures::StreamExt;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::core::dependencies;
use crate::core::filename::{audio_file_stem, escape_output_template};
use crate::models::media::{AudioOptions, DownloadJob, DownloadResult};

const TOOL: &str = "yt-dlp";

pub async fn find_ytdlp() -> Option<PathBuf> {
    dependencies::find_tool(TOOL).await
}

pub async fn ensure_ytdlp() -> anyhow::Result<PathBuf> {
    if let Some(path) = find_ytdlp().await {
        tracing::debug!("Using yt-dlp at {}", path.display());
        return Ok(path);
    }

    download_ytdlp_binary().await
}

fn release_url() -> &'static str {
    if cfg!(target_os = "windows") {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp.exe"
    } else if cfg!(target_os = "macos") {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp_macos"
    } else {
        "https://github.com/yt-dlp/yt-dlp/releases/latest/download/yt-dlp"
    }
}

async fn download_ytdlp_binary() -> anyhow::Result<PathBuf> {
    let target = dependencies::managed_tool_path(TOOL);
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let client = crate::core::http_client::apply_global_proxy(reqwest::Client::builder())
        .timeout(std::time::Duration::from_secs(120))
        .build()?;

    let url = release_url();
    tracing::info!("yt-dlp not found, downloading it from {}", url);
    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(anyhow!("Failed to download yt-dlp: HTTP {}", response.status()));
    }

    save_response(response, &target).await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o755);
        tokio::fs::set_permissions(&target, perms).await?;
    }

    tracing::info!("yt-dlp installed to {}", target.display());
    Ok(target)
}

/// Streams `response` into `<target>.part`, then renames it over `target`.
/// A failed transfer leaves neither file behind.
async fn save_response(response: reqwest::Response, target: &Path) -> anyhow::Result<()> {
    let temp_path = target.with_extension("part");
    let written = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| anyhow!("Stream error: {}", e))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        anyhow::Ok(())
    }
    .await;

    if let Err(e) = written {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }
    tokio::fs::rename(&temp_path, target).await?;
    Ok(())
}

pub fn build_audio_args(job: &DownloadJob, opts: &AudioOptions) -> Vec<String> {
    let stem = escape_output_template(&audio_file_stem(&job.title));
    let output_template = job
        .output_dir
        .join(format!("{}.%(ext)s", stem))
        .to_string_lossy()
        .to_string();

    let mut args = vec![
        "-f".to_string(),
        "bestaudio/best".to_string(),
        "-x".to_string(),
        "--audio-format".to_string(),
        opts.audio_format.clone(),
        "--audio-quality".to_string(),
        opts.audio_quality.clone(),
        "--no-playlist".to_string(),
        "--no-warnings".to_string(),
        "--newline".to_string(),
        "--progress-template".to_string(),
        "download:%(progress._percent_str)s".to_string(),
    ];

    if let Some(proxy) = crate::core::http_client::proxy_url() {
        args.push("--proxy".to_string());
        args.push(proxy);
    }

    args.extend(opts.extra_flags.iter().cloned());
    args.extend(["-o".to_string(), output_template, job.watch_url()]);
    args
}

pub async fn download_audio(
    ytdlp: &Path,
    job: &DownloadJob,
    opts: &AudioOptions,
    progress: mpsc::Sender<f64>,
) -> anyhow::Result<DownloadResult> {
    tokio::fs::create_dir_all(&job.output_dir)
        .await
        .with_context(|| format!("Cannot create {}", job.output_dir.display()))?;

    let args = build_audio_args(job, opts);
    tracing::debug!("yt-dlp {}", args.join(" "));

    let mut child = crate::core::process::command(ytdlp)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| anyhow!("Failed to start yt-dlp: {}", e))?;

    let stdout = child.stdout.take().ok_or_else(|| anyhow!("yt-dlp has no stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| anyhow!("yt-dlp has no stderr"))?;

    let progress_tx = progress.clone();
    let line_reader = tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(pct) = parse_progress_line(&line) {
                let _ = progress_tx.send(pct).await;
            } else {
                tracing::trace!("yt-dlp: {}", line);
            }
        }
    });

    let err_reader = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut last_error = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            tracing::debug!("yt-dlp stderr: {}", line);
            if !line.trim().is_empty() {
                last_error = line;
            }
        }
        last_error
    });

    let status = child
        .wait()
        .await
        .map_err(|e| anyhow!("yt-dlp process failed: {}", e))?;

    let _ = line_reader.await;
    let last_error = err_reader.await.unwrap_or_default();

    if !status.success() {
        if last_error.is_empty() {
            return Err(anyhow!("yt-dlp exited with {}", status));
        }
        return Err(anyhow!("yt-dlp exited with {}: {}", status, last_error.trim()));
    }

    let _ = progress.send(100.0).await;

    let file_path = find_downloaded_file(job, &opts.audio_format).await?;
    let meta = tokio::fs::metadata(&file_path).await?;

    Ok(DownloadResult {
        file_path,
        file_size_bytes: meta.len(),
    })
}

pub fn parse_progress_line(line: &str) -> Option<f64> {
    let line = line.trim();
    let pct_str = if let Some(rest) = line.strip_prefix("download:") {
        rest.trim().trim_end_matches('%')
    } else if line.ends_with('%') {
        line.trim_end_matches('%').split_whitespace().last()?
    } else {
        return None;
    };

    pct_str.trim().parse::<f64>().ok()
}

/// The expected `<stem>.<format>` if present, otherwise the newest finished
/// `<stem>.<any ext>` in the output dir.
pub async fn find_downloaded_file(job: &DownloadJob, audio_format: &str) -> anyhow::Result<PathBuf> {
    let stem = audio_file_stem(&job.title);
    let expected = job.output_dir.join(format!("{}.{}", stem, audio_format));
    if tokio::fs::try_exists(&expected).await.unwrap_or(false) {
        return Ok(expected);
    }

    let prefix = format!("{}.", stem);
    let mut entries = tokio::fs::read_dir(&job.output_dir).await?;
    let mut best: Option<(PathBuf, std::time::SystemTime)> = None;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if name.ends_with(".part") || name.ends_with(".ytdl") || name.starts_with('.') {
            continue;
        }
        if !name.starts_with(&prefix) {
            continue;
        }

        if let Ok(modified) = entry.metadata().await.and_then(|m| m.modified()) {
            match &best {
                Some((_, best_time)) if modified <= *best_time => {}
                _ => best = Some((path, modified)),
            }
        }
    }

    best.map(|(p, _)| p)
        .ok_or_else(|| anyhow!("Downloaded file not found in {}", job.output_dir.display()))
}
