use std::io::Write;

use crate::core::dependencies::{self, DependencyStatus};

pub fn render_status<W: Write>(statuses: &[DependencyStatus], out: &mut W) -> std::io::Result<()> {
    for status in statuses {
        match (&status.path, &status.version) {
            (Some(path), Some(version)) => {
                writeln!(out, "{:<8} {} ({})", status.name, version, path.display())?
            }
            (Some(path), None) => {
                writeln!(out, "{:<8} found, version unknown ({})", status.name, path.display())?
            }
            _ => writeln!(out, "{:<8} missing", status.name)?,
        }
    }
    Ok(())
}

pub async fn run() -> anyhow::Result<()> {
    let (ytdlp, ffmpeg) = tokio::join!(
        dependencies::check_tool("yt-dlp"),
        dependencies::check_tool("ffmpeg"),
    );

    if !ytdlp.installed {
        tracing::warn!("yt-dlp will be downloaded on first use");
    }
    if !ffmpeg.installed {
        tracing::warn!("ffmpeg is required to convert audio to MP3");
    }

    render_status(&[ytdlp, ffmpeg], &mut std::io::stdout().lock())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn renders_each_state() {
        let statuses = vec![
            DependencyStatus {
                name: "yt-dlp".into(),
                installed: true,
                path: Some(PathBuf::from("yt-dlp")),
                version: Some("2024.08.06".into()),
            },
            DependencyStatus {
                name: "ffmpeg".into(),
                installed: false,
                path: None,
                version: None,
            },
        ];
        let mut out = Vec::new();
        render_status(&statuses, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("yt-dlp   2024.08.06 (yt-dlp)"));
        assert!(text.contains("ffmpeg   missing"));
    }
}
