use std::path::PathBuf;
use std::process::Stdio;

use serde::Serialize;
use ytmp3_core::fs_paths::{AppPaths, DesktopPaths};

#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: String,
    pub installed: bool,
    pub path: Option<PathBuf>,
    pub version: Option<String>,
}

pub fn bin_name(tool: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.exe", tool)
    } else {
        tool.to_string()
    }
}

pub fn managed_tool_path(tool: &str) -> PathBuf {
    DesktopPaths.bin_dir().join(bin_name(tool))
}

fn version_flag_for(tool: &str) -> &'static str {
    match tool {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    }
}

pub async fn find_tool(tool: &str) -> Option<PathBuf> {
    let timer_start = std::time::Instant::now();
    let name = bin_name(tool);

    if let Ok(status) = crate::core::process::command(&name)
        .arg(version_flag_for(tool))
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        if status.success() {
            tracing::debug!("find_tool({}) took {:?}", tool, timer_start.elapsed());
            return Some(PathBuf::from(&name));
        }
    }

    let managed = managed_tool_path(tool);
    tracing::debug!("find_tool({}) took {:?}", tool, timer_start.elapsed());
    managed.exists().then_some(managed)
}

pub fn parse_version(tool: &str, stdout: &str) -> Option<String> {
    let first_line = stdout.lines().next()?.trim();
    if first_line.is_empty() {
        return None;
    }
    match tool {
        "ffmpeg" | "ffprobe" => first_line.split_whitespace().nth(2).map(|s| s.to_string()),
        _ => Some(first_line.to_string()),
    }
}

pub async fn check_tool(tool: &str) -> DependencyStatus {
    let path = find_tool(tool).await;
    let mut version = None;

    if let Some(p) = &path {
        match crate::core::process::command(p)
            .arg(version_flag_for(tool))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                version = parse_version(tool, &String::from_utf8_lossy(&output.stdout));
            }
            Ok(output) => {
                tracing::warn!("{} exited with {} on version check", tool, output.status);
            }
            Err(e) => tracing::warn!("Failed to run {}: {}", tool, e),
        }
    }

    DependencyStatus {
        name: tool.to_string(),
        installed: path.is_some(),
        path,
        version,
    }
}
