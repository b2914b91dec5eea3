use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use ytmp3_core::core::events::{EventEmitter, QueueItemInfo, QueueStatus};

use crate::cli::ShellArgs;
use crate::core::events::LogEventEmitter;
use crate::core::queue::DownloadQueue;
use crate::core::search::SearchClient;
use crate::core::select::{self, Selection};
use crate::models::media::{AudioOptions, DownloadJob};
use crate::models::settings::AppSettings;
use crate::platforms::youtube::YouTubeAudioDownloader;

#[derive(Debug, PartialEq)]
pub enum ShellCommand {
    Empty,
    Status,
    Quit,
    Query(String),
}

pub fn parse_command(line: &str) -> ShellCommand {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => ShellCommand::Empty,
        "status" | ":status" => ShellCommand::Status,
        "quit" | "exit" | ":q" => ShellCommand::Quit,
        _ => ShellCommand::Query(line.to_string()),
    }
}

/// An empty answer picks the first result.
pub fn parse_pick(text: &str, count: usize) -> Selection {
    if text.trim().is_empty() {
        Selection::Chosen(0)
    } else {
        select::parse_choice(text, count)
    }
}

pub fn render_status<W: Write>(items: &[QueueItemInfo], out: &mut W) -> std::io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Nothing queued yet");
    }
    for item in items {
        write!(
            out,
            "#{} [{}] {:>5.1}% {}",
            item.id,
            item.status.label(),
            item.percent,
            item.title
        )?;
        match (&item.status, &item.file_path) {
            (QueueStatus::Error { message }, _) => write!(out, " ({})", message)?,
            (_, Some(path)) => write!(out, " -> {}", path)?,
            _ => {}
        }
        writeln!(out)?;
    }
    Ok(())
}

async fn handle_query<E: EventEmitter>(
    query: &str,
    depth: u32,
    output: &Path,
    client: &SearchClient,
    queue: &DownloadQueue<E>,
) -> anyhow::Result<()> {
    let response = match client.search(query, depth).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("{:#}", e);
            return Ok(());
        }
    };

    if response.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    select::print_results(&response.items, &mut std::io::stdout().lock())?;
    let Some(answer) = super::read_line("Pick a number (Enter for 1): ")? else {
        return Ok(());
    };

    let selection = parse_pick(&answer, response.items.len());
    if let Some(item) = select::resolve(&response.items, &selection) {
        queue.enqueue(DownloadJob::new(item, output)).await?;
    }
    Ok(())
}

pub async fn run(args: ShellArgs, settings: &AppSettings) -> anyhow::Result<()> {
    let output = super::output_dir(args.output, settings);
    super::ensure_output_dir(&output)?;
    let depth = super::depth(args.depth, settings);

    let client = SearchClient::new(&settings.search)?;
    let downloader = Arc::new(YouTubeAudioDownloader::new(AudioOptions::from(
        &settings.download,
    )));
    let queue = DownloadQueue::start(downloader, LogEventEmitter);

    println!("Type a search query, 'status' to list downloads, 'quit' to leave.");
    loop {
        let Some(line) = super::read_line("query> ")? else {
            break;
        };

        match parse_command(&line) {
            ShellCommand::Empty => continue,
            ShellCommand::Quit => break,
            ShellCommand::Status => {
                render_status(&queue.snapshot().await, &mut std::io::stdout().lock())?
            }
            ShellCommand::Query(query) => {
                if let Err(e) = handle_query(&query, depth, &output, &client, &queue).await {
                    tracing::error!("{:#}", e);
                }
            }
        }
    }

    let pending = queue.pending_count().await;
    if pending > 0 {
        if args.wait {
            tracing::info!("Waiting for {} download(s) to finish", pending);
        } else {
            tracing::warn!("Exiting with {} download(s) unfinished", pending);
        }
    }
    queue.shutdown(args.wait).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_builtins() {
        assert_eq!(parse_command("   "), ShellCommand::Empty);
        assert_eq!(parse_command("STATUS"), ShellCommand::Status);
        assert_eq!(parse_command("quit"), ShellCommand::Quit);
        assert_eq!(parse_command("exit"), ShellCommand::Quit);
        assert_eq!(
            parse_command("  boards of canada "),
            ShellCommand::Query("boards of canada".into())
        );
    }

    #[test]
    fn empty_pick_is_first() {
        assert_eq!(parse_pick("", 3), Selection::Chosen(0));
        assert_eq!(parse_pick("2", 3), Selection::Chosen(1));
        assert_eq!(parse_pick("5", 3), Selection::OutOfRange(5));
    }

    #[test]
    fn status_lists_outcomes() {
        let items = vec![
            QueueItemInfo {
                id: 1,
                video_id: "a".into(),
                title: "Song A".into(),
                status: QueueStatus::Complete,
                percent: 100.0,
                file_path: Some("output/Song A.mp3".into()),
                file_size_bytes: Some(10),
            },
            QueueItemInfo {
                id: 2,
                video_id: "b".into(),
                title: "Song B".into(),
                status: QueueStatus::Error {
                    message: "HTTP 403".into(),
                },
                percent: 12.0,
                file_path: None,
                file_size_bytes: None,
            },
        ];
        let mut out = Vec::new();
        render_status(&items, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "#1 [done] 100.0% Song A -> output/Song A.mp3\n#2 [failed]  12.0% Song B (HTTP 403)\n"
        );
    }

    #[test]
    fn empty_status() {
        let mut out = Vec::new();
        render_status(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Nothing queued yet\n");
    }
}
