use std::io::{BufRead, Write};

use crate::cli::{join_words, GetArgs};
use crate::core::search::SearchClient;
use crate::core::select;
use crate::models::media::{AudioOptions, DownloadJob};
use crate::models::search::SearchItem;
use crate::models::settings::AppSettings;
use crate::platforms::youtube::YouTubeAudioDownloader;

/// The item to download: the user's pick with `select`, else the first result.
pub fn pick_item<R: BufRead, W: Write>(
    items: &[SearchItem],
    select: bool,
    input: &mut R,
    out: &mut W,
) -> std::io::Result<Option<SearchItem>> {
    if items.is_empty() {
        return Ok(None);
    }

    if select {
        let selection = select::prompt_selection(items, input, out)?;
        return Ok(select::resolve(items, &selection).cloned());
    }

    let first = items[0].clone();
    tracing::info!("Auto-selected first result: {}", first.title);
    Ok(Some(first))
}

pub async fn run(args: GetArgs, settings: &AppSettings) -> anyhow::Result<()> {
    let output = super::output_dir(args.output, settings);
    super::ensure_output_dir(&output)?;

    let query = join_words(&args.query);
    let client = SearchClient::new(&settings.search)?;
    let depth = super::depth(args.depth, settings);

    let response = match client.search_filtered(&query, depth, args.force.as_deref()).await {
        Ok(r) => r,
        Err(e) => {
            tracing::error!("{:#}", e);
            return Ok(());
        }
    };

    if response.is_empty() {
        tracing::info!("No results found for '{}'", query);
        return Ok(());
    }

    let picked = tokio::task::block_in_place(|| {
        pick_item(
            &response.items,
            args.select,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout(),
        )
    })?;

    let Some(item) = picked else {
        tracing::info!("No suitable video found for download");
        return Ok(());
    };

    if args.confirm {
        let confirmed = tokio::task::block_in_place(|| {
            select::confirm_download(
                &item.title,
                &mut std::io::stdin().lock(),
                &mut std::io::stdout(),
            )
        })?;
        if !confirmed {
            tracing::info!("Download canceled by user");
            return Ok(());
        }
    }

    let downloader = YouTubeAudioDownloader::new(AudioOptions::from(&settings.download));
    if let Err(e) = super::download_now(&downloader, &DownloadJob::new(&item, &output)).await {
        tracing::error!("Download of '{}' failed: {:#}", item.title, e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn items() -> Vec<SearchItem> {
        vec![SearchItem::new("a", "First"), SearchItem::new("b", "Second")]
    }

    fn pick(select: bool, input: &str) -> Option<SearchItem> {
        let mut out = Vec::new();
        pick_item(&items(), select, &mut Cursor::new(input.as_bytes()), &mut out).unwrap()
    }

    #[test]
    fn without_select_takes_first() {
        assert_eq!(pick(false, "").unwrap().video_id, "a");
    }

    #[test]
    fn with_select_takes_the_pick() {
        assert_eq!(pick(true, "2\n").unwrap().video_id, "b");
    }

    #[test]
    fn out_of_range_pick_downloads_nothing() {
        assert!(pick(true, "3\n").is_none());
        assert!(pick(true, "zero\n").is_none());
    }

    #[test]
    fn no_items_no_pick() {
        let mut out = Vec::new();
        let picked = pick_item(&[], true, &mut Cursor::new(&b"1\n"[..]), &mut out).unwrap();
        assert!(picked.is_none());
        assert!(out.is_empty());
    }
}
