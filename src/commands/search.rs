use std::io::Write;

use crate::cli::{join_words, SearchArgs};
use crate::core::search::SearchClient;
use crate::models::search::SearchItem;
use crate::models::settings::AppSettings;

pub fn render_results<W: Write>(items: &[SearchItem], out: &mut W) -> std::io::Result<()> {
    for (index, item) in items.iter().enumerate() {
        write!(out, "{:>2}. {} [{}]", index + 1, item.title, item.video_id)?;
        if let Some(channel) = item.channel_title.as_deref().filter(|c| !c.is_empty()) {
            write!(out, " by {}", channel)?;
        }
        if let Some(published) = item.published_at.as_deref() {
            // RFC 3339 timestamps; the date part is enough.
            let date = published.get(..10).unwrap_or(published);
            write!(out, " ({})", date)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub async fn run(args: SearchArgs, settings: &AppSettings) -> anyhow::Result<()> {
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

    render_results(&response.items, &mut std::io::stdout().lock())?;
    Ok(())
}
