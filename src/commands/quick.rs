use crate::cli::{join_words, QuickArgs};
use crate::core::search::SearchClient;
use crate::models::media::{AudioOptions, DownloadJob};
use crate::models::search::SearchItem;
use crate::models::settings::AppSettings;
use crate::platforms::youtube::YouTubeAudioDownloader;

/// The top video for `title`. A page of `depth` results is requested because
/// the API's top hits are often channels or playlists, which carry no video.
pub async fn first_video(
    client: &SearchClient,
    title: &str,
    depth: u32,
) -> anyhow::Result<Option<SearchItem>> {
    let response = client.search(title, depth).await?;
    Ok(response.items.into_iter().next())
}

pub async fn run(args: QuickArgs, settings: &AppSettings) -> anyhow::Result<()> {
    let output = super::output_dir(args.output, settings);
    super::ensure_output_dir(&output)?;

    let title = join_words(&args.title);
    let client = SearchClient::new(&settings.search)?;
    let item = match first_video(&client, &title, super::depth(None, settings)).await {
        Ok(Some(item)) => item,
        Ok(None) => {
            tracing::info!("No video found for '{}'", title);
            return Ok(());
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            return Ok(());
        }
    };

    println!("Downloading: {}", item.title);
    let downloader = YouTubeAudioDownloader::new(AudioOptions::from(&settings.download));
    if let Err(e) = super::download_now(&downloader, &DownloadJob::new(&item, &output)).await {
        tracing::error!("Download of '{}' failed: {:#}", item.title, e);
    }
    Ok(())
}
