use serde::{Deserialize, Serialize};

pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub video_id: String,
    pub title: String,
    pub channel_title: Option<String>,
    pub published_at: Option<String>,
}

impl SearchItem {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            channel_title: None,
            published_at: None,
        }
    }

    /// Reads one element of the API's `items` array. Entries that are not
    /// videos (channels, playlists) carry no `id.videoId` and yield `None`.
    pub fn from_api_item(item: &serde_json::Value) -> Option<Self> {
        let video_id = item
            .get("id")
            .and_then(|id| id.get("videoId"))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())?
            .to_string();

        let snippet = item.get("snippet");
        let title = snippet
            .and_then(|s| s.get("title"))
            .and_then(|v| v.as_str())
            .map(unescape_html)
            .unwrap_or_else(|| "Untitled".to_string());
        let channel_title = snippet
            .and_then(|s| s.get("channelTitle"))
            .and_then(|v| v.as_str())
            .map(unescape_html);
        let published_at = snippet
            .and_then(|s| s.get("publishedAt"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Some(Self {
            video_id,
            title,
            channel_title,
            published_at,
        })
    }

    pub fn watch_url(&self) -> String {
        format!("{}{}", WATCH_URL_BASE, self.video_id)
    }

    pub fn title_contains(&self, keyword: &str) -> bool {
        self.title.to_lowercase().contains(&keyword.to_lowercase())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<SearchItem>,
}

impl SearchResponse {
    pub fn from_json(json: &serde_json::Value) -> Self {
        let items = json
            .get("items")
            .and_then(|v| v.as_array())
            .map(|arr| arr.iter().filter_map(SearchItem::from_api_item).collect())
            .unwrap_or_default();
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// The search API returns titles HTML-escaped.
fn unescape_html(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_video_id_and_title() {
        let item = json!({
            "id": { "kind": "youtube#video", "videoId": "dQw4w9WgXcQ" },
            "snippet": {
                "title": "Never Gonna Give You Up",
                "channelTitle": "Rick Astley",
                "publishedAt": "2009-10-25T06:57:33Z"
            }
        });
        let parsed = SearchItem::from_api_item(&item).unwrap();
        assert_eq!(parsed.video_id, "dQw4w9WgXcQ");
        assert_eq!(parsed.title, "Never Gonna Give You Up");
        assert_eq!(parsed.channel_title.as_deref(), Some("Rick Astley"));
        assert_eq!(parsed.published_at.as_deref(), Some("2009-10-25T06:57:33Z"));
        assert_eq!(parsed.watch_url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn skips_channel_results() {
        let item = json!({
            "id": { "kind": "youtube#channel", "channelId": "UC123" },
            "snippet": { "title": "Some Channel" }
        });
        assert!(SearchItem::from_api_item(&item).is_none());
    }

    #[test]
    fn missing_title_falls_back() {
        let item = json!({ "id": { "videoId": "abc" } });
        assert_eq!(SearchItem::from_api_item(&item).unwrap().title, "Untitled");
    }

    #[test]
    fn unescapes_entities_in_titles() {
        let item = json!({
            "id": { "videoId": "abc" },
            "snippet": { "title": "Rock &amp; Roll &quot;Live&quot; Don&#39;t Stop" }
        });
        assert_eq!(
            SearchItem::from_api_item(&item).unwrap().title,
            "Rock & Roll \"Live\" Don't Stop"
        );
    }

    #[test]
    fn response_without_items_is_empty() {
        assert!(SearchResponse::from_json(&json!({ "kind": "youtube#searchListResponse" })).is_empty());
        assert!(SearchResponse::from_json(&json!({ "items": "nope" })).is_empty());
    }

    #[test]
    fn response_keeps_order_and_drops_non_videos() {
        let body = json!({
            "items": [
                { "id": { "videoId": "a" }, "snippet": { "title": "First" } },
                { "id": { "playlistId": "p" }, "snippet": { "title": "A playlist" } },
                { "id": { "videoId": "b" }, "snippet": { "title": "Second" } }
            ]
        });
        let ids: Vec<_> = SearchResponse::from_json(&body)
            .items
            .into_iter()
            .map(|i| i.video_id)
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn title_match_ignores_case() {
        let item = SearchItem::new("x", "Daft Punk - Around The World");
        assert!(item.title_contains("daft"));
        assert!(item.title_contains("WORLD"));
        assert!(!item.title_contains("justice"));
    }
}
