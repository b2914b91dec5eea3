use anyhow::{anyhow, Context};

use ytmp3_core::models::search::{SearchItem, SearchResponse};
use ytmp3_core::models::settings::SearchSettings;

/// Largest page the search endpoint will return.
pub const MAX_DEPTH: u32 = 50;

pub struct SearchClient {
    client: reqwest::Client,
    endpoint: String,
}

impl SearchClient {
    pub fn new(settings: &SearchSettings) -> anyhow::Result<Self> {
        let client = crate::core::http_client::search_client(settings)?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn search(&self, query: &str, max_results: u32) -> anyhow::Result<SearchResponse> {
        let depth = max_results.clamp(1, MAX_DEPTH);
        tracing::info!("Searching for '{}' with up to {} results", query, depth);

        let depth_param = depth.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", depth_param.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Request to {} failed", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("Search failed: HTTP {}", status));
        }

        let body = response
            .bytes()
            .await
            .context("Failed to read search response")?;
        let json: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|e| anyhow!("Failed to decode JSON response: {}", e))?;

        let parsed = SearchResponse::from_json(&json);
        tracing::debug!("Search returned {} video results", parsed.items.len());
        Ok(parsed)
    }

    pub async fn search_filtered(
        &self,
        query: &str,
        max_results: u32,
        force_keyword: Option<&str>,
    ) -> anyhow::Result<SearchResponse> {
        let mut response = self.search(query, max_results).await?;
        if let Some(keyword) = force_keyword {
            response.items = filter_by_keyword(response.items, keyword);
            tracing::info!(
                "Filtered {} items containing the keyword '{}'",
                response.items.len(),
                keyword
            );
        }
        Ok(response)
    }
}

pub fn filter_by_keyword(items: Vec<SearchItem>, keyword: &str) -> Vec<SearchItem> {
    if keyword.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.title_contains(keyword))
        .collect()
}
