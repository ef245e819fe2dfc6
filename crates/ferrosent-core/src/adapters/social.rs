use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::text_source::{fetch_json, SourceError, TextSource};
use crate::{AssetQuery, RawTextItem, SourceId};

const DEFAULT_BASE_URL: &str = "https://api.twitter.com/2/tweets/search/recent";

/// Bounds the recent-search endpoint accepts for the `max_results` parameter.
pub const MIN_MAX_RESULTS: u32 = 10;
pub const MAX_MAX_RESULTS: u32 = 100;

/// Recent social posts mentioning the asset (Twitter/X v2 recent search).
///
/// Extracts `data[].text`. A response without `data` means zero matches.
#[derive(Clone)]
pub struct SocialSearchSource {
    http_client: Arc<dyn HttpClient>,
    bearer_token: Option<String>,
    max_results: u32,
    base_url: String,
    timeout_ms: u64,
}

impl Default for SocialSearchSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            bearer_token: None,
            max_results: MIN_MAX_RESULTS,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 3_000,
        }
    }
}

impl SocialSearchSource {
    pub fn with_http_client(
        http_client: Arc<dyn HttpClient>,
        bearer_token: Option<String>,
    ) -> Self {
        Self {
            http_client,
            bearer_token,
            ..Self::default()
        }
    }

    /// Sets the most posts one call returns, capped at [`MAX_MAX_RESULTS`].
    ///
    /// Limits below the upstream floor still request [`MIN_MAX_RESULTS`] and
    /// keep only the first `max_results` posts.
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.min(MAX_MAX_RESULTS);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn max_results(&self) -> u32 {
        self.max_results
    }

    fn requested_page_size(&self) -> u32 {
        self.max_results.clamp(MIN_MAX_RESULTS, MAX_MAX_RESULTS)
    }
}

impl TextSource for SocialSearchSource {
    fn id(&self) -> SourceId {
        SourceId::Social
    }

    fn try_fetch<'a>(
        &'a self,
        query: &'a AssetQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawTextItem>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let Some(token) = &self.bearer_token else {
                return Err(SourceError::missing_credential(SourceId::Social));
            };

            let request = HttpRequest::get(&self.base_url)
                .with_query("query", query.as_str())
                .with_query("max_results", self.requested_page_size().to_string())
                .with_query("tweet.fields", "text")
                .with_auth(&HttpAuth::BearerToken(token.clone()))
                .with_timeout_ms(self.timeout_ms);

            let payload: RecentSearchPayload =
                fetch_json(self.http_client.as_ref(), SourceId::Social, request).await?;

            let items: Vec<RawTextItem> = payload
                .data
                .into_iter()
                .filter_map(|post| RawTextItem::from_field(post.text))
                .take(self.max_results as usize)
                .collect();
            Ok(items)
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecentSearchPayload {
    #[serde(default)]
    data: Vec<PostPayload>,
}

#[derive(Debug, Deserialize)]
struct PostPayload {
    text: Option<String>,
}
