use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::text_source::{fetch_json, SourceError, TextSource};
use crate::{AssetQuery, RawTextItem, SourceId};

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2/everything";

/// English-language news headlines mentioning the asset (NewsAPI `everything`).
///
/// Extracts `articles[].title`; articles without a title are skipped.
#[derive(Clone)]
pub struct NewsSearchSource {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for NewsSearchSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 3_000,
        }
    }
}

impl NewsSearchSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_key,
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

impl TextSource for NewsSearchSource {
    fn id(&self) -> SourceId {
        SourceId::News
    }

    fn try_fetch<'a>(
        &'a self,
        query: &'a AssetQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawTextItem>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let Some(api_key) = &self.api_key else {
                return Err(SourceError::missing_credential(SourceId::News));
            };

            let request = HttpRequest::get(&self.base_url)
                .with_query("q", query.as_str())
                .with_query("language", "en")
                .with_auth(&HttpAuth::QueryParam {
                    name: String::from("apiKey"),
                    value: api_key.clone(),
                })
                .with_timeout_ms(self.timeout_ms);

            let payload: EverythingPayload =
                fetch_json(self.http_client.as_ref(), SourceId::News, request).await?;

            let items: Vec<RawTextItem> = payload
                .articles
                .into_iter()
                .filter_map(|article| RawTextItem::from_field(article.title))
                .collect();
            Ok(items)
        })
    }
}

#[derive(Debug, Deserialize)]
struct EverythingPayload {
    #[serde(default)]
    articles: Vec<ArticlePayload>,
}

#[derive(Debug, Deserialize)]
struct ArticlePayload {
    title: Option<String>,
}
