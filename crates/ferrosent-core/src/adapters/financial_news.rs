use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::text_source::{fetch_json, SourceError, TextSource};
use crate::{AssetQuery, RawTextItem, SourceId};

const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1/news";

/// General-category market news headlines (Finnhub).
///
/// Known limitation: the feed has no query parameter, so the asset is ignored
/// and every invocation receives the same broad market headlines. Whether that
/// is intended market context or a filtering gap is unresolved; it is kept
/// as-is rather than filtered client-side.
#[derive(Clone)]
pub struct FinancialNewsSource {
    http_client: Arc<dyn HttpClient>,
    api_key: Option<String>,
    category: String,
    base_url: String,
    timeout_ms: u64,
}

impl Default for FinancialNewsSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            api_key: None,
            category: String::from("general"),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 3_000,
        }
    }
}

impl FinancialNewsSource {
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

impl TextSource for FinancialNewsSource {
    fn id(&self) -> SourceId {
        SourceId::FinancialNews
    }

    fn try_fetch<'a>(
        &'a self,
        query: &'a AssetQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawTextItem>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let _ = query;
            let Some(api_key) = &self.api_key else {
                return Err(SourceError::missing_credential(SourceId::FinancialNews));
            };

            let request = HttpRequest::get(&self.base_url)
                .with_query("category", self.category.as_str())
                .with_auth(&HttpAuth::QueryParam {
                    name: String::from("token"),
                    value: api_key.clone(),
                })
                .with_timeout_ms(self.timeout_ms);

            let payload: Vec<HeadlinePayload> =
                fetch_json(self.http_client.as_ref(), SourceId::FinancialNews, request).await?;

            let items: Vec<RawTextItem> = payload
                .into_iter()
                .filter_map(|item| RawTextItem::from_field(item.headline))
                .collect();
            Ok(items)
        })
    }
}

#[derive(Debug, Deserialize)]
struct HeadlinePayload {
    headline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::RecordingHttpClient;
    use crate::text_source::SourceErrorKind;

    #[tokio::test]
    async fn ignores_asset_and_requests_general_category() {
        let client = Arc::new(RecordingHttpClient::replying(
            200,
            r#"[{"category":"top news","headline":"Stocks rally into the close","id":1},
                {"category":"top news","headline":"Oil slides on supply fears","id":2}]"#,
        ));
        let source =
            FinancialNewsSource::with_http_client(client.clone(), Some(String::from("fh-key")));

        let aapl = AssetQuery::parse("AAPL").expect("valid");
        let btc = AssetQuery::parse("Bitcoin").expect("valid");
        let first = source.try_fetch(&aapl).await.expect("ok");
        let second = source.try_fetch(&btc).await.expect("ok");

        assert_eq!(first, second);
        assert_eq!(first.len(), 2);

        for request in client.recorded_requests() {
            assert_eq!(request.query_value("category"), Some("general"));
            assert_eq!(request.query_value("token"), Some("fh-key"));
            assert!(request.query_value("q").is_none());
        }
    }

    #[tokio::test]
    async fn object_body_instead_of_list_fails_closed() {
        let client = Arc::new(RecordingHttpClient::replying(
            200,
            r#"{"error":"Invalid API key"}"#,
        ));
        let source = FinancialNewsSource::with_http_client(client, Some(String::from("bad")));
        let asset = AssetQuery::parse("AAPL").expect("valid");

        let error = source.try_fetch(&asset).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::MalformedResponse);
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_empty() {
        let client = Arc::new(RecordingHttpClient::failing("connection reset"));
        let source = FinancialNewsSource::with_http_client(client, Some(String::from("fh-key")));
        let asset = AssetQuery::parse("AAPL").expect("valid");

        let error = source.try_fetch(&asset).await.expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Unavailable);
        assert!(source.fetch(&asset).await.is_empty());
    }
}
