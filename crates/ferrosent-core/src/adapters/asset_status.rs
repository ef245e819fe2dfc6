use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient};
use crate::text_source::{fetch_json, SourceError, TextSource};
use crate::{AssetQuery, RawTextItem, SourceId};

const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Project status updates for a crypto asset (CoinGecko). No credential.
///
/// The asset is addressed by its lowercase slug (`bitcoin`, not `BTC`), so
/// ticker-only queries usually hit an unknown coin and come back empty.
#[derive(Clone)]
pub struct AssetStatusSource {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl Default for AssetStatusSource {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: 3_000,
        }
    }
}

impl AssetStatusSource {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
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

    fn endpoint(&self, query: &AssetQuery) -> String {
        format!(
            "{}/coins/{}/status_updates",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&query.slug())
        )
    }
}

impl TextSource for AssetStatusSource {
    fn id(&self) -> SourceId {
        SourceId::AssetStatus
    }

    fn try_fetch<'a>(
        &'a self,
        query: &'a AssetQuery,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<RawTextItem>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            let request = HttpRequest::get(self.endpoint(query)).with_timeout_ms(self.timeout_ms);

            let payload: StatusUpdatesPayload =
                fetch_json(self.http_client.as_ref(), SourceId::AssetStatus, request).await?;

            let items: Vec<RawTextItem> = payload
                .status_updates
                .into_iter()
                .filter_map(|update| RawTextItem::from_field(update.description))
                .collect();
            Ok(items)
        })
    }
}

#[derive(Debug, Deserialize)]
struct StatusUpdatesPayload {
    #[serde(default)]
    status_updates: Vec<StatusUpdatePayload>,
}

#[derive(Debug, Deserialize)]
struct StatusUpdatePayload {
    description: Option<String>,
}
