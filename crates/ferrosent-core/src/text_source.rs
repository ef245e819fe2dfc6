//! Text source trait and adapter error types.
//!
//! Every upstream (social search, news search, financial news feed, asset
//! status feed) implements [`TextSource`]. Adapters report problems through
//! [`TextSource::try_fetch`]; the pipeline only ever calls
//! [`TextSource::fetch`], which degrades any failure to an empty list.
//!
//! # Failure policy
//!
//! | Upstream outcome | `try_fetch` | `fetch` |
//! |------------------|-------------|---------|
//! | 2xx, expected shape | `Ok(items)` | `items` |
//! | credential not configured | `MissingCredential` | `[]` (debug log) |
//! | request timed out | `TimedOut` | `[]` (warn log) |
//! | other transport error | `Unavailable` | `[]` (warn log) |
//! | non-2xx status | `Unavailable` / `Unauthorized` / `RateLimited` | `[]` (warn log) |
//! | unexpected body shape | `MalformedResponse` | `[]` (warn log) |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;

use crate::http_client::{HttpClient, HttpRequest};
use crate::{AssetQuery, RawTextItem, SourceId};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    MissingCredential,
    TimedOut,
    Unavailable,
    Unauthorized,
    RateLimited,
    MalformedResponse,
}

/// Structured source error. Never leaves the adapter layer as an error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    source: SourceId,
    message: String,
}

impl SourceError {
    pub fn missing_credential(source: SourceId) -> Self {
        Self {
            kind: SourceErrorKind::MissingCredential,
            source,
            message: format!("no credential configured for {}", source.provider()),
        }
    }

    pub fn timed_out(source: SourceId, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::TimedOut,
            source,
            message: message.into(),
        }
    }

    pub fn unavailable(source: SourceId, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            source,
            message: message.into(),
        }
    }

    pub fn from_status(source: SourceId, status: u16) -> Self {
        let kind = match status {
            401 | 403 => SourceErrorKind::Unauthorized,
            429 => SourceErrorKind::RateLimited,
            _ => SourceErrorKind::Unavailable,
        };
        Self {
            kind,
            source,
            message: format!("{} upstream returned status {status}", source.provider()),
        }
    }

    pub fn malformed(source: SourceId, message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::MalformedResponse,
            source,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub const fn source_id(&self) -> SourceId {
        self.source
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::MissingCredential => "source.missing_credential",
            SourceErrorKind::TimedOut => "source.timed_out",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Unauthorized => "source.unauthorized",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::MalformedResponse => "source.malformed_response",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

type FetchFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Source adapter contract.
///
/// Implementations make at most one outbound call per fetch, with no retry.
/// They must be `Send + Sync` so the pipeline can fan out across tasks.
pub trait TextSource: Send + Sync {
    fn id(&self) -> SourceId;

    /// Fetches text for `query`, reporting why nothing came back.
    fn try_fetch<'a>(
        &'a self,
        query: &'a AssetQuery,
    ) -> FetchFuture<'a, Result<Vec<RawTextItem>, SourceError>>;

    /// Fetches text for `query`. Any failure yields an empty list.
    fn fetch<'a>(&'a self, query: &'a AssetQuery) -> FetchFuture<'a, Vec<RawTextItem>> {
        Box::pin(async move {
            match self.try_fetch(query).await {
                Ok(items) => items,
                Err(error) if error.kind() == SourceErrorKind::MissingCredential => {
                    tracing::debug!(source = %self.id(), "{error}; skipping source");
                    Vec::new()
                }
                Err(error) => {
                    tracing::warn!(
                        source = %self.id(),
                        code = error.code(),
                        "source degraded to empty result: {}",
                        error.message()
                    );
                    Vec::new()
                }
            }
        })
    }
}

/// Executes `request` and decodes a 2xx JSON body into `T`.
pub(crate) async fn fetch_json<T>(
    http_client: &dyn HttpClient,
    source: SourceId,
    request: HttpRequest,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let url = request.url.clone();
    tracing::debug!(source = %source, url = %url, "requesting upstream");

    let response = http_client.execute(request).await.map_err(|error| {
        if error.is_timeout() {
            SourceError::timed_out(
                source,
                format!("{} request timed out: {}", source.provider(), error.message()),
            )
        } else {
            SourceError::unavailable(
                source,
                format!("{} transport error: {}", source.provider(), error.message()),
            )
        }
    })?;

    if !response.is_success() {
        return Err(SourceError::from_status(source, response.status));
    }

    serde_json::from_str(&response.body).map_err(|error| {
        SourceError::malformed(
            source,
            format!("failed to parse {} response: {error}", source.provider()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_kinds() {
        assert_eq!(
            SourceError::from_status(SourceId::News, 401).kind(),
            SourceErrorKind::Unauthorized
        );
        assert_eq!(
            SourceError::from_status(SourceId::News, 429).kind(),
            SourceErrorKind::RateLimited
        );
        assert_eq!(
            SourceError::from_status(SourceId::News, 503).kind(),
            SourceErrorKind::Unavailable
        );
    }

    #[tokio::test]
    async fn transport_timeouts_are_kept_apart_from_other_failures() {
        use crate::http_client::{HttpError, StaticHttpClient};

        let client = StaticHttpClient::new()
            .with_error("https://slow.test/", HttpError::timeout("deadline elapsed"))
            .with_error("https://down.test/", HttpError::new("connection refused"));

        let slow = fetch_json::<serde_json::Value>(
            &client,
            SourceId::News,
            HttpRequest::get("https://slow.test/v2"),
        )
        .await
        .expect_err("timeout must fail");
        assert_eq!(slow.kind(), SourceErrorKind::TimedOut);
        assert_eq!(slow.code(), "source.timed_out");

        let down = fetch_json::<serde_json::Value>(
            &client,
            SourceId::News,
            HttpRequest::get("https://down.test/v2"),
        )
        .await
        .expect_err("transport error must fail");
        assert_eq!(down.kind(), SourceErrorKind::Unavailable);
    }

    #[test]
    fn display_includes_code() {
        let error = SourceError::missing_credential(SourceId::Social);
        assert_eq!(
            error.to_string(),
            "no credential configured for twitter (source.missing_credential)"
        );
    }
}
