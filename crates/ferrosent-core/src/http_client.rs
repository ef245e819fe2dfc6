use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// HTTP methods used by source adapters and the hosted classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Authentication strategy applied to outgoing HTTP requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpAuth {
    BearerToken(String),
    /// Credential carried in the query string (NewsAPI `apiKey`, Finnhub `token`).
    QueryParam { name: String, value: String },
}

impl HttpAuth {
    pub fn apply(&self, request: &mut HttpRequest) {
        match self {
            Self::BearerToken(token) => {
                request
                    .headers
                    .insert(String::from("authorization"), format!("Bearer {token}"));
            }
            Self::QueryParam { name, value } => {
                request.query.push((name.clone(), value.clone()));
            }
        }
    }
}

/// HTTP request envelope used by adapter transport calls.
///
/// Query parameters are kept apart from the base URL so that credentials
/// never end up in log lines that print [`HttpRequest::url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: 3_000,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_json_body(mut self, body: impl Into<String>) -> Self {
        self.headers.insert(
            String::from("content-type"),
            String::from("application/json"),
        );
        self.body = Some(body.into());
        self
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        auth.apply(&mut self);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Base URL with the percent-encoded query string appended.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let query = self
            .query
            .iter()
            .map(|(name, value)| {
                format!(
                    "{}={}",
                    urlencoding::encode(name),
                    urlencoding::encode(value)
                )
            })
            .collect::<Vec<_>>()
            .join("&");

        let separator = if self.url.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.url)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// HTTP response envelope returned by an adapter transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    timeout: bool,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timeout: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn is_timeout(&self) -> bool {
        self.timeout
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Transport contract shared by every adapter and the hosted classifier.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Transport that answers every request with an empty JSON object.
#[derive(Debug, Default)]
pub struct NoopHttpClient;

impl HttpClient for NoopHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let _ = request;
        Box::pin(async move { Ok::<_, HttpError>(HttpResponse::ok_json("{}")) })
    }
}

/// Offline transport answering from canned responses keyed by URL prefix.
///
/// The longest matching prefix wins. Unmatched requests get a 404.
#[derive(Debug, Clone, Default)]
pub struct StaticHttpClient {
    routes: Vec<(String, Result<HttpResponse, HttpError>)>,
}

impl StaticHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, url_prefix: impl Into<String>, response: HttpResponse) -> Self {
        self.routes.push((url_prefix.into(), Ok(response)));
        self
    }

    pub fn with_error(mut self, url_prefix: impl Into<String>, error: HttpError) -> Self {
        self.routes.push((url_prefix.into(), Err(error)));
        self
    }

    fn lookup(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.routes
            .iter()
            .filter(|(prefix, _)| url.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "")))
    }
}

impl HttpClient for StaticHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self.lookup(&request.url);
        Box::pin(async move { response })
    }
}

/// Production HTTP client backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: Arc::new(
                reqwest::Client::builder()
                    .user_agent(concat!("ferrosent/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .unwrap_or_else(|_| reqwest::Client::new()),
            ),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let url = request.full_url();
            let mut builder = match request.method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
            };

            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            builder = builder.timeout(std::time::Duration::from_millis(request.timeout_ms));

            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            // Errors name the base URL only; the query string may carry keys.
            let response = builder.send().await.map_err(|e| {
                if e.is_timeout() {
                    HttpError::timeout(format!(
                        "request to {} timed out after {}ms",
                        request.url, request.timeout_ms
                    ))
                } else if e.is_connect() {
                    HttpError::new(format!("connection to {} failed", request.url))
                } else {
                    HttpError::new(format!("request to {} failed", request.url))
                }
            })?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| HttpError::new(format!("failed to read response body: {}", e.without_url())))?;

            Ok(HttpResponse { status, body })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_auth_populates_authorization_header() {
        let request = HttpRequest::get("https://example.test/search")
            .with_auth(&HttpAuth::BearerToken(String::from("token-123")));

        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer token-123")
        );
    }

    #[test]
    fn query_param_auth_is_appended_to_query_not_url() {
        let request = HttpRequest::get("https://example.test/news")
            .with_query("category", "general")
            .with_auth(&HttpAuth::QueryParam {
                name: String::from("token"),
                value: String::from("secret"),
            });

        assert_eq!(request.url, "https://example.test/news");
        assert_eq!(request.query_value("token"), Some("secret"));
        assert_eq!(
            request.full_url(),
            "https://example.test/news?category=general&token=secret"
        );
    }

    #[test]
    fn full_url_percent_encodes_values() {
        let request = HttpRequest::get("https://example.test/search").with_query("q", "$AAPL earnings");

        assert_eq!(
            request.full_url(),
            "https://example.test/search?q=%24AAPL%20earnings"
        );
    }

    #[test]
    fn static_client_prefers_longest_prefix() {
        let client = StaticHttpClient::new()
            .with_response("https://example.test/", HttpResponse::new(500, ""))
            .with_response("https://example.test/coins/", HttpResponse::ok_json("[]"));

        assert_eq!(
            client.lookup("https://example.test/coins/bitcoin").map(|r| r.status),
            Ok(200)
        );
        assert_eq!(
            client.lookup("https://example.test/other").map(|r| r.status),
            Ok(500)
        );
        assert_eq!(
            client.lookup("https://elsewhere.test/").map(|r| r.status),
            Ok(404)
        );
    }
}
