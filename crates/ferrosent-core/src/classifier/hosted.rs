use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ensure_batch_len, ClassifierError, ClassifyFuture, SentimentClassifier};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, NoopHttpClient};
use crate::{Classification, RawTextItem, SentimentLabel};

const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models/ProsusAI/finbert";

/// FinBERT served by the Hugging Face inference API.
///
/// Accepts both response layouts the API produces: all label scores per item
/// (`[[{label, score}, ..], ..]`, highest score wins) or one top label per
/// item (`[{label, score}, ..]`).
#[derive(Clone)]
pub struct HostedClassifier {
    http_client: Arc<dyn HttpClient>,
    api_token: Option<String>,
    endpoint: String,
    timeout_ms: u64,
}

impl Default for HostedClassifier {
    fn default() -> Self {
        Self {
            http_client: Arc::new(NoopHttpClient),
            api_token: None,
            endpoint: String::from(DEFAULT_ENDPOINT),
            timeout_ms: 15_000,
        }
    }
}

impl HostedClassifier {
    pub fn with_http_client(http_client: Arc<dyn HttpClient>, api_token: Option<String>) -> Self {
        Self {
            http_client,
            api_token,
            ..Self::default()
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    async fn request(&self, batch: &[RawTextItem]) -> Result<Vec<Classification>, ClassifierError> {
        let Some(token) = &self.api_token else {
            return Err(ClassifierError::MissingCredential);
        };

        let body = serde_json::to_string(&InferenceRequest {
            inputs: batch.iter().map(RawTextItem::as_str).collect(),
            options: InferenceOptions {
                wait_for_model: true,
            },
        })
        .map_err(|error| ClassifierError::MalformedResponse(error.to_string()))?;

        let request = HttpRequest::post(&self.endpoint)
            .with_json_body(body)
            .with_auth(&HttpAuth::BearerToken(token.clone()))
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| ClassifierError::Transport(error.message().to_owned()))?;

        if !response.is_success() {
            return Err(ClassifierError::Status {
                status: response.status,
            });
        }

        let classifications = parse_inference_response(&response.body)?;
        ensure_batch_len(batch.len(), &classifications)?;
        Ok(classifications)
    }
}

impl SentimentClassifier for HostedClassifier {
    fn name(&self) -> &'static str {
        "finbert"
    }

    fn classify<'a>(&'a self, batch: &'a [RawTextItem]) -> ClassifyFuture<'a> {
        Box::pin(async move {
            if batch.is_empty() {
                return Ok(Vec::new());
            }
            self.request(batch).await
        })
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: Vec<&'a str>,
    options: InferenceOptions,
}

#[derive(Debug, Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferencePayload {
    AllScores(Vec<Vec<LabelScore>>),
    TopLabel(Vec<LabelScore>),
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

impl LabelScore {
    fn into_classification(self) -> Result<Classification, ClassifierError> {
        let label: SentimentLabel = self.label.parse()?;
        Ok(Classification::new(label).with_confidence(self.score))
    }
}

fn parse_inference_response(body: &str) -> Result<Vec<Classification>, ClassifierError> {
    let payload: InferencePayload = serde_json::from_str(body)
        .map_err(|error| ClassifierError::MalformedResponse(error.to_string()))?;

    match payload {
        InferencePayload::TopLabel(items) => items
            .into_iter()
            .map(LabelScore::into_classification)
            .collect(),
        InferencePayload::AllScores(items) => items
            .into_iter()
            .map(|scores| {
                scores
                    .into_iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .ok_or_else(|| {
                        ClassifierError::MalformedResponse(String::from(
                            "item has no label scores",
                        ))
                    })
                    .and_then(LabelScore::into_classification)
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::RecordingHttpClient;
    use crate::http_client::HttpMethod;

    fn batch() -> Vec<RawTextItem> {
        vec![
            RawTextItem::new("Apple beats earnings estimates"),
            RawTextItem::new("Apple faces antitrust probe"),
        ]
    }

    #[tokio::test]
    async fn picks_highest_scoring_label_per_item() {
        let client = Arc::new(RecordingHttpClient::replying(
            200,
            r#"[
                [{"label":"positive","score":0.91},{"label":"neutral","score":0.06},{"label":"negative","score":0.03}],
                [{"label":"negative","score":0.72},{"label":"neutral","score":0.20},{"label":"positive","score":0.08}]
            ]"#,
        ));
        let classifier = HostedClassifier::with_http_client(client.clone(), Some(String::from("hf")));

        let result = classifier.classify(&batch()).await.expect("classify ok");
        let labels: Vec<SentimentLabel> = result.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec![SentimentLabel::Positive, SentimentLabel::Negative]);
        assert_eq!(result[0].confidence, Some(0.91));

        let requests = client.recorded_requests();
        assert_eq!(requests.len(), 1, "whole batch goes in one call");
        assert_eq!(requests[0].method, HttpMethod::Post);
        let body: serde_json::Value =
            serde_json::from_str(requests[0].body.as_deref().expect("body")).expect("json");
        assert_eq!(body["inputs"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn accepts_top_label_layout_in_any_case() {
        let client = Arc::new(RecordingHttpClient::replying(
            200,
            r#"[{"label":"Neutral","score":0.8},{"label":"NEGATIVE","score":0.6}]"#,
        ));
        let classifier = HostedClassifier::with_http_client(client, Some(String::from("hf")));

        let result = classifier.classify(&batch()).await.expect("classify ok");
        assert_eq!(result[0].label, SentimentLabel::Neutral);
        assert_eq!(result[1].label, SentimentLabel::Negative);
    }

    #[tokio::test]
    async fn short_response_is_a_length_mismatch() {
        let client = Arc::new(RecordingHttpClient::replying(
            200,
            r#"[{"label":"positive","score":0.8}]"#,
        ));
        let classifier = HostedClassifier::with_http_client(client, Some(String::from("hf")));

        let error = classifier.classify(&batch()).await.expect_err("must fail");
        assert_eq!(
            error,
            ClassifierError::LengthMismatch {
                expected: 2,
                actual: 1
            }
        );
    }

    #[tokio::test]
    async fn loading_model_status_is_surfaced() {
        let client = Arc::new(RecordingHttpClient::replying(
            503,
            r#"{"error":"Model ProsusAI/finbert is currently loading"}"#,
        ));
        let classifier = HostedClassifier::with_http_client(client, Some(String::from("hf")));

        let error = classifier.classify(&batch()).await.expect_err("must fail");
        assert_eq!(error, ClassifierError::Status { status: 503 });
        assert!(error.retryable());
    }

    #[tokio::test]
    async fn unknown_label_is_rejected() {
        let client = Arc::new(RecordingHttpClient::replying(
            200,
            r#"[{"label":"LABEL_2","score":0.8},{"label":"positive","score":0.6}]"#,
        ));
        let classifier = HostedClassifier::with_http_client(client, Some(String::from("hf")));

        let error = classifier.classify(&batch()).await.expect_err("must fail");
        assert!(matches!(error, ClassifierError::UnknownLabel(_)));
    }

    #[tokio::test]
    async fn missing_token_fails_without_request() {
        let client = Arc::new(RecordingHttpClient::replying(200, "[]"));
        let classifier = HostedClassifier::with_http_client(client.clone(), None);

        let error = classifier.classify(&batch()).await.expect_err("must fail");
        assert_eq!(error, ClassifierError::MissingCredential);
        assert!(client.recorded_requests().is_empty());
    }
}
