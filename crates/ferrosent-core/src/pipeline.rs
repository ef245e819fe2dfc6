//! Sentiment pipeline: fan-out fetch, corpus, classification, reduction.
//!
//! One invocation walks `Idle → Fetching → Scoring → Done`. Sources are called
//! concurrently, but their outputs are always concatenated in the registered
//! order, so truncation to the sample size does not depend on which upstream
//! answered first.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::adapters::{
    AssetStatusSource, FinancialNewsSource, NewsSearchSource, SocialSearchSource,
};
use crate::classifier::{
    ensure_batch_len, ClassifierKind, HostedClassifier, LexiconClassifier, SentimentClassifier,
};
use crate::config::{Credentials, PipelineConfig};
use crate::corpus::CorpusBuilder;
use crate::error::PipelineError;
use crate::http_client::{HttpClient, HttpResponse, ReqwestHttpClient, StaticHttpClient};
use crate::reducer::reduce_classifications;
use crate::text_source::TextSource;
use crate::{AssetQuery, RawTextItem, Signal, SourceId, ValidationError};

/// Item count one source contributed before truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SourceContribution {
    pub source: SourceId,
    pub items: usize,
}

/// Result of [`SentimentPipeline::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    pub asset: String,
    pub signal: Signal,
    /// Items actually handed to the classifier.
    pub sample_size: usize,
    pub sources: Vec<SourceContribution>,
    pub classifier: &'static str,
    pub latency_ms: u64,
}

impl SentimentReport {
    /// Items fetched across all sources, before truncation.
    pub fn fetched_items(&self) -> usize {
        self.sources.iter().map(|contribution| contribution.items).sum()
    }
}

/// Orchestrates sources, corpus builder, classifier and reducer.
///
/// Dependencies are created once and shared read-only across invocations.
pub struct SentimentPipeline {
    sources: Vec<Arc<dyn TextSource>>,
    classifier: Arc<dyn SentimentClassifier>,
    corpus_builder: CorpusBuilder,
}

impl SentimentPipeline {
    pub fn new(
        sources: Vec<Arc<dyn TextSource>>,
        classifier: Arc<dyn SentimentClassifier>,
        corpus_builder: CorpusBuilder,
    ) -> Self {
        Self {
            sources,
            classifier,
            corpus_builder,
        }
    }

    pub fn builder() -> SentimentPipelineBuilder {
        SentimentPipelineBuilder::new()
    }

    /// Source ids in call order.
    pub fn source_chain(&self) -> Vec<SourceId> {
        self.sources.iter().map(|source| source.id()).collect()
    }

    pub fn classifier_name(&self) -> &'static str {
        self.classifier.name()
    }

    pub const fn sample_size(&self) -> usize {
        self.corpus_builder.sample_size()
    }

    /// Aggregated sentiment for `asset`, or [`Signal::NoData`] when no source
    /// returned any text.
    pub async fn compute_sentiment(&self, asset: &str) -> Result<Signal, PipelineError> {
        Ok(self.analyze(asset).await?.signal)
    }

    pub async fn analyze(&self, asset: &str) -> Result<SentimentReport, PipelineError> {
        let started = Instant::now();
        let query = AssetQuery::parse(asset)?;

        tracing::debug!(asset = %query, sources = self.sources.len(), "fetching");
        let outputs = self.fetch_all(&query).await;

        let sources: Vec<SourceContribution> = outputs
            .iter()
            .map(|(source, items)| SourceContribution {
                source: *source,
                items: items.len(),
            })
            .collect();
        let corpus = self
            .corpus_builder
            .build(outputs.into_iter().map(|(_, items)| items));

        let signal = if corpus.is_empty() {
            tracing::info!(asset = %query, "no text found; skipping classification");
            Signal::NoData
        } else {
            tracing::debug!(
                asset = %query,
                sample_size = corpus.len(),
                classifier = self.classifier.name(),
                "scoring"
            );
            let classifications = self.classifier.classify(corpus.items()).await?;
            ensure_batch_len(corpus.len(), &classifications)?;
            reduce_classifications(&classifications)
        };

        let latency_ms = duration_ms(started.elapsed());
        tracing::info!(asset = %query, signal = %signal, latency_ms, "done");

        Ok(SentimentReport {
            asset: query.as_str().to_owned(),
            signal,
            sample_size: corpus.len(),
            sources,
            classifier: self.classifier.name(),
            latency_ms,
        })
    }

    /// Calls every source concurrently and joins the results in call order.
    async fn fetch_all(&self, query: &AssetQuery) -> Vec<(SourceId, Vec<RawTextItem>)> {
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let query = query.clone();
                let id = source.id();
                (id, tokio::spawn(async move { source.fetch(&query).await }))
            })
            .collect();

        let mut outputs = Vec::with_capacity(handles.len());
        for (id, handle) in handles {
            let items = match handle.await {
                Ok(items) => items,
                Err(error) => {
                    tracing::warn!(source = %id, "source task aborted: {error}");
                    Vec::new()
                }
            };
            tracing::debug!(source = %id, items = items.len(), "source resolved");
            outputs.push((id, items));
        }
        outputs
    }
}

/// Builder for [`SentimentPipeline`].
///
/// ```rust,ignore
/// let pipeline = SentimentPipelineBuilder::new()
///     .with_real_clients()
///     .with_sample_size(20)
///     .build()?;
/// ```
pub struct SentimentPipelineBuilder {
    use_mock: bool,
    credentials: Credentials,
    config: PipelineConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    classifier: Option<Arc<dyn SentimentClassifier>>,
    sources: Option<Vec<Arc<dyn TextSource>>>,
}

impl Default for SentimentPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentPipelineBuilder {
    pub fn new() -> Self {
        Self {
            use_mock: false,
            credentials: Credentials::default(),
            config: PipelineConfig::default(),
            http_client: None,
            classifier: None,
            sources: None,
        }
    }

    /// Offline mode: canned upstream payloads and the lexicon classifier.
    pub fn with_mock_mode(mut self) -> Self {
        self.use_mock = true;
        self
    }

    /// Reads credentials from the environment and uses the reqwest transport.
    pub fn with_real_clients(mut self) -> Self {
        self.use_mock = false;
        self.credentials = Credentials::from_env();
        self
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn with_social_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.social_bearer_token = Some(token.into());
        self
    }

    pub fn with_news_api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials.news_api_key = Some(key.into());
        self
    }

    pub fn with_financial_news_api_key(mut self, key: impl Into<String>) -> Self {
        self.credentials.financial_news_api_key = Some(key.into());
        self
    }

    pub fn with_classifier_token(mut self, token: impl Into<String>) -> Self {
        self.credentials.classifier_token = Some(token.into());
        self
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.config.sample_size = sample_size;
        self
    }

    pub fn with_social_max_results(mut self, max_results: u32) -> Self {
        self.config.social_max_results = max_results;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.timeout_ms = timeout_ms;
        self
    }

    pub fn with_classifier_kind(mut self, kind: ClassifierKind) -> Self {
        self.config.classifier = kind;
        self
    }

    /// Transport shared by the bundled sources and the hosted classifier.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn SentimentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Replaces the bundled sources. Call order follows the vector order.
    pub fn with_sources(mut self, sources: Vec<Arc<dyn TextSource>>) -> Self {
        self.sources = Some(sources);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn build(self) -> Result<SentimentPipeline, ValidationError> {
        self.config.validate()?;
        let corpus_builder = CorpusBuilder::new(self.config.sample_size)?;

        let credentials = if self.use_mock {
            mock_credentials(self.credentials)
        } else {
            self.credentials
        };

        let http_client: Arc<dyn HttpClient> = match self.http_client {
            Some(client) => client,
            None if self.use_mock => Arc::new(mock_http_client()),
            None => Arc::new(ReqwestHttpClient::new()),
        };

        let sources = match self.sources {
            Some(sources) => sources,
            None => bundled_sources(&http_client, &credentials, &self.config),
        };

        let classifier: Arc<dyn SentimentClassifier> = match self.classifier {
            Some(classifier) => classifier,
            None if self.use_mock => Arc::new(LexiconClassifier::new()),
            None => match self.config.classifier {
                ClassifierKind::Hosted => Arc::new(HostedClassifier::with_http_client(
                    Arc::clone(&http_client),
                    credentials.classifier_token.clone(),
                )),
                ClassifierKind::Lexicon => Arc::new(LexiconClassifier::new()),
            },
        };

        Ok(SentimentPipeline::new(sources, classifier, corpus_builder))
    }
}

fn bundled_sources(
    http_client: &Arc<dyn HttpClient>,
    credentials: &Credentials,
    config: &PipelineConfig,
) -> Vec<Arc<dyn TextSource>> {
    vec![
        Arc::new(
            SocialSearchSource::with_http_client(
                Arc::clone(http_client),
                credentials.social_bearer_token.clone(),
            )
            .with_max_results(config.social_max_results)
            .with_timeout_ms(config.timeout_ms),
        ),
        Arc::new(
            NewsSearchSource::with_http_client(
                Arc::clone(http_client),
                credentials.news_api_key.clone(),
            )
            .with_timeout_ms(config.timeout_ms),
        ),
        Arc::new(
            FinancialNewsSource::with_http_client(
                Arc::clone(http_client),
                credentials.financial_news_api_key.clone(),
            )
            .with_timeout_ms(config.timeout_ms),
        ),
        Arc::new(
            AssetStatusSource::with_http_client(Arc::clone(http_client))
                .with_timeout_ms(config.timeout_ms),
        ),
    ]
}

fn mock_credentials(credentials: Credentials) -> Credentials {
    let placeholder = || Some(String::from("mock"));
    Credentials {
        social_bearer_token: credentials.social_bearer_token.or_else(placeholder),
        news_api_key: credentials.news_api_key.or_else(placeholder),
        financial_news_api_key: credentials.financial_news_api_key.or_else(placeholder),
        classifier_token: credentials.classifier_token,
    }
}

/// Canned upstream payloads served in mock mode, keyed by endpoint prefix.
fn mock_http_client() -> StaticHttpClient {
    StaticHttpClient::new()
        .with_response(
            "https://api.twitter.com/2/tweets/search/recent",
            HttpResponse::ok_json(
                r#"{"data":[
                    {"id":"1","text":"Huge rally continues after a record quarter"},
                    {"id":"2","text":"Selling my position, guidance looks weak"}
                ],"meta":{"result_count":2}}"#,
            ),
        )
        .with_response(
            "https://newsapi.org/v2/everything",
            HttpResponse::ok_json(
                r#"{"status":"ok","totalResults":2,"articles":[
                    {"title":"Shares surge on strong demand"},
                    {"title":"Company to hold annual shareholder meeting"}
                ]}"#,
            ),
        )
        .with_response(
            "https://finnhub.io/api/v1/news",
            HttpResponse::ok_json(r#"[{"category":"top news","headline":"Stocks rise as inflation cools"}]"#),
        )
        .with_response(
            "https://api.coingecko.com/api/v3/coins/",
            HttpResponse::ok_json(
                r#"{"status_updates":[{"description":"Scheduled maintenance window announced"}]}"#,
            ),
        )
}

/// Whole milliseconds in `elapsed`, saturating at `u64::MAX`.
fn duration_ms(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use super::*;
    use crate::classifier::ClassifierError;
    use crate::text_source::SourceError;
    use crate::{Classification, SentimentLabel};

    struct FixedSource {
        id: SourceId,
        texts: Vec<&'static str>,
    }

    impl TextSource for FixedSource {
        fn id(&self) -> SourceId {
            self.id
        }

        fn try_fetch<'a>(
            &'a self,
            _query: &'a AssetQuery,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<RawTextItem>, SourceError>> + Send + 'a>>
        {
            let items: Vec<RawTextItem> =
                self.texts.iter().copied().map(RawTextItem::from).collect();
            Box::pin(async move { Ok::<_, SourceError>(items) })
        }
    }

    struct FailingClassifier;

    impl SentimentClassifier for FailingClassifier {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn classify<'a>(
            &'a self,
            _batch: &'a [RawTextItem],
        ) -> Pin<Box<dyn Future<Output = Result<Vec<Classification>, ClassifierError>> + Send + 'a>>
        {
            Box::pin(async { Err::<Vec<Classification>, _>(ClassifierError::Status { status: 503 }) })
        }
    }

    fn fixed(id: SourceId, texts: Vec<&'static str>) -> Arc<dyn TextSource> {
        Arc::new(FixedSource { id, texts })
    }

    #[tokio::test]
    async fn mock_mode_scores_offline_fixtures() {
        let pipeline = SentimentPipelineBuilder::new()
            .with_mock_mode()
            .build()
            .expect("pipeline should build");

        let report = pipeline.analyze("AAPL").await.expect("analysis succeeds");

        assert_eq!(report.sample_size, 6);
        assert_eq!(report.classifier, "lexicon");
        assert_eq!(
            report.sources.iter().map(|c| c.items).collect::<Vec<_>>(),
            vec![2, 2, 1, 1]
        );
        let score = report.signal.score().expect("score expected").value();
        assert!((score - 2.0 / 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn empty_asset_is_rejected_before_fetching() {
        let pipeline = SentimentPipelineBuilder::new()
            .with_mock_mode()
            .build()
            .expect("pipeline should build");

        let error = pipeline.compute_sentiment("   ").await.expect_err("must fail");
        assert!(matches!(
            error,
            PipelineError::InvalidAsset(ValidationError::EmptyAsset)
        ));
        assert_eq!(error.code(), "pipeline.invalid_asset");
    }

    #[tokio::test]
    async fn empty_corpus_skips_classifier() {
        let pipeline = SentimentPipeline::new(
            vec![fixed(SourceId::Social, Vec::new())],
            Arc::new(FailingClassifier),
            CorpusBuilder::default(),
        );

        let signal = pipeline.compute_sentiment("AAPL").await.expect("no error");
        assert_eq!(signal, Signal::NoData);
    }

    #[tokio::test]
    async fn classifier_failure_propagates() {
        let pipeline = SentimentPipeline::new(
            vec![fixed(SourceId::News, vec!["Shares surge"])],
            Arc::new(FailingClassifier),
            CorpusBuilder::default(),
        );

        let error = pipeline.compute_sentiment("AAPL").await.expect_err("must fail");
        assert!(matches!(
            error,
            PipelineError::Classifier(ClassifierError::Status { status: 503 })
        ));
        assert_eq!(error.code(), "pipeline.classifier_failure");
    }

    #[tokio::test]
    async fn truncation_keeps_registered_order() {
        let pipeline = SentimentPipeline::new(
            vec![
                fixed(SourceId::Social, vec!["stocks rally", "stocks rally"]),
                fixed(SourceId::News, vec!["stocks crash", "stocks crash"]),
            ],
            Arc::new(LexiconClassifier::new()),
            CorpusBuilder::new(3).expect("valid size"),
        );

        let report = pipeline.analyze("AAPL").await.expect("analysis succeeds");
        assert_eq!(report.sample_size, 3);
        assert_eq!(report.fetched_items(), 4);
        // positive, positive, negative
        let score = report.signal.score().expect("score expected").value();
        assert!((score - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sample_size_fails_build() {
        let result = SentimentPipelineBuilder::new()
            .with_mock_mode()
            .with_sample_size(0)
            .build();
        assert!(matches!(result, Err(ValidationError::ZeroSampleSize)));
    }

    #[test]
    fn bundled_sources_follow_call_order() {
        let pipeline = SentimentPipelineBuilder::new()
            .with_classifier_kind(ClassifierKind::Lexicon)
            .build()
            .expect("pipeline should build");

        assert_eq!(pipeline.source_chain(), SourceId::ALL.to_vec());
        assert_eq!(pipeline.classifier_name(), "lexicon");
        assert_eq!(pipeline.sample_size(), 20);
    }

    #[test]
    fn labels_used_by_lexicon_fixture_are_stable() {
        let lexicon = LexiconClassifier::new();
        assert_eq!(
            lexicon.classify_text("Selling my position, guidance looks weak").label,
            SentimentLabel::Negative
        );
        assert_eq!(
            lexicon
                .classify_text("Company to hold annual shareholder meeting")
                .label,
            SentimentLabel::Neutral
        );
    }

    #[test]
    fn latency_saturates_instead_of_wrapping() {
        assert_eq!(duration_ms(Duration::from_micros(2_500)), 2);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }
}
