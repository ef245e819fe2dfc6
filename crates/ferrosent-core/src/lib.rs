//! # Ferrosent Core
//!
//! Multi-source sentiment aggregation for a named asset.
//!
//! ## Overview
//!
//! Given a ticker or asset name, the pipeline:
//!
//! - queries four public text sources concurrently (social posts, news
//!   headlines, a financial news feed, crypto project status updates)
//! - concatenates whatever came back in a fixed source order and keeps the
//!   first N items
//! - classifies that sample in one batch call
//! - reduces the labels to a single score in `[-1.0, 1.0]`, or to
//!   [`Signal::NoData`] when nothing was found
//!
//! Source outages never fail an invocation; only a classifier failure does.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Source adapters (Twitter/X, NewsAPI, Finnhub, CoinGecko) |
//! | [`classifier`] | Classifier contract, hosted FinBERT and lexicon classifiers |
//! | [`config`] | Credentials and pipeline tuning |
//! | [`corpus`] | Ordered, bounded sample construction |
//! | [`domain`] | Asset query, text items, labels, scores, timestamps |
//! | [`envelope`] | Output envelope with metadata |
//! | [`error`] | Validation and pipeline errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`pipeline`] | Orchestration and builder |
//! | [`reducer`] | Label-to-score reduction |
//! | [`source`] | Source identifiers |
//! | [`text_source`] | Text source trait and adapter errors |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ferrosent_core::{SentimentPipelineBuilder, Signal};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = SentimentPipelineBuilder::new().with_real_clients().build()?;
//!
//!     match pipeline.compute_sentiment("AAPL").await? {
//!         Signal::Score(score) => println!("sentiment: {score}"),
//!         Signal::NoData => println!("no data found for analysis"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / Caller   │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ SentimentPipeline│───▶│ Text Sources (x4)│──▶ HTTP Client
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Corpus Builder  │────▶│ Classifier       │
//! └─────────────────┘     └────────┬─────────┘
//!                                  ▼
//!                         ┌──────────────────┐
//!                         │ Score Reducer    │
//!                         └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - Credentials are read from environment variables (the CLI also loads `.env`) and never logged
//! - Request URLs are logged without their query string

pub mod adapters;
pub mod classifier;
pub mod config;
pub mod corpus;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod reducer;
pub mod source;
pub mod text_source;

// Adapter implementations
pub use adapters::{AssetStatusSource, FinancialNewsSource, NewsSearchSource, SocialSearchSource};

// Classifiers
pub use classifier::{
    ClassifierError, ClassifierKind, HostedClassifier, LexiconClassifier, SentimentClassifier,
};

// Configuration
pub use config::{Credentials, PipelineConfig};

// Corpus
pub use corpus::{Corpus, CorpusBuilder, DEFAULT_SAMPLE_SIZE};

// Domain models
pub use domain::{
    AssetQuery, Classification, RawTextItem, SentimentLabel, SentimentScore, Signal, UtcDateTime,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};

// Error types
pub use error::{PipelineError, ValidationError};

// HTTP client types
pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient, StaticHttpClient,
};

// Pipeline
pub use pipeline::{SentimentPipeline, SentimentPipelineBuilder, SentimentReport, SourceContribution};

// Reduction
pub use reducer::{reduce, reduce_classifications};

// Source identifiers and trait
pub use source::SourceId;
pub use text_source::{SourceError, SourceErrorKind, TextSource};
