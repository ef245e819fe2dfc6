//! Runtime configuration: upstream credentials and pipeline tuning.
//!
//! Credentials come from environment variables. The `ferrosent` binary loads
//! a `.env` file into the environment before this runs, without overriding
//! variables already set. Each one is looked up under a `FERROSENT_`-prefixed
//! name first, then under its conventional name.
//!
//! | Credential | Primary Env Var | Fallback Env Var |
//! |------------|-----------------|------------------|
//! | Social bearer token | `FERROSENT_TWITTER_BEARER` | `TWITTER_BEARER` |
//! | News API key | `FERROSENT_NEWSAPI_KEY` | `NEWSAPI_KEY` |
//! | Financial news key | `FERROSENT_FINNHUB_API_KEY` | `FINNHUB_API_KEY` |
//! | Hosted classifier token | `FERROSENT_HF_TOKEN` | `HF_TOKEN` |
//!
//! The asset status source needs no credential.

use std::env;
use std::fmt::{Debug, Formatter};

use crate::adapters::MIN_MAX_RESULTS;
use crate::classifier::ClassifierKind;
use crate::corpus::DEFAULT_SAMPLE_SIZE;
use crate::{SourceId, ValidationError};

/// Upstream credentials. `Debug` output never contains secret values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub social_bearer_token: Option<String>,
    pub news_api_key: Option<String>,
    pub financial_news_api_key: Option<String>,
    pub classifier_token: Option<String>,
}

impl Credentials {
    pub fn from_env() -> Self {
        Self {
            social_bearer_token: read_env("FERROSENT_TWITTER_BEARER", "TWITTER_BEARER"),
            news_api_key: read_env("FERROSENT_NEWSAPI_KEY", "NEWSAPI_KEY"),
            financial_news_api_key: read_env("FERROSENT_FINNHUB_API_KEY", "FINNHUB_API_KEY"),
            classifier_token: read_env("FERROSENT_HF_TOKEN", "HF_TOKEN"),
        }
    }

    pub fn for_source(&self, source: SourceId) -> Option<&str> {
        match source {
            SourceId::Social => self.social_bearer_token.as_deref(),
            SourceId::News => self.news_api_key.as_deref(),
            SourceId::FinancialNews => self.financial_news_api_key.as_deref(),
            SourceId::AssetStatus => None,
        }
    }

    /// Whether `source` can be queried with the configured credentials.
    pub fn is_ready(&self, source: SourceId) -> bool {
        !source.requires_credential() || self.for_source(source).is_some()
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        fn mask(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("Credentials")
            .field("social_bearer_token", &mask(&self.social_bearer_token))
            .field("news_api_key", &mask(&self.news_api_key))
            .field("financial_news_api_key", &mask(&self.financial_news_api_key))
            .field("classifier_token", &mask(&self.classifier_token))
            .finish()
    }
}

fn read_env(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary)
        .or_else(|_| env::var(fallback))
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Pipeline tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Items handed to the classifier per invocation.
    pub sample_size: usize,
    /// Most posts the social source returns (at most 100).
    pub social_max_results: u32,
    /// Per-request timeout for every upstream call.
    pub timeout_ms: u64,
    pub classifier: ClassifierKind,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
            social_max_results: MIN_MAX_RESULTS,
            timeout_ms: 3_000,
            classifier: ClassifierKind::Hosted,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sample_size == 0 {
            return Err(ValidationError::ZeroSampleSize);
        }
        Ok(())
    }
}
