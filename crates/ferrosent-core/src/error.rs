use thiserror::Error;

use crate::classifier::ClassifierError;

/// Validation errors exposed by `ferrosent-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("asset query cannot be empty")]
    EmptyAsset,

    #[error("sample size must be greater than zero")]
    ZeroSampleSize,

    #[error("invalid source '{value}', expected one of social, news, financial_news, asset_status")]
    InvalidSource { value: String },

    #[error("invalid sentiment label '{value}', expected one of positive, negative, neutral")]
    InvalidLabel { value: String },

    #[error("invalid classifier '{value}', expected one of hosted, lexicon")]
    InvalidClassifier { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },

    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Failure of one pipeline invocation.
///
/// Source outages never show up here; they degrade to empty contributions.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    InvalidAsset(#[from] ValidationError),

    #[error("sentiment classification failed: {0}")]
    Classifier(#[from] ClassifierError),
}

impl PipelineError {
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAsset(_) => "pipeline.invalid_asset",
            Self::Classifier(_) => "pipeline.classifier_failure",
        }
    }
}
