//! Sentiment classifier contract and bundled implementations.
//!
//! The pipeline treats classification as a black box: one batch in, one
//! [`Classification`] per item out, same order, no omissions. Two
//! implementations ship with the crate:
//!
//! | Classifier | Backend | Credential |
//! |------------|---------|------------|
//! | [`HostedClassifier`] | FinBERT over the Hugging Face inference API | `FERROSENT_HF_TOKEN` / `HF_TOKEN` |
//! | [`LexiconClassifier`] | in-process financial word list | none |

mod hosted;
mod lexicon;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr;

use thiserror::Error;

use crate::{Classification, RawTextItem, ValidationError};

pub use hosted::HostedClassifier;
pub use lexicon::LexiconClassifier;

/// Classifier failure. Fatal for the current invocation; there is no retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    #[error("no credential configured for the hosted classifier")]
    MissingCredential,

    #[error("classifier transport error: {0}")]
    Transport(String),

    #[error("classifier returned status {status}")]
    Status { status: u16 },

    #[error("classifier response could not be parsed: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    UnknownLabel(#[from] ValidationError),

    #[error("classifier returned {actual} labels for {expected} inputs")]
    LengthMismatch { expected: usize, actual: usize },
}

impl ClassifierError {
    /// Whether re-triggering the invocation could plausibly succeed.
    pub const fn retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

type ClassifyFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<Classification>, ClassifierError>> + Send + 'a>>;

/// Batch sentiment classification capability.
///
/// Implementations receive the whole sample in one call and must return
/// exactly one classification per item, in input order.
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &'static str;

    fn classify<'a>(&'a self, batch: &'a [RawTextItem]) -> ClassifyFuture<'a>;
}

/// Verifies the one-label-per-item contract.
pub fn ensure_batch_len(
    batch_len: usize,
    classifications: &[Classification],
) -> Result<(), ClassifierError> {
    if classifications.len() != batch_len {
        return Err(ClassifierError::LengthMismatch {
            expected: batch_len,
            actual: classifications.len(),
        });
    }
    Ok(())
}

/// Which bundled classifier to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    #[default]
    Hosted,
    Lexicon,
}

impl ClassifierKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hosted => "hosted",
            Self::Lexicon => "lexicon",
        }
    }
}

impl Display for ClassifierKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassifierKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "hosted" | "finbert" => Ok(Self::Hosted),
            "lexicon" => Ok(Self::Lexicon),
            other => Err(ValidationError::InvalidClassifier {
                value: other.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SentimentLabel;

    #[test]
    fn length_mismatch_is_detected() {
        let classifications = vec![Classification::new(SentimentLabel::Neutral)];
        assert_eq!(
            ensure_batch_len(2, &classifications),
            Err(ClassifierError::LengthMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(ensure_batch_len(1, &classifications), Ok(()));
    }

    #[test]
    fn parses_classifier_kind() {
        assert_eq!("FinBERT".parse::<ClassifierKind>(), Ok(ClassifierKind::Hosted));
        assert_eq!("lexicon".parse::<ClassifierKind>(), Ok(ClassifierKind::Lexicon));
        assert!("vader".parse::<ClassifierKind>().is_err());
    }
}
