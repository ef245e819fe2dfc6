use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Categorical classifier output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Position on the signed scale: +1, -1, or 0.
    pub const fn signed_value(self) -> f64 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
            Self::Neutral => 0.0,
        }
    }
}

impl Display for SentimentLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(ValidationError::InvalidLabel {
                value: other.to_owned(),
            }),
        }
    }
}

/// A label with the classifier's confidence, when it reports one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: SentimentLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Classification {
    pub const fn new(label: SentimentLabel) -> Self {
        Self {
            label,
            confidence: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }
}

impl From<SentimentLabel> for Classification {
    fn from(label: SentimentLabel) -> Self {
        Self::new(label)
    }
}

/// Mean signed sentiment, always finite and within `[-1.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SentimentScore(f64);

impl SentimentScore {
    pub const MIN: f64 = -1.0;
    pub const MAX: f64 = 1.0;

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && (Self::MIN..=Self::MAX).contains(&value)).then_some(Self(value))
    }

    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Display for SentimentScore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Final output of one invocation.
///
/// `NoData` means nothing was scored. It is never folded into a `0.0` score,
/// which stays reserved for a genuinely neutral reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Score(SentimentScore),
    NoData,
}

impl Signal {
    pub const fn score(self) -> Option<SentimentScore> {
        match self {
            Self::Score(score) => Some(score),
            Self::NoData => None,
        }
    }

    pub const fn is_no_data(self) -> bool {
        matches!(self, Self::NoData)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(score) => Display::fmt(score, f),
            Self::NoData => f.write_str("no data"),
        }
    }
}
