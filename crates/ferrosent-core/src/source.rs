use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical text source identifiers used in reports and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    Social,
    News,
    FinancialNews,
    AssetStatus,
}

impl SourceId {
    /// All sources in pipeline call order. Corpus truncation follows this order.
    pub const ALL: [Self; 4] = [
        Self::Social,
        Self::News,
        Self::FinancialNews,
        Self::AssetStatus,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Social => "social",
            Self::News => "news",
            Self::FinancialNews => "financial_news",
            Self::AssetStatus => "asset_status",
        }
    }

    /// Upstream service behind each source.
    pub const fn provider(self) -> &'static str {
        match self {
            Self::Social => "twitter",
            Self::News => "newsapi",
            Self::FinancialNews => "finnhub",
            Self::AssetStatus => "coingecko",
        }
    }

    pub const fn requires_credential(self) -> bool {
        !matches!(self, Self::AssetStatus)
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "social" | "twitter" => Ok(Self::Social),
            "news" | "newsapi" => Ok(Self::News),
            "financial_news" | "finnhub" => Ok(Self::FinancialNews),
            "asset_status" | "coingecko" => Ok(Self::AssetStatus),
            other => Err(ValidationError::InvalidSource {
                value: other.to_owned(),
            }),
        }
    }
}
