use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Asset identifier supplied by the caller: a ticker (`AAPL`) or a free-form
/// name (`Bitcoin`).
///
/// Only surrounding whitespace is removed. Case is preserved because each
/// source decides its own normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetQuery(String);

impl AssetQuery {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyAsset);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase slug form used by coin-id based sources (`Bitcoin` -> `bitcoin`,
    /// `Shiba Inu` -> `shiba-inu`).
    ///
    /// This is more than a plain lowercase: coin ids are hyphenated, so each
    /// whitespace run becomes a single `-` instead of reaching the URL as
    /// `shiba inu`. Tickers are not mapped to coin ids.
    pub fn slug(&self) -> String {
        self.0
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl Display for AssetQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for AssetQuery {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for AssetQuery {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<AssetQuery> for String {
    fn from(value: AssetQuery) -> Self {
        value.0
    }
}

/// One piece of text pulled from a source. Carries no attribution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawTextItem(String);

impl RawTextItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Builds an item from an optional upstream field, rejecting missing or
    /// blank text.
    pub fn from_field(field: Option<String>) -> Option<Self> {
        field
            .filter(|text| !text.trim().is_empty())
            .map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RawTextItem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RawTextItem {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RawTextItem {
    fn from(value: String) -> Self {
        Self(value)
    }
}
