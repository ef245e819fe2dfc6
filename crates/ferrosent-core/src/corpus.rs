use serde::Serialize;

use crate::{RawTextItem, ValidationError};

/// Number of items handed to the classifier per invocation unless configured.
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

/// Bounded, ordered text submitted to the classifier for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Corpus {
    items: Vec<RawTextItem>,
}

impl Corpus {
    pub fn items(&self) -> &[RawTextItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Concatenates source outputs in call order and keeps the first `sample_size`.
///
/// No deduplication and no per-source weighting: a one-line post counts the
/// same as a full headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorpusBuilder {
    sample_size: usize,
}

impl Default for CorpusBuilder {
    fn default() -> Self {
        Self {
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl CorpusBuilder {
    pub fn new(sample_size: usize) -> Result<Self, ValidationError> {
        if sample_size == 0 {
            return Err(ValidationError::ZeroSampleSize);
        }
        Ok(Self { sample_size })
    }

    pub const fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn build<I>(&self, source_outputs: I) -> Corpus
    where
        I: IntoIterator<Item = Vec<RawTextItem>>,
    {
        let items = source_outputs
            .into_iter()
            .flatten()
            .take(self.sample_size)
            .collect();
        Corpus { items }
    }
}
