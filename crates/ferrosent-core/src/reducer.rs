//! Reduction of per-item labels to a single [`Signal`].
//!
//! positive → +1, negative → −1, neutral → 0, then the arithmetic mean. An
//! empty input is [`Signal::NoData`]. Confidence scores are ignored: there is
//! no weighting, thresholding, or outlier removal.

use crate::{Classification, SentimentLabel, SentimentScore, Signal};

pub fn reduce(labels: &[SentimentLabel]) -> Signal {
    if labels.is_empty() {
        return Signal::NoData;
    }

    let total: f64 = labels.iter().map(|label| label.signed_value()).sum();
    let mean = total / labels.len() as f64;

    // The mean of values in [-1, 1] stays in range; clamp absorbs float drift.
    match SentimentScore::new(mean.clamp(SentimentScore::MIN, SentimentScore::MAX)) {
        Some(score) => Signal::Score(score),
        None => Signal::NoData,
    }
}

pub fn reduce_classifications(classifications: &[Classification]) -> Signal {
    let labels: Vec<SentimentLabel> = classifications.iter().map(|c| c.label).collect();
    reduce(&labels)
}
