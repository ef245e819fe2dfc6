//! Property tests for score reduction and corpus sampling
//!
//! Label sequences are enumerated exhaustively up to a small length instead of
//! sampled, so every combination is covered deterministically.

use ferrosent_core::{
    reduce, CorpusBuilder, RawTextItem, SentimentLabel, SentimentScore, Signal,
    DEFAULT_SAMPLE_SIZE,
};

const LABELS: [SentimentLabel; 3] = [
    SentimentLabel::Positive,
    SentimentLabel::Negative,
    SentimentLabel::Neutral,
];

/// Every label sequence of exactly `len` items.
fn sequences(len: usize) -> Vec<Vec<SentimentLabel>> {
    (0..len).fold(vec![Vec::new()], |acc, _| {
        acc.into_iter()
            .flat_map(|prefix| {
                LABELS.iter().map(move |label| {
                    let mut next = prefix.clone();
                    next.push(*label);
                    next
                })
            })
            .collect()
    })
}

fn items(prefix: &str, count: usize) -> Vec<RawTextItem> {
    (1..=count)
        .map(|n| RawTextItem::new(format!("{prefix}{n}")))
        .collect()
}

// =============================================================================
// Reduction: Range and Emptiness
// =============================================================================

#[test]
fn when_any_labels_are_reduced_score_stays_within_bounds() {
    for len in 1..=6 {
        for labels in sequences(len) {
            // Given: A non-empty label sequence
            // When: It is reduced
            let signal = reduce(&labels);

            // Then: A score in [-1, 1] comes back, never NoData
            let score = signal.score().expect("non-empty input must score").value();
            assert!(
                (SentimentScore::MIN..=SentimentScore::MAX).contains(&score),
                "{labels:?} reduced to {score}"
            );
        }
    }
}

#[test]
fn when_labels_are_reordered_score_is_unchanged() {
    for labels in sequences(4) {
        // Given: A sequence and its reverse
        let mut reversed = labels.clone();
        reversed.reverse();

        // When/Then: Both reduce to the same score
        assert_eq!(reduce(&labels), reduce(&reversed));
    }
}

#[test]
fn when_nothing_was_classified_result_is_no_data_not_zero() {
    // Given: No labels
    // When: They are reduced
    let empty = reduce(&[]);
    let neutral = reduce(&[SentimentLabel::Neutral, SentimentLabel::Neutral]);

    // Then: NoData differs from a genuine neutral reading
    assert_eq!(empty, Signal::NoData);
    assert_ne!(empty, neutral);
    assert_eq!(neutral.score().map(SentimentScore::value), Some(0.0));
}

#[test]
fn when_scores_are_displayed_they_use_two_decimals() {
    let signal = reduce(&[
        SentimentLabel::Positive,
        SentimentLabel::Positive,
        SentimentLabel::Negative,
    ]);

    assert_eq!(signal.to_string(), "0.33");
    assert_eq!(reduce(&[SentimentLabel::Negative]).to_string(), "-1.00");
    assert_eq!(reduce(&[]).to_string(), "no data");
}

// =============================================================================
// Corpus: Ordering and Truncation
// =============================================================================

#[test]
fn when_outputs_are_concatenated_call_order_is_preserved() {
    // Given: A=[a1,a2], B=[b1], C=[], D=[d1]
    let builder = CorpusBuilder::default();

    // When: The corpus is built
    let corpus = builder.build(vec![items("a", 2), items("b", 1), Vec::new(), items("d", 1)]);

    // Then: Items keep source order, then item order
    let texts: Vec<&str> = corpus.items().iter().map(RawTextItem::as_str).collect();
    assert_eq!(texts, vec!["a1", "a2", "b1", "d1"]);
}

#[test]
fn when_more_items_than_the_sample_size_exist_the_first_ones_are_kept() {
    for total in [0_usize, 1, 19, 20, 21, 25, 80] {
        // Given: `total` items spread over four sources
        let per_source = total / 4;
        let outputs = vec![
            items("a", per_source),
            items("b", per_source),
            items("c", per_source),
            items("d", total - 3 * per_source),
        ];
        let flattened: Vec<RawTextItem> = outputs.iter().flatten().cloned().collect();

        // When: The corpus is built with the default sample size
        let corpus = CorpusBuilder::default().build(outputs);

        // Then: It is exactly the prefix of the concatenation, capped at 20
        let expected_len = total.min(DEFAULT_SAMPLE_SIZE);
        assert_eq!(corpus.len(), expected_len);
        assert_eq!(corpus.items(), &flattened[..expected_len]);
    }
}
