use std::collections::{HashMap, HashSet};

use super::{ClassifierError, ClassifyFuture, SentimentClassifier};
use crate::{Classification, RawTextItem, SentimentLabel};

const POSITIVE_TERMS: &[(&str, f64)] = &[
    ("bullish", 0.8),
    ("surge", 0.7),
    ("surges", 0.7),
    ("rally", 0.7),
    ("rallies", 0.7),
    ("soar", 0.8),
    ("soars", 0.8),
    ("moon", 0.6),
    ("gain", 0.5),
    ("gains", 0.5),
    ("profit", 0.6),
    ("growth", 0.6),
    ("rise", 0.5),
    ("rises", 0.5),
    ("beat", 0.6),
    ("beats", 0.6),
    ("exceed", 0.6),
    ("exceeds", 0.6),
    ("strong", 0.5),
    ("record", 0.6),
    ("upgrade", 0.6),
    ("upgraded", 0.6),
    ("outperform", 0.7),
    ("buy", 0.5),
    ("breakout", 0.6),
    ("recovery", 0.5),
    ("rebound", 0.5),
    ("optimistic", 0.6),
    ("partnership", 0.4),
    ("launch", 0.3),
    ("completed", 0.3),
];

const NEGATIVE_TERMS: &[(&str, f64)] = &[
    ("bearish", -0.8),
    ("crash", -0.9),
    ("crashes", -0.9),
    ("plunge", -0.8),
    ("plunges", -0.8),
    ("drop", -0.6),
    ("drops", -0.6),
    ("fall", -0.5),
    ("falls", -0.5),
    ("slip", -0.4),
    ("slips", -0.4),
    ("slides", -0.5),
    ("decline", -0.6),
    ("loss", -0.6),
    ("losses", -0.6),
    ("weak", -0.5),
    ("miss", -0.6),
    ("misses", -0.6),
    ("downgrade", -0.6),
    ("downgraded", -0.6),
    ("underperform", -0.6),
    ("sell", -0.5),
    ("selling", -0.4),
    ("dump", -0.7),
    ("fear", -0.6),
    ("fears", -0.6),
    ("lawsuit", -0.6),
    ("probe", -0.5),
    ("fraud", -0.9),
    ("scam", -0.9),
    ("hack", -0.8),
    ("exploit", -0.8),
    ("warning", -0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "cannot", "cant", "don't", "dont", "doesn't", "doesnt", "isn't",
    "isnt", "won't", "wont", "hardly",
];

/// Tokens after a negation whose polarity gets flipped.
const NEGATION_WINDOW: usize = 3;

/// Offline rule-based classifier over a financial word list.
///
/// Sums term weights (flipping terms shortly after a negation); the sign of the
/// sum picks the label and its magnitude, capped at 1, is the confidence.
#[derive(Debug, Clone)]
pub struct LexiconClassifier {
    terms: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for LexiconClassifier {
    fn default() -> Self {
        Self {
            terms: POSITIVE_TERMS
                .iter()
                .chain(NEGATIVE_TERMS)
                .copied()
                .collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }
}

impl LexiconClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score_text(&self, text: &str) -> f64 {
        let mut total = 0.0;
        let mut negate_for = 0_usize;

        for token in tokenize(text) {
            if self.negations.contains(token.as_str()) {
                negate_for = NEGATION_WINDOW;
                continue;
            }

            if let Some(weight) = self.terms.get(token.as_str()) {
                total += if negate_for > 0 { -weight } else { *weight };
            }
            negate_for = negate_for.saturating_sub(1);
        }

        total
    }

    pub fn classify_text(&self, text: &str) -> Classification {
        let score = self.score_text(text);
        let label = if score > 0.0 {
            SentimentLabel::Positive
        } else if score < 0.0 {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        };
        Classification::new(label).with_confidence(score.abs().min(1.0))
    }
}

impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &'static str {
        "lexicon"
    }

    fn classify<'a>(&'a self, batch: &'a [RawTextItem]) -> ClassifyFuture<'a> {
        Box::pin(async move {
            let classifications: Vec<Classification> = batch
                .iter()
                .map(|item| self.classify_text(item.as_str()))
                .collect();
            Ok::<_, ClassifierError>(classifications)
        })
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|ch: char| !(ch.is_alphanumeric() || ch == '\''))
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}
