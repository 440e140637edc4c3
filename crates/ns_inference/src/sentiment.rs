use std::sync::Arc;

use ns_core::{truncate_chars, Degradation, FailureKind, Sentiment, SentimentModel, Stage};
use tracing::{debug, warn};

const POSITIVE_WORDS: &[&str] = &[
    "increase", "growth", "profit", "success", "positive", "up", "gain",
    "improved", "higher", "surge", "advantage", "opportunity", "exceed", "beat",
];

const NEGATIVE_WORDS: &[&str] = &[
    "decline", "loss", "trouble", "fail", "negative", "down", "decrease",
    "reduced", "lower", "drop", "risk", "concern", "miss", "problem",
];

/// Keyword classifier used whenever the primary model is missing or errors.
///
/// Each term counts once if it occurs anywhere in the lower-cased text, plain
/// substring match. A label needs to beat the other side by two or more terms;
/// ties and one-term leads come out Neutral.
#[derive(Debug, Default, Clone, Copy)]
pub struct FallbackClassifier;

impl FallbackClassifier {
    pub fn counts(&self, text: &str) -> (usize, usize) {
        let text_lower = text.to_lowercase();
        let pos = POSITIVE_WORDS.iter().filter(|w| text_lower.contains(*w)).count();
        let neg = NEGATIVE_WORDS.iter().filter(|w| text_lower.contains(*w)).count();
        (pos, neg)
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        let (pos, neg) = self.counts(text);
        if pos > neg + 1 {
            Sentiment::Positive
        } else if neg > pos + 1 {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Three-way sentiment classifier backed by an optional primary model.
#[derive(Clone)]
pub struct SentimentClassifier {
    model: Option<Arc<dyn SentimentModel>>,
    fallback: FallbackClassifier,
}

impl SentimentClassifier {
    pub fn new(model: Option<Arc<dyn SentimentModel>>) -> Self {
        Self {
            model,
            fallback: FallbackClassifier,
        }
    }

    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    pub fn model_name(&self) -> &str {
        self.model.as_deref().map(|m| m.name()).unwrap_or("keyword-fallback")
    }

    pub async fn classify(&self, text: &str) -> Stage<Sentiment> {
        let Some(model) = &self.model else {
            return Stage::Degraded(
                self.fallback.classify(text),
                Degradation::new("classify", FailureKind::ModelUnavailable, "no primary model configured"),
            );
        };

        let input = truncate_chars(text, model.max_input_chars());
        match model.classify(input).await {
            Ok(prediction) => {
                debug!("{} labelled text {} ({:.2})", model.name(), prediction.label, prediction.score);
                Stage::Ok(Sentiment::from_model_label(&prediction.label))
            }
            Err(e) => {
                warn!("Sentiment model {} failed, using keyword fallback: {}", model.name(), e);
                Stage::Degraded(
                    self.fallback.classify(text),
                    Degradation::new("classify", FailureKind::ModelUnavailable, e.to_string()),
                )
            }
        }
    }
}
