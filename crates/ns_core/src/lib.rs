pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod speech;
pub mod stage;
pub mod types;

pub use config::{Config, ModelBackend, SpeechMode};
pub use error::{Error, FailureKind, Result};
pub use fetch::PageFetcher;
pub use models::{ModelPrediction, SentimentModel};
pub use speech::SpeechSynthesizer;
pub use stage::{Degradation, Stage};
pub use types::{
    AnalyzedArticle, ArticleRecord, CompanyReport, ComparativeAnalysis, CoverageDifference,
    ReportRun, Sentiment, SpeechSummary, TopicOverlap,
};

/// Truncates `text` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
