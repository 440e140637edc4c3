use ns_core::{AnalyzedArticle, ArticleRecord, Stage};

pub mod comparative;
pub mod models;
pub mod sentiment;
pub mod topics;

pub use comparative::{company_name_from_url, ComparativeAnalyzer};
pub use models::create_model;
pub use sentiment::{FallbackClassifier, SentimentClassifier};
pub use topics::TopicExtractor;

/// Classifier and topic extractor applied together to one article.
#[derive(Clone)]
pub struct ArticleAnalyzer {
    classifier: SentimentClassifier,
    topics: TopicExtractor,
}

impl ArticleAnalyzer {
    pub fn new(classifier: SentimentClassifier) -> Self {
        Self {
            classifier,
            topics: TopicExtractor,
        }
    }

    pub fn classifier(&self) -> &SentimentClassifier {
        &self.classifier
    }

    pub async fn analyze(&self, record: &ArticleRecord) -> Stage<AnalyzedArticle> {
        let topics = self.topics.extract(&record.text, &record.keywords);
        self.classifier.classify(&record.text).await.map(|sentiment| AnalyzedArticle {
            title: record.title.clone(),
            summary: record.summary.clone(),
            sentiment,
            topics,
            url: record.url.clone(),
        })
    }
}

pub mod prelude {
    pub use super::{ArticleAnalyzer, ComparativeAnalyzer, SentimentClassifier, TopicExtractor};
    pub use super::models::create_model;
    pub use ns_core::{AnalyzedArticle, ArticleRecord, Result, Error, Sentiment, Stage};
}
