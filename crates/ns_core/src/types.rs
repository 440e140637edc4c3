use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::stage::Degradation;

/// Normalized content of one news page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub text: String,
    pub keywords: Vec<String>,
    pub publish_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Maps a binary classifier label onto the three-way label space.
    pub fn from_model_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "POSITIVE" => Sentiment::Positive,
            "NEGATIVE" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedArticle {
    pub title: String,
    pub summary: String,
    pub sentiment: Sentiment,
    pub topics: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageDifference {
    pub comparison: String,
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopicOverlap {
    pub common_topics: Vec<String>,
    pub unique_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparativeAnalysis {
    pub sentiment_distribution: BTreeMap<Sentiment, usize>,
    pub coverage_differences: Vec<CoverageDifference>,
    pub topic_overlap: TopicOverlap,
    pub final_sentiment_analysis: String,
}

impl ComparativeAnalysis {
    pub fn count(&self, sentiment: Sentiment) -> usize {
        self.sentiment_distribution.get(&sentiment).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.sentiment_distribution.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyReport {
    pub company: String,
    pub articles: Vec<AnalyzedArticle>,
    pub comparative_sentiment_score: ComparativeAnalysis,
    pub final_sentiment_analysis: String,
}

impl CompanyReport {
    pub fn new(company: impl Into<String>, articles: Vec<AnalyzedArticle>, analysis: ComparativeAnalysis) -> Self {
        let final_sentiment_analysis = analysis.final_sentiment_analysis.clone();
        Self {
            company: company.into(),
            articles,
            comparative_sentiment_score: analysis,
            final_sentiment_analysis,
        }
    }
}

/// A report together with every fallback that was taken while building it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRun {
    pub report: CompanyReport,
    pub degradations: Vec<Degradation>,
}

impl ReportRun {
    /// True when no stage fell back to placeholder or mock data.
    pub fn is_genuine(&self) -> bool {
        self.degradations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechSummary {
    pub audio_file: PathBuf,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_from_model_label() {
        assert_eq!(Sentiment::from_model_label("POSITIVE"), Sentiment::Positive);
        assert_eq!(Sentiment::from_model_label("negative"), Sentiment::Negative);
        assert_eq!(Sentiment::from_model_label("LABEL_1"), Sentiment::Neutral);
        assert_eq!(Sentiment::from_model_label(""), Sentiment::Neutral);
    }

    #[test]
    fn test_report_serialization_shape() {
        let mut distribution = BTreeMap::new();
        distribution.insert(Sentiment::Positive, 1);
        distribution.insert(Sentiment::Negative, 0);
        distribution.insert(Sentiment::Neutral, 0);
        let analysis = ComparativeAnalysis {
            sentiment_distribution: distribution,
            coverage_differences: vec![CoverageDifference {
                comparison: "c".to_string(),
                impact: "i".to_string(),
            }],
            topic_overlap: TopicOverlap::default(),
            final_sentiment_analysis: "done".to_string(),
        };
        let report = CompanyReport::new(
            "Tesla",
            vec![AnalyzedArticle {
                title: "t".to_string(),
                summary: "s".to_string(),
                sentiment: Sentiment::Positive,
                topics: vec!["Growth".to_string()],
                url: "https://example.com/news/tesla".to_string(),
            }],
            analysis,
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["company"], "Tesla");
        assert_eq!(json["articles"][0]["sentiment"], "Positive");
        assert_eq!(json["comparative_sentiment_score"]["sentiment_distribution"]["Positive"], 1);
        assert_eq!(json["comparative_sentiment_score"]["topic_overlap"]["common_topics"], serde_json::json!([]));
        assert_eq!(json["final_sentiment_analysis"], json["comparative_sentiment_score"]["final_sentiment_analysis"]);
    }
}
