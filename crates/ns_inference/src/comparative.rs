use std::collections::{BTreeMap, HashMap};

use ns_core::{
    AnalyzedArticle, ComparativeAnalysis, CoverageDifference, Error, Result, Sentiment, TopicOverlap,
};

use crate::topics::title_case;

const MAX_COMPARISONS: usize = 2;

/// Cross-article aggregation over a set of analyzed articles.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComparativeAnalyzer;

impl ComparativeAnalyzer {
    /// Analyzes `articles`, naming the company after the first article's URL.
    pub fn analyze(&self, articles: &[AnalyzedArticle]) -> Result<ComparativeAnalysis> {
        let company = articles
            .first()
            .map(|a| company_name_from_url(&a.url))
            .unwrap_or_default();
        self.analyze_for_company(articles, &company)
    }

    /// Analyzes `articles` for a company whose display name is already known.
    pub fn analyze_for_company(&self, articles: &[AnalyzedArticle], company: &str) -> Result<ComparativeAnalysis> {
        if articles.is_empty() {
            return Err(Error::EmptyResult("comparative analysis needs at least one article".to_string()));
        }
        Ok(self.compare(articles, company))
    }

    /// The comparison itself, for callers that already hold a non-empty set.
    pub fn compare(&self, articles: &[AnalyzedArticle], company: &str) -> ComparativeAnalysis {
        let sentiment_distribution = sentiment_distribution(articles);
        let final_sentiment_analysis = overall_sentiment(&sentiment_distribution, company);

        ComparativeAnalysis {
            coverage_differences: coverage_differences(articles),
            topic_overlap: topic_overlap(articles),
            sentiment_distribution,
            final_sentiment_analysis,
        }
    }
}

pub fn sentiment_distribution(articles: &[AnalyzedArticle]) -> BTreeMap<Sentiment, usize> {
    let mut counts: BTreeMap<Sentiment, usize> = Sentiment::ALL.iter().map(|s| (*s, 0)).collect();
    for article in articles {
        *counts.entry(article.sentiment).or_insert(0) += 1;
    }
    counts
}

/// Splits topics into those occurring at least twice across all articles and
/// the rest. Occurrences are counted over the flattened topic lists, both
/// outputs keep first-seen order.
pub fn topic_overlap(articles: &[AnalyzedArticle]) -> TopicOverlap {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for topic in articles.iter().flat_map(|a| a.topics.iter()) {
        let count = counts.entry(topic.as_str()).or_insert(0);
        if *count == 0 {
            order.push(topic.as_str());
        }
        *count += 1;
    }

    let (common, unique): (Vec<&str>, Vec<&str>) = order.into_iter().partition(|t| counts[t] > 1);
    TopicOverlap {
        common_topics: common.into_iter().map(String::from).collect(),
        unique_topics: unique.into_iter().map(String::from).collect(),
    }
}

pub fn coverage_differences(articles: &[AnalyzedArticle]) -> Vec<CoverageDifference> {
    if articles.len() < 2 {
        return vec![CoverageDifference {
            comparison: "Limited coverage available for detailed comparison.".to_string(),
            impact: "More sources would provide a more comprehensive view of market sentiment.".to_string(),
        }];
    }

    articles
        .windows(2)
        .take(MAX_COMPARISONS)
        .enumerate()
        .map(|(i, pair)| CoverageDifference {
            comparison: format!(
                "Article {} focuses on {}, while Article {} covers {}.",
                i + 1,
                pair[0].topics.join(", "),
                i + 2,
                pair[1].topics.join(", ")
            ),
            impact: impact_statement(pair[0].sentiment, pair[1].sentiment),
        })
        .collect()
}

pub fn impact_statement(first: Sentiment, second: Sentiment) -> String {
    if first == second {
        match first {
            Sentiment::Positive => {
                "Multiple sources report positive developments, strengthening investor confidence.".to_string()
            }
            Sentiment::Negative => {
                "Multiple sources indicate concerns, suggesting caution for investors.".to_string()
            }
            Sentiment::Neutral => {
                "Sources show balanced perspectives, indicating stability or uncertainty.".to_string()
            }
        }
    } else {
        format!(
            "The {} tone in one source contrasts with the {} perspective in another, indicating mixed market signals.",
            first.as_str().to_lowercase(),
            second.as_str().to_lowercase()
        )
    }
}

pub fn overall_sentiment(distribution: &BTreeMap<Sentiment, usize>, company: &str) -> String {
    let total: usize = distribution.values().sum();
    if total == 0 {
        return "Insufficient data for sentiment analysis.".to_string();
    }

    let share = |s: Sentiment| distribution.get(&s).copied().unwrap_or(0) as f64 / total as f64;
    let pos = share(Sentiment::Positive);
    let neg = share(Sentiment::Negative);

    if pos > 0.6 {
        format!("The overall news coverage for {} is predominantly positive, suggesting strong market confidence.", company)
    } else if neg > 0.6 {
        format!("The overall news coverage for {} is predominantly negative, suggesting market concerns.", company)
    } else if pos > neg && pos > 0.4 {
        format!("The news coverage for {} is mixed but leans positive, indicating cautious optimism.", company)
    } else if neg > pos && neg > 0.4 {
        format!("The news coverage for {} is mixed but leans negative, suggesting some market apprehension.", company)
    } else {
        format!("The news coverage for {} is balanced, with no clear sentiment direction.", company)
    }
}

/// Guesses a display name from the last path segment of an article URL.
///
/// Only meaningful for URLs that end in a company slug, such as the discovery
/// placeholders and mock articles.
pub fn company_name_from_url(url: &str) -> String {
    let segment = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let segment = segment.split(['?', '#']).next().unwrap_or_default();
    if segment.is_empty() {
        return "the company".to_string();
    }
    title_case(&segment.replace('-', " "))
}
