use ns_core::{AnalyzedArticle, CompanyReport, Sentiment};
use ns_inference::ComparativeAnalyzer;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const MOCK_ARTICLES: usize = 3;

const TOPIC_SETS: [[&str; 3]; 4] = [
    ["Stock Performance", "Financial Results", "Market Share"],
    ["Innovation", "Product Launch", "Technology"],
    ["Leadership", "Strategy", "Competition"],
    ["Regulations", "Industry Trends", "Sustainability"],
];

/// Sum of the name's code points, the seed for everything mock.
fn name_seed(company: &str) -> u64 {
    company.chars().map(|c| c as u64).sum()
}

/// Sentiment pattern for a company: fixed for a few well-known names,
/// otherwise three weighted draws (40% positive, 30% negative, 30% neutral)
/// seeded by the name.
pub fn mock_sentiments(company: &str) -> [Sentiment; MOCK_ARTICLES] {
    use Sentiment::*;

    let lower = company.to_lowercase();
    if contains_any(&lower, &["apple", "microsoft", "google"]) {
        return [Positive, Positive, Neutral];
    }
    if contains_any(&lower, &["tesla", "netflix"]) {
        return [Positive, Negative, Negative];
    }
    if contains_any(&lower, &["ibm", "intel"]) {
        return [Neutral, Neutral, Positive];
    }

    let mut rng = StdRng::seed_from_u64(name_seed(company));
    [(); MOCK_ARTICLES].map(|_| match rng.gen_range(0..10) {
        0..=3 => Positive,
        4..=6 => Negative,
        _ => Neutral,
    })
}

fn contains_any(haystack: &str, names: &[&str]) -> bool {
    names.iter().any(|n| haystack.contains(n))
}

/// Three plausible analyzed articles for a company. A pure function of the name.
pub fn mock_articles(company: &str) -> Vec<AnalyzedArticle> {
    let seed = name_seed(company);
    let url = format!("https://example.com/news/{}", company.to_lowercase().replace(' ', "-"));

    mock_sentiments(company)
        .into_iter()
        .enumerate()
        .map(|(i, sentiment)| {
            let (title, summary) = match sentiment {
                Sentiment::Positive => (
                    format!("{} Reports Strong Growth in Latest Quarter", company),
                    format!("{} has exceeded analyst expectations with impressive performance in key metrics.", company),
                ),
                Sentiment::Negative => (
                    format!("{} Faces Challenges Amid Market Uncertainty", company),
                    format!("Investors express concerns as {} navigates through challenging business environment.", company),
                ),
                Sentiment::Neutral => (
                    format!("{} Maintains Steady Position in Competitive Market", company),
                    format!("Analysts have mixed views on {}'s latest developments and market strategy.", company),
                ),
            };
            let topics = TOPIC_SETS[((seed + i as u64) % TOPIC_SETS.len() as u64) as usize];

            AnalyzedArticle {
                title,
                summary,
                sentiment,
                topics: topics.iter().map(|t| t.to_string()).collect(),
                url: url.clone(),
            }
        })
        .collect()
}

/// A complete report built only from mock articles.
pub fn mock_report(company: &str) -> CompanyReport {
    let articles = mock_articles(company);
    let analysis = ComparativeAnalyzer.compare(&articles, company);
    CompanyReport::new(company, articles, analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ns_core::Sentiment::*;

    #[test]
    fn test_overrides() {
        assert_eq!(mock_sentiments("Apple Inc."), [Positive, Positive, Neutral]);
        assert_eq!(mock_sentiments("NETFLIX"), [Positive, Negative, Negative]);
        assert_eq!(mock_sentiments("Intel Corporation"), [Neutral, Neutral, Positive]);
    }

    #[test]
    fn test_mock_articles_are_deterministic() {
        for name in ["Acme Corp", "Zenith", "Tesla"] {
            assert_eq!(mock_articles(name), mock_articles(name));
            assert_eq!(mock_report(name), mock_report(name));
        }
    }

    #[test]
    fn test_mock_article_shape() {
        let articles = mock_articles("Tesla");
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "Tesla Reports Strong Growth in Latest Quarter");
        assert_eq!(articles[1].title, "Tesla Faces Challenges Amid Market Uncertainty");
        assert!(articles.iter().all(|a| a.url == "https://example.com/news/tesla"));
        assert!(articles.iter().all(|a| a.topics.len() == 3));

        // "Tesla" sums to 505, so topic sets start at index 1
        assert_eq!(articles[0].topics, vec!["Innovation", "Product Launch", "Technology"]);
        assert_eq!(articles[1].topics, vec!["Leadership", "Strategy", "Competition"]);
        assert_eq!(articles[2].topics, vec!["Regulations", "Industry Trends", "Sustainability"]);
    }

    #[test]
    fn test_mock_report_is_consistent() {
        let report = mock_report("Tesla Motors");
        assert_eq!(report.company, "Tesla Motors");
        assert_eq!(report.comparative_sentiment_score.total(), report.articles.len());
        assert_eq!(report.final_sentiment_analysis, report.comparative_sentiment_score.final_sentiment_analysis);
        assert!(report.final_sentiment_analysis.contains("Tesla Motors"));
        assert_eq!(report.articles[0].url, "https://example.com/news/tesla-motors");
        assert_eq!(
            report.comparative_sentiment_score,
            ComparativeAnalyzer.analyze_for_company(&report.articles, "Tesla Motors").unwrap()
        );
    }
}
