use std::sync::Arc;

use futures::future::join_all;
use ns_core::{
    AnalyzedArticle, CompanyReport, Config, Degradation, Error, FailureKind, PageFetcher, ReportRun, Result,
};
use ns_inference::{create_model, ArticleAnalyzer, ComparativeAnalyzer, SentimentClassifier};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::info;

use crate::discovery::ArticleDiscoverer;
use crate::extractor::ArticleExtractor;
use crate::fetch::HttpFetcher;
use crate::logging::Logger;
use crate::mock::{mock_articles, mock_report};

const DEFAULT_MAX_ARTICLES: usize = 5;
const DEFAULT_CONCURRENCY: usize = 5;

/// Runs the whole pipeline for one company: discovery, per-article extraction
/// and analysis, then the cross-article comparison.
#[derive(Clone)]
pub struct ReportManager {
    discoverer: ArticleDiscoverer,
    extractor: ArticleExtractor,
    analyzer: ArticleAnalyzer,
    comparative: ComparativeAnalyzer,
    semaphore: Arc<Semaphore>,
    max_articles: usize,
}

impl ReportManager {
    pub fn new(fetcher: Arc<dyn PageFetcher>, classifier: SentimentClassifier) -> Self {
        Self {
            discoverer: ArticleDiscoverer::new(fetcher.clone()),
            extractor: ArticleExtractor::new(fetcher),
            analyzer: ArticleAnalyzer::new(classifier),
            comparative: ComparativeAnalyzer,
            semaphore: Arc::new(Semaphore::new(DEFAULT_CONCURRENCY)),
            max_articles: DEFAULT_MAX_ARTICLES,
        }
    }

    /// Wires the HTTP fetcher and the configured sentiment model.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let fetcher = Arc::new(HttpFetcher::from_config(config)?);
        let classifier = SentimentClassifier::new(create_model(config)?);
        Ok(Self::new(fetcher, classifier)
            .with_max_articles(config.max_articles)
            .with_concurrency(config.concurrency))
    }

    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles.max(1);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
        self
    }

    pub fn model_name(&self) -> &str {
        self.analyzer.classifier().model_name()
    }

    /// Builds a report for `company`. The only error is an empty name; every
    /// other failure is absorbed into fallback data and listed in
    /// `ReportRun::degradations`. A crash anywhere in the pipeline yields the
    /// mock report.
    pub async fn process_company_news(&self, company: &str) -> Result<ReportRun> {
        let company = company.trim();
        if company.is_empty() {
            return Err(Error::InvalidInput("company name must not be empty".to_string()));
        }

        let logger = Logger::new().with_prefix(format!("[{}]", company));
        logger.info("📰 Processing company news");

        let manager = self.clone();
        let name = company.to_string();
        let task_logger = logger.clone();
        let run = match tokio::spawn(async move { manager.build_report(&name, task_logger).await }).await {
            Ok(Ok(run)) => run,
            Ok(Err(e)) => {
                logger.error(&format!("Report pipeline failed, using mock report: {}", e));
                mock_run(company, Degradation::from_error("report", &e))
            }
            Err(e) => {
                logger.error(&format!("Report pipeline aborted, using mock report: {}", e));
                mock_run(company, Degradation::new("report", FailureKind::Internal, e.to_string()))
            }
        };

        info!(
            "✅ Report for {} ready: {} articles, {} fallbacks",
            company,
            run.report.articles.len(),
            run.degradations.len()
        );
        Ok(run)
    }

    async fn build_report(&self, company: &str, logger: Logger) -> Result<ReportRun> {
        let mut degradations = Vec::new();

        let urls = self
            .discoverer
            .discover(company, self.max_articles)
            .await
            .record(&mut degradations)
            .unwrap_or_default();

        let total = urls.len();
        let tasks: Vec<JoinHandle<(Option<AnalyzedArticle>, Vec<Degradation>)>> = urls
            .into_iter()
            .enumerate()
            .map(|(i, url)| {
                let extractor = self.extractor.clone();
                let analyzer = self.analyzer.clone();
                let semaphore = self.semaphore.clone();
                let logger = logger.clone().with_prefix(format!("[{}/{}]", i + 1, total));
                tokio::spawn(async move { process_article(url, extractor, analyzer, semaphore, logger).await })
            })
            .collect();

        let mut articles = Vec::new();
        for (i, result) in join_all(tasks).await.into_iter().enumerate() {
            match result {
                Ok((article, mut reasons)) => {
                    degradations.append(&mut reasons);
                    articles.extend(article);
                }
                Err(e) => {
                    logger.error(&format!("Article task {} aborted: {}", i + 1, e));
                    degradations.push(Degradation::new("article", FailureKind::Internal, e.to_string()));
                }
            }
        }

        if articles.is_empty() {
            logger.warn("No articles survived, using mock articles");
            degradations.push(Degradation::new(
                "articles",
                FailureKind::EmptyResult,
                "no article could be processed",
            ));
            articles = mock_articles(company);
        }

        let analysis = self.comparative.analyze_for_company(&articles, company)?;
        Ok(ReportRun {
            report: CompanyReport::new(company, articles, analysis),
            degradations,
        })
    }
}

fn mock_run(company: &str, degradation: Degradation) -> ReportRun {
    ReportRun {
        report: mock_report(company),
        degradations: vec![degradation],
    }
}

async fn process_article(
    url: String,
    extractor: ArticleExtractor,
    analyzer: ArticleAnalyzer,
    semaphore: Arc<Semaphore>,
    logger: Logger,
) -> (Option<AnalyzedArticle>, Vec<Degradation>) {
    let mut degradations = Vec::new();
    let _permit = match semaphore.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            degradations.push(Degradation::new("article", FailureKind::Internal, e.to_string()));
            return (None, degradations);
        }
    };

    logger.debug(&format!("Extracting {}", url));
    let (record, reason) = extractor.extract(&url).await;
    degradations.extend(reason);

    let article = analyzer.analyze(&record).await.record(&mut degradations);
    if let Some(article) = &article {
        logger.info(&format!("✨ {} [{}] {}", article.sentiment, article.topics.join(", "), article.title));
    }
    (article, degradations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FailingFetcher, StaticFetcher};
    use async_trait::async_trait;
    use ns_core::Sentiment;
    use ns_inference::models::DummyModel;

    fn dummy_classifier(label: &str) -> SentimentClassifier {
        SentimentClassifier::new(Some(Arc::new(DummyModel::new(label))))
    }

    const SEARCH_PAGE: &str = r#"
        <a href="/url?q=https://www.reuters.com/business/acme-one&amp;sa=U">1</a>
        <a href="/url?q=https://www.cnbc.com/2024/acme-two&amp;sa=U">2</a>
    "#;

    fn article_page(title: &str) -> String {
        format!(
            "<html><head><meta property='og:title' content='{}'></head>\
             <body><article><p>Acme revenue and profit growth.</p></article></body></html>",
            title
        )
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let manager = ReportManager::new(Arc::new(FailingFetcher), SentimentClassifier::fallback_only());
        assert!(matches!(manager.process_company_news("   ").await, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_live_articles_keep_discovery_order() {
        let fetcher = StaticFetcher::new()
            .with_search_page(SEARCH_PAGE)
            .with_page("https://www.reuters.com/business/acme-one", article_page("First"))
            .with_page("https://www.cnbc.com/2024/acme-two", article_page("Second"));
        let manager = ReportManager::new(Arc::new(fetcher), dummy_classifier("POSITIVE")).with_max_articles(2);

        let run = manager.process_company_news("Acme").await.unwrap();
        assert!(run.is_genuine(), "{:?}", run.degradations);
        let titles: Vec<_> = run.report.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
        assert_eq!(run.report.comparative_sentiment_score.count(Sentiment::Positive), 2);
        assert!(run.report.final_sentiment_analysis.contains("Acme"));
    }

    #[tokio::test]
    async fn test_offline_run_uses_synthesized_articles() {
        let manager = ReportManager::new(Arc::new(FailingFetcher), SentimentClassifier::fallback_only());
        let run = manager.process_company_news("Acme Corp").await.unwrap();
        assert_eq!(run.report.articles.len(), 3);
        assert_eq!(run.report.articles[0].url, "https://www.reuters.com/companies/Acme-Corp");
        assert!(run.report.articles[0].title.starts_with("Financial News about Acme-corp"));
        assert!(!run.is_genuine());
        assert_eq!(run.report.comparative_sentiment_score.total(), 3);
    }

    struct PanickingArticles;

    #[async_trait]
    impl PageFetcher for PanickingArticles {
        async fn fetch(&self, url: &str) -> Result<String> {
            if url.starts_with(crate::discovery::SEARCH_ENDPOINT) {
                return Ok(SEARCH_PAGE.to_string());
            }
            panic!("parser blew up on {}", url);
        }
    }

    #[tokio::test]
    async fn test_panicking_articles_fall_back_to_mock() {
        let manager = ReportManager::new(Arc::new(PanickingArticles), dummy_classifier("NEGATIVE"))
            .with_max_articles(2);
        let run = manager.process_company_news("Netflix").await.unwrap();
        assert_eq!(run.report.articles, mock_articles("Netflix"));
        assert!(run.degradations.iter().any(|d| d.kind == FailureKind::EmptyResult));
        assert_eq!(run.degradations.iter().filter(|d| d.kind == FailureKind::Internal).count(), 2);
    }

    struct PanickingSearch;

    #[async_trait]
    impl PageFetcher for PanickingSearch {
        async fn fetch(&self, url: &str) -> Result<String> {
            panic!("search engine blew up on {}", url);
        }
    }

    #[tokio::test]
    async fn test_pipeline_crash_returns_mock_report() {
        let manager = ReportManager::new(Arc::new(PanickingSearch), dummy_classifier("POSITIVE"));
        let run = manager.process_company_news("Acme").await.unwrap();
        assert_eq!(run.report, mock_report("Acme"));
        assert_eq!(run.degradations.len(), 1);
        assert_eq!(run.degradations[0].kind, FailureKind::Internal);
        assert_eq!(run.degradations[0].stage, "report");
    }
}
