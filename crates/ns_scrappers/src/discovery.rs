use std::sync::Arc;

use lazy_static::lazy_static;
use ns_core::{Degradation, FailureKind, PageFetcher, Result, Stage};
use scraper::{Html, Selector};
use tracing::{info, warn};
use url::Url;

pub const SEARCH_ENDPOINT: &str = "https://www.google.com/search";

/// Hosts whose articles are worth extracting.
pub const NEWS_DOMAINS: &[&str] = &[
    "bbc.com",
    "nytimes.com",
    "wsj.com",
    "forbes.com",
    "ft.com",
    "cnbc.com",
    "reuters.com",
    "bloomberg.com",
];

lazy_static! {
    static ref LINK_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
}

/// Finds candidate article URLs for a company.
#[derive(Clone)]
pub struct ArticleDiscoverer {
    fetcher: Arc<dyn PageFetcher>,
}

impl ArticleDiscoverer {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Always yields between 1 and `max_articles` URLs. Live search results
    /// come back as `Stage::Ok`; the placeholder set comes back degraded.
    pub async fn discover(&self, company: &str, max_articles: usize) -> Stage<Vec<String>> {
        let max_articles = max_articles.max(1);
        match self.search(company, max_articles).await {
            Ok(links) if !links.is_empty() => {
                info!("🔍 Found {} news links for {}", links.len(), company);
                Stage::Ok(links)
            }
            Ok(_) => {
                warn!("No allow-listed news links for {}, using placeholders", company);
                Stage::Degraded(
                    truncated(placeholder_urls(company), max_articles),
                    Degradation::new("discover", FailureKind::EmptyResult, "no allow-listed links in search results"),
                )
            }
            Err(e) => {
                warn!("News search for {} failed, using placeholders: {}", company, e);
                Stage::Degraded(
                    truncated(placeholder_urls(company), max_articles),
                    Degradation::from_error("discover", &e),
                )
            }
        }
    }

    async fn search(&self, company: &str, max_articles: usize) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(search_url(company)?.as_str()).await?;
        let mut links = news_links(&html);
        if links.is_empty() {
            return Ok(links);
        }

        if links.len() < max_articles {
            links.extend(financial_search_urls(company)?);
            dedup_in_order(&mut links);
        }
        Ok(truncated(links, max_articles))
    }
}

pub fn search_url(company: &str) -> Result<Url> {
    let query = format!("{} financial news", company);
    Ok(Url::parse_with_params(SEARCH_ENDPOINT, &[("q", query.as_str()), ("tbm", "nws")])?)
}

/// Extracts allow-listed article links from a search result page, following
/// Google's `/url?q=` redirects. First-seen order, no duplicates.
pub fn news_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links: Vec<String> = document
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(link_target)
        .filter(|url| is_news_domain(url))
        .collect();
    dedup_in_order(&mut links);
    links
}

fn link_target(href: &str) -> Option<String> {
    if let Some((_, query)) = href.split_once("/url?") {
        return url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
    }
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    None
}

pub fn is_news_domain(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    NEWS_DOMAINS
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
}

/// Search pages on the financial sites, used to pad a short result list.
pub fn financial_search_urls(company: &str) -> Result<Vec<String>> {
    Ok(vec![
        Url::parse_with_params("https://www.reuters.com/search/news", &[("blob", company)])?.to_string(),
        Url::parse_with_params("https://www.cnbc.com/search/", &[("query", company), ("qsearchterm", company)])?
            .to_string(),
        Url::parse_with_params("https://www.bloomberg.com/search", &[("query", company)])?.to_string(),
    ])
}

pub fn placeholder_urls(company: &str) -> Vec<String> {
    let slug = company.split_whitespace().collect::<Vec<_>>().join("-");
    vec![
        format!("https://www.reuters.com/companies/{}", slug),
        format!("https://www.bloomberg.com/quote/{}", slug),
        format!("https://www.cnbc.com/quotes/{}", slug),
    ]
}

fn dedup_in_order(links: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    links.retain(|l| seen.insert(l.clone()));
}

fn truncated(mut links: Vec<String>, max: usize) -> Vec<String> {
    links.truncate(max);
    links
}
