use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use ns_core::{ArticleRecord, Degradation, Error, PageFetcher, Result};
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

pub mod jsonld;
pub mod text;

lazy_static! {
    static ref OG_TITLE: Selector = Selector::parse("meta[property='og:title']").unwrap();
    static ref TITLE: Selector = Selector::parse("title").unwrap();
    static ref H1: Selector = Selector::parse("h1").unwrap();
    static ref ARTICLE_PARAGRAPHS: Selector = Selector::parse("article p").unwrap();
    static ref PARAGRAPHS: Selector = Selector::parse("p").unwrap();
    static ref OG_DESCRIPTION: Selector = Selector::parse("meta[property='og:description']").unwrap();
    static ref DESCRIPTION: Selector = Selector::parse("meta[name='description']").unwrap();
    static ref NEWS_KEYWORDS: Selector = Selector::parse("meta[name='news_keywords'], meta[name='keywords']").unwrap();
    static ref PUBLISHED_TIME: Selector = Selector::parse("meta[property='article:published_time']").unwrap();
    static ref TIME: Selector = Selector::parse("time[datetime]").unwrap();
}

pub const MISSING_SUMMARY: &str = "Summary not available";
pub const MISSING_TEXT: &str = "Article text not available";

/// Downloads and parses a news article page.
#[derive(Clone)]
pub struct ArticleExtractor {
    fetcher: Arc<dyn PageFetcher>,
}

impl ArticleExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Always yields a record: when the page cannot be fetched or holds
    /// nothing usable, one is synthesized from the URL and the reason is
    /// returned alongside it.
    pub async fn extract(&self, url: &str) -> (ArticleRecord, Option<Degradation>) {
        let parsed = match self.fetcher.fetch(url).await {
            Ok(html) => parse_article(url, &html),
            Err(e) => Err(e),
        };
        match parsed {
            Ok(record) => {
                debug!("Extracted \"{}\" ({} chars) from {}", record.title, record.text.len(), url);
                (record, None)
            }
            Err(e) => {
                warn!("Extraction failed for {}, synthesizing content: {}", url, e);
                (synthesized_record(url), Some(Degradation::from_error("extract", &e)))
            }
        }
    }
}

/// Parses an article page. Fails only when the page has neither a title nor
/// any paragraph text; otherwise missing fields get placeholder values.
pub fn parse_article(url: &str, html: &str) -> Result<ArticleRecord> {
    let document = Html::parse_document(html);

    let title = meta_content(&document, &OG_TITLE)
        .or_else(|| first_text(&document, &TITLE))
        .or_else(|| first_text(&document, &H1));

    let mut paragraphs = paragraph_texts(&document, &ARTICLE_PARAGRAPHS);
    if paragraphs.is_empty() {
        paragraphs = paragraph_texts(&document, &PARAGRAPHS);
    }
    let body = paragraphs.join("\n\n");

    if title.is_none() && body.is_empty() {
        return Err(Error::ParseFailure(format!("no title or text found at {}", url)));
    }

    let title = title.unwrap_or_else(|| format!("Article about {}", domain_of(url)));

    let summary = meta_content(&document, &OG_DESCRIPTION)
        .or_else(|| meta_content(&document, &DESCRIPTION))
        .unwrap_or_else(|| text::extractive_summary(&body, text::SUMMARY_SENTENCES));
    let summary = if summary.is_empty() { MISSING_SUMMARY.to_string() } else { summary };

    let mut keywords = jsonld::extract_keywords(&document);
    if keywords.is_empty() {
        keywords = meta_content(&document, &NEWS_KEYWORDS)
            .map(|k| {
                k.split(',')
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect()
            })
            .unwrap_or_default();
    }
    if keywords.is_empty() {
        keywords = text::top_keywords(&format!("{} {}", title, body), text::MAX_KEYWORDS);
    }

    let publish_date = meta_content(&document, &PUBLISHED_TIME)
        .or_else(|| jsonld::extract_date_published(&document))
        .or_else(|| {
            document
                .select(&TIME)
                .next()
                .and_then(|t| t.value().attr("datetime"))
                .map(String::from)
        })
        .and_then(|d| parse_date(&d));

    Ok(ArticleRecord {
        title,
        summary,
        url: url.to_string(),
        text: if body.is_empty() { MISSING_TEXT.to_string() } else { body },
        keywords,
        publish_date,
    })
}

/// Stand-in record for an article that could not be extracted. The company
/// is guessed from the last path segment of the URL.
pub fn synthesized_record(url: &str) -> ArticleRecord {
    let domain = domain_of(url);
    let segment = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && url.contains('/'))
        .unwrap_or("company");
    let company = capitalize(segment);

    ArticleRecord {
        title: format!("Financial News about {} | {}", company, domain),
        summary: format!(
            "This article discusses recent financial performance and market trends for {}.",
            company
        ),
        url: url.to_string(),
        text: format!(
            "{} has been in the news recently due to market fluctuations. \
             Analysts have mixed opinions about the company's future prospects. \
             Some experts suggest watching the upcoming quarterly results carefully. \
             The company has been focusing on innovation and market expansion.",
            company
        ),
        keywords: vec![
            "finance".to_string(),
            "market".to_string(),
            "business".to_string(),
            segment.to_string(),
        ],
        publish_date: None,
    }
}

pub fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(String::from))
        .unwrap_or_else(|| url.to_string())
}

/// First letter upper-cased, the rest lower-cased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    value
        .get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|m| m.value().attr("content"))
        .map(collapse_whitespace)
        .find(|c| !c.is_empty())
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .find(|t| !t.is_empty())
}

fn paragraph_texts(document: &Html, selector: &Selector) -> Vec<String> {
    document
        .select(selector)
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect()
}
