pub mod discovery;
pub mod extractor;
pub mod fetch;
pub mod logging;
pub mod manager;
pub mod mock;

pub use discovery::ArticleDiscoverer;
pub use extractor::ArticleExtractor;
pub use fetch::{FailingFetcher, HttpFetcher, StaticFetcher};
pub use logging::{init_logging, Logger};
pub use manager::ReportManager;
pub use mock::{mock_articles, mock_report};

pub mod prelude {
    pub use super::{ArticleDiscoverer, ArticleExtractor, HttpFetcher, ReportManager};
    pub use ns_core::{CompanyReport, Error, ReportRun, Result, Stage};
}
