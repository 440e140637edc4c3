use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Download the page at `url` and return its body as text
    async fn fetch(&self, url: &str) -> Result<String>;
}
