use async_trait::async_trait;
use crate::Result;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    fn name(&self) -> &str;

    /// Render `text` as encoded audio in `language` (an ISO 639-1 code)
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>>;
}
