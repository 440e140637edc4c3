use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use ns_core::{Error, Result, SpeechSynthesizer};
use tracing::debug;

const TTS_URL: &str = "https://translate.google.com/translate_tts";
/// The endpoint rejects requests with more than this many characters.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Speech synthesis through Google Translate's public TTS endpoint. Returns MP3.
pub struct GoogleTranslateTts {
    client: Client,
    base_url: String,
}

impl GoogleTranslateTts {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder().timeout(timeout).user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: TTS_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn chunk_url(&self, chunk: &str, language: &str, idx: usize, total: usize) -> Result<Url> {
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();
        Url::parse_with_params(
            &self.base_url,
            &[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", language),
                ("q", chunk),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", self.base_url, e)))
    }
}

impl fmt::Debug for GoogleTranslateTts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslateTts")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    fn name(&self) -> &str {
        "google-translate"
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(Error::Synthesis("nothing to speak".to_string()));
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, language, idx, chunks.len())?;
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| Error::Synthesis(format!("TTS request failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::Synthesis(format!("TTS returned status {}", response.status())));
            }

            let bytes = response.bytes().await?;
            debug!("Synthesized chunk {}/{} ({} bytes)", idx + 1, chunks.len(), bytes.len());
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }
}

/// Splits `text` into pieces of at most `max_chars` characters, preferring to
/// cut after sentence punctuation (including the danda), then at whitespace.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        if rest.chars().count() <= max_chars {
            chunks.push(rest.to_string());
            break;
        }

        let window_end = rest.char_indices().nth(max_chars).map(|(i, _)| i).unwrap_or(rest.len());
        let window = &rest[..window_end];
        let cut = window
            .char_indices()
            .filter(|(_, c)| matches!(c, '।' | '.' | '!' | '?' | ';'))
            .map(|(i, c)| i + c.len_utf8())
            .last()
            .or_else(|| window.rfind(char::is_whitespace))
            .filter(|&i| i > 0)
            .unwrap_or(window_end);

        let piece = rest[..cut].trim();
        if !piece.is_empty() {
            chunks.push(piece.to_string());
        }
        rest = rest[cut..].trim_start();
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk_text("  नमस्ते  ", 100), vec!["नमस्ते"]);
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn test_chunks_respect_limit_and_sentences() {
        let text = "टेस्ला के लिए समाचार विश्लेषण सकारात्मक है। हमने कई समाचार स्रोतों से जानकारी एकत्र की है।";
        let chunks = chunk_text(text, 50);
        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 50));
        assert!(chunks[0].ends_with('।'));
        assert_eq!(chunks.join(" "), text);
    }

    #[test]
    fn test_unbroken_text_is_hard_split() {
        let text = "a".repeat(250);
        let chunks = chunk_text(&text, 100);
        assert_eq!(chunks.iter().map(|c| c.len()).collect::<Vec<_>>(), vec![100, 100, 50]);
    }

    #[test]
    fn test_chunk_url() {
        let tts = GoogleTranslateTts::new(Duration::from_secs(1), "test").unwrap();
        let url = tts.chunk_url("कंपनी", "hi", 0, 1).unwrap();
        assert!(url.as_str().starts_with("https://translate.google.com/translate_tts?ie=UTF-8"));
        assert!(url.query_pairs().any(|(k, v)| k == "tl" && v == "hi"));
        assert!(url.query_pairs().any(|(k, v)| k == "q" && v == "कंपनी"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let tts = GoogleTranslateTts::new(Duration::from_millis(500), "test")
            .unwrap()
            .with_base_url("http://127.0.0.1:9/translate_tts");
        assert!(tts.synthesize("hello", "hi").await.is_err());
    }
}
