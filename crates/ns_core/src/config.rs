use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Which primary sentiment model to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelBackend {
    /// Hosted Hugging Face inference API
    HuggingFace,
    /// Self-hosted classifier exposing `POST /predict`
    Service,
    /// Fixed-label model, for offline runs
    Dummy,
    /// No primary model; every article goes through the keyword classifier
    None,
}

impl FromStr for ModelBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(ModelBackend::HuggingFace),
            "service" => Ok(ModelBackend::Service),
            "dummy" => Ok(ModelBackend::Dummy),
            "none" | "fallback" => Ok(ModelBackend::None),
            other => Err(format!("Unknown model backend: {}", other)),
        }
    }
}

/// What the speech summarizer actually speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechMode {
    /// Fixed secondary-language sentence carrying the company and a sentiment bucket
    Template,
    /// The full narrative text that is returned to the caller
    Narrative,
}

impl FromStr for SpeechMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "template" => Ok(SpeechMode::Template),
            "narrative" => Ok(SpeechMode::Narrative),
            other => Err(format!("Unknown speech mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub max_articles: usize,
    pub request_timeout: Duration,
    /// Upper bound on articles extracted and classified at the same time
    pub concurrency: usize,
    pub user_agent: String,
    pub model: ModelBackend,
    pub model_name: Option<String>,
    pub model_url: Option<String>,
    pub api_token: Option<String>,
    pub speech_language: String,
    pub speech_mode: SpeechMode,
    pub audio_dir: PathBuf,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_articles: 5,
            request_timeout: Duration::from_secs(10),
            concurrency: 5,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            model: ModelBackend::HuggingFace,
            model_name: None,
            model_url: None,
            api_token: None,
            speech_language: "hi".to_string(),
            speech_mode: SpeechMode::Template,
            audio_dir: PathBuf::from("."),
            bind_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

impl Config {
    /// Builds a config from `NS_*` environment variables (a `.env` file is
    /// honoured), falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(v) = lookup("NS_MAX_ARTICLES") {
            config.max_articles = parse_var("NS_MAX_ARTICLES", &v)?;
        }
        if let Some(v) = lookup("NS_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(parse_var("NS_REQUEST_TIMEOUT_SECS", &v)?);
        }
        if let Some(v) = lookup("NS_CONCURRENCY") {
            config.concurrency = parse_var("NS_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("NS_USER_AGENT") {
            config.user_agent = v;
        }
        if let Some(v) = lookup("NS_MODEL") {
            config.model = v.parse().map_err(Error::InvalidInput)?;
        }
        config.model_name = lookup("NS_MODEL_NAME").or(config.model_name);
        config.model_url = lookup("NS_MODEL_URL").or(config.model_url);
        config.api_token = lookup("NS_API_TOKEN").or_else(|| lookup("HF_API_TOKEN"));
        if let Some(v) = lookup("NS_SPEECH_LANGUAGE") {
            config.speech_language = v;
        }
        if let Some(v) = lookup("NS_SPEECH_MODE") {
            config.speech_mode = v.parse().map_err(Error::InvalidInput)?;
        }
        if let Some(v) = lookup("NS_AUDIO_DIR") {
            config.audio_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("NS_BIND_ADDR") {
            config.bind_addr = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_articles == 0 {
            return Err(Error::InvalidInput("max_articles must be at least 1".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::InvalidInput("concurrency must be at least 1".to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(Error::InvalidInput("request_timeout must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{} has an invalid value: {}", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.max_articles, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.speech_language, "hi");
        assert_eq!(config.speech_mode, SpeechMode::Template);
        assert_eq!(config.model, ModelBackend::HuggingFace);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("NS_MAX_ARTICLES", "8"),
            ("NS_REQUEST_TIMEOUT_SECS", "3"),
            ("NS_MODEL", "dummy"),
            ("NS_SPEECH_MODE", "narrative"),
            ("HF_API_TOKEN", "secret"),
        ]))
        .unwrap();
        assert_eq!(config.max_articles, 8);
        assert_eq!(config.request_timeout, Duration::from_secs(3));
        assert_eq!(config.model, ModelBackend::Dummy);
        assert_eq!(config.speech_mode, SpeechMode::Narrative);
        assert_eq!(config.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup_from(&[("NS_MAX_ARTICLES", "many")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("NS_MAX_ARTICLES", "0")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("NS_MODEL", "gpt")])).is_err());
        assert!(Config::from_lookup(lookup_from(&[("NS_SPEECH_MODE", "loud")])).is_err());
    }
}
