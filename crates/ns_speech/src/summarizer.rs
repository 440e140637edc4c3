use std::path::{Path, PathBuf};
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use ns_core::{CompanyReport, Config, Degradation, SpeechMode, SpeechSummary, SpeechSynthesizer, Stage};
use tracing::{error, info, warn};

const NARRATIVE_ARTICLES: usize = 3;
const HINDI_ERROR_CLIP: &str = "त्रुटि हुई है";
const HINDI_DEFAULT_COMPANY: &str = "कंपनी";

lazy_static! {
    static ref COMPANY_RE: Regex = Regex::new(r"Company: ([^.]+)").unwrap();
    static ref SENTIMENT_RE: Regex = Regex::new(r"sentiment: ([^.]+)").unwrap();
}

/// Turns a report into a narrative and a spoken audio file.
pub struct SpeechSummarizer {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    language: String,
    mode: SpeechMode,
    output_dir: PathBuf,
}

impl SpeechSummarizer {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            synthesizer,
            language: "hi".to_string(),
            mode: SpeechMode::Template,
            output_dir: output_dir.into(),
        }
    }

    pub fn from_config(synthesizer: Arc<dyn SpeechSynthesizer>, config: &Config) -> Self {
        Self::new(synthesizer, config.audio_dir.clone())
            .with_language(config.speech_language.clone())
            .with_mode(config.speech_mode)
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_mode(mut self, mode: SpeechMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn audio_path(&self, company: &str) -> PathBuf {
        let stem: String = company
            .trim()
            .chars()
            .map(|c| if c.is_whitespace() || matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.output_dir.join(format!("{}_summary.mp3", stem))
    }

    /// Text handed to the synthesizer for a given narrative.
    pub fn spoken_text(&self, narrative: &str) -> String {
        match self.mode {
            SpeechMode::Template => template_sentence(narrative),
            SpeechMode::Narrative => narrative.to_string(),
        }
    }

    /// Builds the narrative and writes the audio file. Never fails: synthesis
    /// errors produce a spoken error clip, and if even that fails an empty file
    /// is left at the returned path.
    pub async fn summarize(&self, report: &CompanyReport) -> Stage<SpeechSummary> {
        let text = build_narrative(report);
        let audio_file = self.audio_path(&report.company);
        let spoken = self.spoken_text(&text);

        let degradation = match self.synthesizer.synthesize(&spoken, &self.language).await {
            Ok(audio) => match write_audio(&audio_file, &audio).await {
                Ok(()) => {
                    info!("🔊 Wrote {} bytes of speech to {}", audio.len(), audio_file.display());
                    return Stage::Ok(SpeechSummary { audio_file, text });
                }
                Err(e) => Degradation::from_error("speech", &e),
            },
            Err(e) => {
                warn!("Speech synthesis with {} failed: {}", self.synthesizer.name(), e);
                Degradation::from_error("speech", &e)
            }
        };

        self.write_fallback_clip(&audio_file).await;
        Stage::Degraded(SpeechSummary { audio_file, text }, degradation)
    }

    async fn write_fallback_clip(&self, path: &Path) {
        match self.synthesizer.synthesize(HINDI_ERROR_CLIP, &self.language).await {
            Ok(audio) => {
                if write_audio(path, &audio).await.is_ok() {
                    return;
                }
            }
            Err(e) => warn!("Fallback speech clip failed too: {}", e),
        }
        if let Err(e) = write_audio(path, &[]).await {
            error!("Could not write placeholder audio {}: {}", path.display(), e);
        }
    }
}

async fn write_audio(path: &Path, audio: &[u8]) -> ns_core::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, audio).await?;
    Ok(())
}

/// `Company: <name>. Overall sentiment: <statement> Article 1: <title>. <summary> ...`
pub fn build_narrative(report: &CompanyReport) -> String {
    let mut text = format!("Company: {}. ", report.company);
    text.push_str(&format!("Overall sentiment: {} ", report.final_sentiment_analysis));
    for (i, article) in report.articles.iter().take(NARRATIVE_ARTICLES).enumerate() {
        text.push_str(&format!("Article {}: {}. {} ", i + 1, article.title, article.summary));
    }
    text
}

/// Reduces a narrative to the fixed Hindi sentence: company name plus a
/// positive / negative / mixed bucket read from the overall sentiment line.
pub fn template_sentence(narrative: &str) -> String {
    let company = COMPANY_RE
        .captures(narrative)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| HINDI_DEFAULT_COMPANY.to_string());

    let lowered = narrative.to_lowercase();
    let sentiment = SENTIMENT_RE
        .captures(&lowered)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");

    let bucket = if sentiment.contains("positive") {
        "सकारात्मक"
    } else if sentiment.contains("negative") {
        "नकारात्मक"
    } else {
        "मिश्रित"
    };

    format!(
        "{} के लिए समाचार विश्लेषण {} है। हमने कई समाचार स्रोतों से जानकारी एकत्र की है।",
        company, bucket
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DummySynthesizer;
    use ns_core::{AnalyzedArticle, ComparativeAnalysis, Sentiment, TopicOverlap};
    use std::collections::BTreeMap;

    fn report(company: &str, overall: &str) -> CompanyReport {
        let articles = (1..=4)
            .map(|i| AnalyzedArticle {
                title: format!("Headline {}", i),
                summary: format!("Summary {}.", i),
                sentiment: Sentiment::Neutral,
                topics: vec![],
                url: format!("https://example.com/{}", i),
            })
            .collect();
        let analysis = ComparativeAnalysis {
            sentiment_distribution: BTreeMap::from([(Sentiment::Neutral, 4)]),
            coverage_differences: vec![],
            topic_overlap: TopicOverlap::default(),
            final_sentiment_analysis: overall.to_string(),
        };
        CompanyReport::new(company, articles, analysis)
    }

    #[test]
    fn test_narrative_uses_first_three_articles() {
        let text = build_narrative(&report("Tesla", "The news coverage for Tesla is balanced, with no clear sentiment direction."));
        assert!(text.starts_with("Company: Tesla. Overall sentiment: The news coverage for Tesla is balanced"));
        assert!(text.contains("Article 3: Headline 3. Summary 3."));
        assert!(!text.contains("Headline 4"));
    }

    #[test]
    fn test_template_buckets() {
        let positive = build_narrative(&report(
            "Tesla",
            "The overall news coverage for Tesla is predominantly positive, suggesting strong market confidence.",
        ));
        assert_eq!(
            template_sentence(&positive),
            "Tesla के लिए समाचार विश्लेषण सकारात्मक है। हमने कई समाचार स्रोतों से जानकारी एकत्र की है।"
        );

        let negative = build_narrative(&report(
            "Intel",
            "The news coverage for Intel is mixed but leans negative, suggesting some market apprehension.",
        ));
        assert!(template_sentence(&negative).contains("नकारात्मक"));

        let balanced = build_narrative(&report(
            "IBM",
            "The news coverage for IBM is balanced, with no clear sentiment direction.",
        ));
        assert!(template_sentence(&balanced).starts_with("IBM के लिए"));
        assert!(template_sentence(&balanced).contains("मिश्रित"));

        assert!(template_sentence("nothing to match").starts_with("कंपनी"));
    }

    #[test]
    fn test_template_stops_at_first_period() {
        // the sentiment line is read up to the first period, which here falls
        // inside the company name, so the bucket is mixed
        let narrative = build_narrative(&report(
            "Tesla Inc.",
            "The overall news coverage for Tesla Inc. is predominantly positive, suggesting strong market confidence.",
        ));
        assert_eq!(
            template_sentence(&narrative),
            "Tesla Inc के लिए समाचार विश्लेषण मिश्रित है। हमने कई समाचार स्रोतों से जानकारी एकत्र की है।"
        );
    }

    #[tokio::test]
    async fn test_summarize_writes_audio() {
        let dir = tempfile::tempdir().unwrap();
        let synth = Arc::new(DummySynthesizer::new());
        let summarizer = SpeechSummarizer::new(synth.clone(), dir.path());

        let stage = summarizer.summarize(&report("Acme Corp", "The news coverage for Acme Corp is balanced.")).await;
        assert!(stage.is_ok());
        let summary = stage.value().unwrap();
        assert_eq!(summary.audio_file, dir.path().join("Acme_Corp_summary.mp3"));
        let audio = std::fs::read_to_string(&summary.audio_file).unwrap();
        assert!(audio.starts_with("hi:Acme Corp के लिए"));
        assert!(summary.text.starts_with("Company: Acme Corp."));
        assert_eq!(synth.calls(), 1);
    }

    #[tokio::test]
    async fn test_narrative_mode_speaks_full_text() {
        let dir = tempfile::tempdir().unwrap();
        let summarizer = SpeechSummarizer::new(Arc::new(DummySynthesizer::new()), dir.path())
            .with_mode(SpeechMode::Narrative)
            .with_language("en");
        let stage = summarizer.summarize(&report("Acme", "Balanced.")).await;
        let summary = stage.value().unwrap();
        let audio = std::fs::read_to_string(&summary.audio_file).unwrap();
        assert_eq!(audio, format!("en:{}", summary.text));
    }

    #[tokio::test]
    async fn test_failed_synthesis_writes_error_clip() {
        let dir = tempfile::tempdir().unwrap();
        let summarizer = SpeechSummarizer::new(Arc::new(DummySynthesizer::failing_times(1)), dir.path());
        let stage = summarizer.summarize(&report("Acme", "Balanced.")).await;
        assert!(stage.is_degraded());
        let summary = stage.value().unwrap();
        assert_eq!(std::fs::read_to_string(&summary.audio_file).unwrap(), format!("hi:{}", HINDI_ERROR_CLIP));
    }

    #[tokio::test]
    async fn test_total_failure_leaves_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let summarizer = SpeechSummarizer::new(Arc::new(DummySynthesizer::failing()), dir.path().join("audio"));
        let stage = summarizer.summarize(&report("Acme", "Balanced.")).await;
        assert!(stage.is_degraded());
        let summary = stage.value().unwrap();
        assert!(summary.audio_file.exists());
        assert_eq!(std::fs::metadata(&summary.audio_file).unwrap().len(), 0);
        assert!(!summary.text.is_empty());
    }
}
