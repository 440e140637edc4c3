use anyhow::Context;
use clap::Parser;
use ns_core::{Config, ModelBackend, SpeechMode};
use ns_scrappers::{init_logging, ReportManager};
use ns_speech::{GoogleTranslateTts, SpeechSummarizer};
use ns_web::AppState;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

/// Seconds per unit suffix. A trailing number without a suffix is seconds.
fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        's' => Some(1),
        'm' => Some(60),
        'h' => Some(3600),
        _ => None,
    }
}

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err("Duration must include a number".to_string());
        }

        let mut total = 0u64;
        let mut rest = compact.as_str();
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits == 0 {
                return Err(format!("Expected a number before '{}'", rest));
            }
            let amount: u64 = rest[..digits]
                .parse()
                .map_err(|_| format!("Number too large in duration: {}", &rest[..digits]))?;
            rest = &rest[digits..];

            let multiplier = match rest.chars().next() {
                None => 1,
                Some(unit) => {
                    rest = &rest[unit.len_utf8()..];
                    unit_seconds(unit).ok_or_else(|| format!("Invalid duration unit: {}", unit))?
                }
            };
            total = amount
                .checked_mul(multiplier)
                .and_then(|secs| total.checked_add(secs))
                .ok_or_else(|| format!("Duration too long: {}", s))?;
        }

        Ok(HumanDuration(Duration::from_secs(total)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Company news sentiment reports", long_about = None)]
pub struct Cli {
    #[arg(long, env = "NS_MODEL", help = "Sentiment model: huggingface (default), service, dummy, none")]
    model: Option<ModelBackend>,
    #[arg(long)]
    model_name: Option<String>,
    #[arg(long)]
    model_url: Option<String>,
    #[arg(long, env = "NS_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,
    #[arg(long)]
    max_articles: Option<usize>,
    #[arg(long, help = "Per-request timeout (e.g. 10s, 1m30s)")]
    timeout: Option<HumanDuration>,
    #[arg(long)]
    audio_dir: Option<PathBuf>,
    #[arg(long, help = "What gets spoken: template (default) or narrative")]
    speech_mode: Option<SpeechMode>,
    #[arg(long)]
    language: Option<String>,
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print the sentiment report for a company as JSON
    Report {
        company: String,
        #[arg(long)]
        pretty: bool,
        /// List every fallback taken while building the report on stderr
        #[arg(long)]
        show_degradations: bool,
    },
    /// Build the report and write its spoken summary
    Speak {
        company: String,
    },
    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "NS_BIND_ADDR")]
        bind: Option<String>,
    },
}

impl Cli {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = Config::from_env().context("invalid NS_* environment")?;
        if let Some(model) = self.model {
            config.model = model;
        }
        if self.model_name.is_some() {
            config.model_name = self.model_name.clone();
        }
        if self.model_url.is_some() {
            config.model_url = self.model_url.clone();
        }
        if self.api_token.is_some() {
            config.api_token = self.api_token.clone();
        }
        if let Some(max_articles) = self.max_articles {
            config.max_articles = max_articles;
        }
        if let Some(timeout) = &self.timeout {
            config.request_timeout = timeout.0;
        }
        if let Some(dir) = &self.audio_dir {
            config.audio_dir = dir.clone();
        }
        if let Some(mode) = self.speech_mode {
            config.speech_mode = mode;
        }
        if let Some(language) = &self.language {
            config.speech_language = language.clone();
        }
        if let Commands::Serve { bind: Some(bind) } = &self.command {
            config.bind_addr = bind.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn speech_summarizer(config: &Config) -> anyhow::Result<SpeechSummarizer> {
    let tts = GoogleTranslateTts::new(config.request_timeout, &config.user_agent)?;
    Ok(SpeechSummarizer::from_config(Arc::new(tts), config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log);

    let config = cli.config()?;
    let manager = ReportManager::from_config(&config).context("failed to initialize the report pipeline")?;
    info!("🧠 Sentiment model: {}", manager.model_name());

    match cli.command {
        Commands::Report { company, pretty, show_degradations } => {
            let run = manager.process_company_news(&company).await?;
            if show_degradations {
                for degradation in &run.degradations {
                    eprintln!("{}", degradation);
                }
            }
            let json = if pretty {
                serde_json::to_string_pretty(&run.report)?
            } else {
                serde_json::to_string(&run.report)?
            };
            println!("{}", json);
        }
        Commands::Speak { company } => {
            let run = manager.process_company_news(&company).await?;
            let stage = speech_summarizer(&config)?.summarize(&run.report).await;
            if let Some(degradation) = stage.degradation() {
                warn!("{}", degradation);
            }
            let summary = stage
                .value()
                .context("speech summary could not be produced")?;
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        Commands::Serve { .. } => {
            let state = AppState::new(manager, speech_summarizer(&config)?);
            ns_web::serve(state, &config.bind_addr).await?;
        }
    }

    Ok(())
}
