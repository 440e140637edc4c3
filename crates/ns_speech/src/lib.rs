pub mod dummy;
pub mod gtts;
pub mod summarizer;

pub use dummy::DummySynthesizer;
pub use gtts::GoogleTranslateTts;
pub use summarizer::{build_narrative, template_sentence, SpeechSummarizer};

pub mod prelude {
    pub use super::{DummySynthesizer, GoogleTranslateTts, SpeechSummarizer};
    pub use ns_core::{Result, Error, SpeechMode, SpeechSummary, SpeechSynthesizer};
}
