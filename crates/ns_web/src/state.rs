use ns_scrappers::ReportManager;
use ns_speech::SpeechSummarizer;

pub struct AppState {
    pub manager: ReportManager,
    pub speech: SpeechSummarizer,
}

impl AppState {
    pub fn new(manager: ReportManager, speech: SpeechSummarizer) -> Self {
        Self { manager, speech }
    }
}
