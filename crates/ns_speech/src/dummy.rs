use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use ns_core::{Error, Result, SpeechSynthesizer};

/// Synthesizer that produces a fixed byte pattern instead of audio.
#[derive(Debug, Default)]
pub struct DummySynthesizer {
    failures_left: AtomicUsize,
    calls: AtomicUsize,
}

impl DummySynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the first `n` calls, then succeeds.
    pub fn failing_times(n: usize) -> Self {
        Self {
            failures_left: AtomicUsize::new(n),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::failing_times(usize::MAX)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for DummySynthesizer {
    fn name(&self) -> &str {
        "dummy"
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(Error::Synthesis("dummy synthesizer configured to fail".to_string()));
        }
        Ok(format!("{}:{}", language, text).into_bytes())
    }
}
