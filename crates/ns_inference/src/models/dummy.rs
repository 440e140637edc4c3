use std::fmt;
use ns_core::{Error, ModelPrediction, Result, SentimentModel};

/// Model that answers every request the same way. Stands in for the real
/// classifier in offline runs and tests.
pub struct DummyModel {
    label: Option<String>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").field("label", &self.label).finish()
    }
}

impl DummyModel {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }

    /// A model whose every call errors, as if inference were down.
    pub fn failing() -> Self {
        Self { label: None }
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new("POSITIVE")
    }
}

#[async_trait::async_trait]
impl SentimentModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn classify(&self, _text: &str) -> Result<ModelPrediction> {
        match &self.label {
            Some(label) => Ok(ModelPrediction {
                label: label.clone(),
                score: 1.0,
            }),
            None => Err(Error::ModelUnavailable("dummy model configured to fail".to_string())),
        }
    }
}
