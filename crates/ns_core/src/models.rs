use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::Result;

/// Raw output of a binary sentiment model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub label: String,
    pub score: f32,
}

#[async_trait]
pub trait SentimentModel: Send + Sync {
    fn name(&self) -> &str;

    /// Longest input, in characters, the model accepts.
    fn max_input_chars(&self) -> usize {
        512
    }

    /// Classify a piece of text
    async fn classify(&self, text: &str) -> Result<ModelPrediction>;
}
