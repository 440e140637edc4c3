use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use ns_core::{Error, ModelPrediction, Result, SentimentModel};

#[derive(Debug, Serialize)]
struct PredictRequest {
    texts: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    #[serde(default)]
    score: f32,
}

/// Client for a self-hosted classifier exposing `POST {base_url}/predict`.
#[derive(Debug, Clone)]
pub struct ServiceModel {
    client: Client,
    base_url: String,
}

impl ServiceModel {
    pub fn new(base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SentimentModel for ServiceModel {
    fn name(&self) -> &str {
        "service"
    }

    async fn classify(&self, text: &str) -> Result<ModelPrediction> {
        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&PredictRequest {
                texts: vec![text.to_string()],
            })
            .send()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("sentiment service unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ModelUnavailable(format!("Status: {}", response.status())));
        }

        let prediction = response
            .json::<PredictResponse>()
            .await?
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| Error::ParseFailure("sentiment service returned no predictions".to_string()))?;

        Ok(ModelPrediction {
            label: prediction.label,
            score: prediction.score,
        })
    }
}
