use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use ns_core::{Error, ModelPrediction, Result, SentimentModel};

pub const DEFAULT_MODEL: &str = "distilbert-base-uncased-finetuned-sst-2-english";
const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co/models";

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// The inference API answers `[[{label, score}, ..]]` for text classification
/// but some deployments drop the outer batch dimension.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
    Error { error: String },
}

impl InferenceResponse {
    fn best(self) -> Result<LabelScore> {
        let candidates = match self {
            InferenceResponse::Batched(batches) => batches.into_iter().next().unwrap_or_default(),
            InferenceResponse::Flat(scores) => scores,
            InferenceResponse::Error { error } => return Err(Error::ModelUnavailable(error)),
        };

        candidates
            .into_iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| Error::ParseFailure("empty classification response".to_string()))
    }
}

/// Binary sentiment model served by the Hugging Face inference API.
pub struct HuggingFaceModel {
    client: Client,
    api_token: Option<String>,
    endpoint: String,
    model_name: String,
}

impl HuggingFaceModel {
    pub fn new(
        model_name: Option<String>,
        base_url: Option<String>,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let model_name = model_name.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            client,
            api_token,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model_name),
            model_name,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl fmt::Debug for HuggingFaceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HuggingFaceModel")
            .field("client", &"<reqwest::Client>")
            .field("api_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[async_trait]
impl SentimentModel for HuggingFaceModel {
    fn name(&self) -> &str {
        &self.model_name
    }

    async fn classify(&self, text: &str) -> Result<ModelPrediction> {
        let mut request = self.client.post(&self.endpoint).json(&InferenceRequest { inputs: text });
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ModelUnavailable(format!("inference request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::ModelUnavailable(format!(
                "{} returned status {}",
                self.model_name,
                response.status()
            )));
        }

        let best = response.json::<InferenceResponse>().await?.best()?;
        Ok(ModelPrediction {
            label: best.label,
            score: best.score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint() {
        let model = HuggingFaceModel::new(None, None, None, Duration::from_secs(1)).unwrap();
        assert_eq!(model.name(), DEFAULT_MODEL);
        assert_eq!(
            model.endpoint(),
            "https://api-inference.huggingface.co/models/distilbert-base-uncased-finetuned-sst-2-english"
        );

        let model = HuggingFaceModel::new(
            Some("finbert".to_string()),
            Some("http://localhost:8080/".to_string()),
            None,
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(model.endpoint(), "http://localhost:8080/finbert");
    }

    #[test]
    fn test_response_parsing() {
        let batched: InferenceResponse = serde_json::from_str(
            r#"[[{"label":"NEGATIVE","score":0.12},{"label":"POSITIVE","score":0.88}]]"#,
        )
        .unwrap();
        assert_eq!(batched.best().unwrap().label, "POSITIVE");

        let flat: InferenceResponse =
            serde_json::from_str(r#"[{"label":"NEGATIVE","score":0.97}]"#).unwrap();
        assert_eq!(flat.best().unwrap().label, "NEGATIVE");

        let loading: InferenceResponse =
            serde_json::from_str(r#"{"error":"Model is currently loading"}"#).unwrap();
        assert!(matches!(loading.best(), Err(Error::ModelUnavailable(_))));

        let empty: InferenceResponse = serde_json::from_str("[]").unwrap();
        assert!(empty.best().is_err());
    }
}
