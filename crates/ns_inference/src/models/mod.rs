use std::sync::Arc;
use ns_core::{Config, Error, ModelBackend, Result, SentimentModel};
use tracing::info;

pub mod dummy;
pub mod huggingface;
pub mod service;

pub use dummy::DummyModel;
pub use huggingface::HuggingFaceModel;
pub use service::ServiceModel;

/// Builds the primary sentiment model selected in `config`.
///
/// `Ok(None)` means no primary model was requested and every article will be
/// scored by the keyword classifier.
pub fn create_model(config: &Config) -> Result<Option<Arc<dyn SentimentModel>>> {
    let model: Arc<dyn SentimentModel> = match config.model {
        ModelBackend::HuggingFace => Arc::new(HuggingFaceModel::new(
            config.model_name.clone(),
            config.model_url.clone(),
            config.api_token.clone(),
            config.request_timeout,
        )?),
        ModelBackend::Service => {
            let url = config.model_url.clone().ok_or_else(|| {
                Error::InvalidInput("the service model backend needs a model URL".to_string())
            })?;
            Arc::new(ServiceModel::new(url, config.request_timeout)?)
        }
        ModelBackend::Dummy => Arc::new(DummyModel::new(
            config.model_name.clone().unwrap_or_else(|| "POSITIVE".to_string()),
        )),
        ModelBackend::None => {
            info!("No primary sentiment model configured, using keyword classifier");
            return Ok(None);
        }
    };
    info!("Sentiment model initialized: {}", model.name());
    Ok(Some(model))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model() {
        let mut config = Config::default();
        let model = create_model(&config).unwrap().unwrap();
        assert_eq!(model.name(), huggingface::DEFAULT_MODEL);

        config.model = ModelBackend::None;
        assert!(create_model(&config).unwrap().is_none());

        config.model = ModelBackend::Dummy;
        assert_eq!(create_model(&config).unwrap().unwrap().name(), "Dummy");

        config.model = ModelBackend::Service;
        assert!(create_model(&config).is_err());
        config.model_url = Some("http://localhost:8003".to_string());
        assert_eq!(create_model(&config).unwrap().unwrap().name(), "service");
    }
}
