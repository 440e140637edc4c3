use std::sync::Arc;

use axum::{extract::State, Json};
use ns_core::{CompanyReport, SpeechSummary};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CompanyRequest {
    #[serde(default)]
    pub company_name: String,
}

async fn build_report(state: &AppState, company: &str) -> Result<CompanyReport, ApiError> {
    let run = state.manager.process_company_news(company).await?;
    for degradation in &run.degradations {
        warn!("{}", degradation);
    }
    Ok(run.report)
}

pub async fn news_sentiment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<CompanyReport>, ApiError> {
    info!("POST /api/news_sentiment {}", request.company_name);
    Ok(Json(build_report(&state, &request.company_name).await?))
}

pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CompanyRequest>,
) -> Result<Json<SpeechSummary>, ApiError> {
    info!("POST /api/text_to_speech {}", request.company_name);
    let report = build_report(&state, &request.company_name).await?;

    let stage = state.speech.summarize(&report).await;
    if let Some(degradation) = stage.degradation() {
        warn!("{}", degradation);
    }
    let (summary, degradation) = stage.into_parts();
    summary.map(Json).ok_or_else(|| {
        ApiError::Internal(degradation.map(|d| d.to_string()).unwrap_or_default())
    })
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "status": "ok", "model": state.manager.model_name() }))
}
