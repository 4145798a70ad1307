//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub resume: String,
    pub cover_letter: String,
    pub match_score: u8,
    pub review_rounds: u32,
    pub issues: Vec<String>,
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
}

/// POST /api/v1/generate
///
/// Runs the full refinement pipeline against the loaded master profile and
/// returns the best resume and cover letter it produced.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let profile = state.profile.as_ref().ok_or(AppError::ProfileUnavailable)?;

    let output = state
        .orchestrator
        .run(&request.job_description, Value::clone(profile))
        .await?;

    info!(
        "Run {} returned score {} after {} round(s)",
        output.run_id, output.match_score, output.review_rounds
    );

    let issues = output
        .critique
        .as_ref()
        .map(|c| c.issues().to_vec())
        .unwrap_or_default();

    Ok(Json(GenerateResponse {
        resume: output.resume,
        cover_letter: output.cover_letter,
        match_score: output.match_score,
        review_rounds: output.review_rounds,
        issues,
        run_id: output.run_id,
        generated_at: Utc::now(),
    }))
}
