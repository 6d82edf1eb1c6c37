use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::OnboardRequest;
use crate::services::onboarding::OnboardingService;

#[axum::debug_handler]
pub async fn onboard_practitioner(
    State(state): State<Arc<AppState>>,
    Json(request): Json<OnboardRequest>,
) -> Result<Json<Value>, AppError> {
    let service = OnboardingService::new(state);

    let outcome = service.onboard(request).await?;

    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn remove_practitioner(
    State(state): State<Arc<AppState>>,
    Path((clinic_id, practitioner_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let service = OnboardingService::new(state);

    let outcome = service.remove(clinic_id, practitioner_id).await?;

    Ok(Json(json!(outcome)))
}
