use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::AffiliationFilters;
use crate::services::affiliation::AffiliationService;

#[axum::debug_handler]
pub async fn list_by_clinic(
    State(state): State<Arc<AppState>>,
    Path(clinic_id): Path<Uuid>,
    Query(filters): Query<AffiliationFilters>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state.config);

    let affiliations = service.list_by_clinic(clinic_id, &filters).await?;

    Ok(Json(json!({
        "clinic_id": clinic_id,
        "affiliations": affiliations,
        "total": affiliations.len(),
    })))
}

#[axum::debug_handler]
pub async fn list_by_practitioner(
    State(state): State<Arc<AppState>>,
    Path(practitioner_id): Path<Uuid>,
    Query(filters): Query<AffiliationFilters>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state.config);

    let affiliations = service.list_by_practitioner(practitioner_id, &filters).await?;

    Ok(Json(json!({
        "practitioner_id": practitioner_id,
        "affiliations": affiliations,
        "total": affiliations.len(),
    })))
}

#[axum::debug_handler]
pub async fn get_pair(
    State(state): State<Arc<AppState>>,
    Path((clinic_id, practitioner_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let service = AffiliationService::new(&state.config);

    let affiliation = service.get_pair(practitioner_id, clinic_id).await?;

    Ok(Json(json!(affiliation)))
}
