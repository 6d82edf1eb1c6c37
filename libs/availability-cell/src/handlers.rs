use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{SlotListRequest, WriteMode};
use crate::services::availability::AvailabilityService;

#[axum::debug_handler]
pub async fn replace_availability(
    State(state): State<Arc<AppState>>,
    Path((clinic_id, practitioner_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SlotListRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state);

    let document = service
        .add_or_replace_availability(
            practitioner_id,
            clinic_id,
            &request.slots,
            WriteMode::Replace,
        )
        .await?;

    Ok(Json(json!(document)))
}

#[axum::debug_handler]
pub async fn append_slots(
    State(state): State<Arc<AppState>>,
    Path((clinic_id, practitioner_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SlotListRequest>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state);

    let document = service
        .add_or_replace_availability(
            practitioner_id,
            clinic_id,
            &request.slots,
            WriteMode::Append,
        )
        .await?;

    Ok(Json(json!(document)))
}

#[axum::debug_handler]
pub async fn get_by_practitioner(
    State(state): State<Arc<AppState>>,
    Path(practitioner_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state);

    let documents = service.read_by_practitioner(practitioner_id).await?;

    let clinics: Vec<Value> = documents
        .iter()
        .map(|doc| json!({ "clinic_id": doc.clinic_id, "slots": doc.slots }))
        .collect();

    Ok(Json(json!({
        "practitioner_id": practitioner_id,
        "clinics": clinics,
    })))
}

#[axum::debug_handler]
pub async fn get_by_clinic(
    State(state): State<Arc<AppState>>,
    Path(clinic_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state);

    let documents = service.read_by_clinic(clinic_id).await?;

    let practitioners: Vec<Value> = documents
        .iter()
        .map(|doc| json!({ "practitioner_id": doc.practitioner_id, "slots": doc.slots }))
        .collect();

    Ok(Json(json!({
        "clinic_id": clinic_id,
        "practitioners": practitioners,
    })))
}

#[axum::debug_handler]
pub async fn get_pair(
    State(state): State<Arc<AppState>>,
    Path((clinic_id, practitioner_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(state);

    let document = service.read_pair(practitioner_id, clinic_id).await?;

    Ok(Json(json!(document)))
}
