use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_utils::state::AppState;

use crate::handlers;

pub fn availability_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/practitioner/{practitioner_id}",
            get(handlers::get_by_practitioner),
        )
        .route("/clinic/{clinic_id}", get(handlers::get_by_clinic))
        .route(
            "/{clinic_id}/{practitioner_id}",
            get(handlers::get_pair).put(handlers::replace_availability),
        )
        .route(
            "/{clinic_id}/{practitioner_id}/slots",
            post(handlers::append_slots),
        )
        .with_state(state)
}
