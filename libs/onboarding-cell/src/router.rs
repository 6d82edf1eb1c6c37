use std::sync::Arc;

use axum::{
    routing::{delete, post},
    Router,
};

use shared_utils::state::AppState;

use crate::handlers;

pub fn onboarding_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::onboard_practitioner))
        .route(
            "/{clinic_id}/{practitioner_id}",
            delete(handlers::remove_practitioner),
        )
        .with_state(state)
}
