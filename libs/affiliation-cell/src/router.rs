use std::sync::Arc;

use axum::{routing::get, Router};

use shared_utils::state::AppState;

use crate::handlers;

pub fn affiliation_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/clinic/{clinic_id}", get(handlers::list_by_clinic))
        .route(
            "/practitioner/{practitioner_id}",
            get(handlers::list_by_practitioner),
        )
        .route(
            "/{clinic_id}/{practitioner_id}",
            get(handlers::get_pair),
        )
        .with_state(state)
}
