use std::sync::Arc;

use axum::{routing::get, Router};

use affiliation_cell::router::affiliation_routes;
use availability_cell::router::availability_routes;
use onboarding_cell::router::onboarding_routes;
use shared_utils::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic Operations API is running!" }))
        .nest("/onboarding", onboarding_routes(state.clone()))
        .nest("/affiliations", affiliation_routes(state.clone()))
        .nest("/availability", availability_routes(state))
}
