use std::sync::Arc;

use shared_config::AppConfig;

use crate::state::AppState;

pub struct TestConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub directory_base_url: String,
    pub booking_base_url: String,
    pub collaborator_timeout_secs: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:54321".to_string(),
            store_service_key: "test-service-key".to_string(),
            directory_base_url: "http://localhost:54322".to_string(),
            booking_base_url: "http://localhost:54323".to_string(),
            collaborator_timeout_secs: 1,
        }
    }
}

impl TestConfig {
    /// All collaborators pointed at one mock server.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            store_url: base_url.to_string(),
            directory_base_url: base_url.to_string(),
            booking_base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            store_url: self.store_url.clone(),
            store_service_key: self.store_service_key.clone(),
            directory_base_url: self.directory_base_url.clone(),
            booking_base_url: self.booking_base_url.clone(),
            collaborator_timeout_secs: self.collaborator_timeout_secs,
        }
    }

    pub fn to_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(self.to_app_config()))
    }
}
