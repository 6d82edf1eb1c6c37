use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_url: String,
    pub store_service_key: String,
    pub directory_base_url: String,
    pub booking_base_url: String,
    pub collaborator_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            store_url: env::var("CLINIC_STORE_URL")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_STORE_URL not set, using empty value");
                    String::new()
                }),
            store_service_key: env::var("CLINIC_STORE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("CLINIC_STORE_SERVICE_KEY not set, using empty value");
                    String::new()
                }),
            directory_base_url: env::var("PRACTITIONER_DIRECTORY_URL")
                .unwrap_or_else(|_| {
                    warn!("PRACTITIONER_DIRECTORY_URL not set, using empty value");
                    String::new()
                }),
            booking_base_url: env::var("BOOKING_SERVICE_URL")
                .unwrap_or_else(|_| {
                    warn!("BOOKING_SERVICE_URL not set, using empty value");
                    String::new()
                }),
            collaborator_timeout_secs: env::var("COLLABORATOR_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.store_url.is_empty()
            && !self.store_service_key.is_empty()
            && !self.directory_base_url.is_empty()
    }
}
