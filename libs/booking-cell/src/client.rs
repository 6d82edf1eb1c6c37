use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{BookingError, DetachResult};

/// HTTP client for the Appointment/Booking collaborator. Used on
/// affiliation removal to clear dangling practitioner references from
/// existing bookings.
pub struct BookingClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BookingClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.booking_base_url.clone(),
            timeout: Duration::from_secs(config.collaborator_timeout_secs),
        }
    }

    pub async fn detach_practitioner(
        &self,
        clinic_id: Uuid,
        practitioner_id: Uuid,
    ) -> Result<DetachResult, BookingError> {
        let url = format!("{}/bookings/detach-practitioner", self.base_url);
        debug!(
            "Detaching practitioner {} from bookings at clinic {}",
            practitioner_id, clinic_id
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({
                "clinic_id": clinic_id,
                "practitioner_id": practitioner_id,
            }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    BookingError::Unavailable(format!("Booking service unreachable: {}", e))
                } else {
                    BookingError::Protocol(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BookingError::Unavailable(format!(
                "Booking service returned {}",
                status
            )));
        }

        response
            .json::<DetachResult>()
            .await
            .map_err(|e| BookingError::Protocol(format!("Malformed booking response: {}", e)))
    }
}
