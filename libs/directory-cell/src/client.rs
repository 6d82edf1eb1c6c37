use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;

use crate::models::{DirectoryError, Practitioner};

/// HTTP client for the Practitioner Directory, the external identity
/// service. Every call carries its own timeout; a timed-out or
/// unreachable Directory must surface as `Unavailable`, never as a
/// missing practitioner.
pub struct DirectoryClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl DirectoryClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.directory_base_url.clone(),
            timeout: Duration::from_secs(config.collaborator_timeout_secs),
        }
    }

    pub async fn get_by_id(&self, practitioner_id: Uuid) -> Result<Practitioner, DirectoryError> {
        let url = format!("{}/practitioners/{}", self.base_url, practitioner_id);
        self.fetch_practitioner(&url, &practitioner_id.to_string()).await
    }

    pub async fn get_by_code(&self, practitioner_code: &str) -> Result<Practitioner, DirectoryError> {
        let url = format!("{}/practitioners/by-code/{}", self.base_url, practitioner_code);
        self.fetch_practitioner(&url, practitioner_code).await
    }

    /// Tell the Directory a practitioner gained or lost a clinic
    /// affiliation. Callers treat failures as best-effort; the
    /// affiliation record is authoritative.
    pub async fn notify_affiliation(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
        affiliated: bool,
    ) -> Result<(), DirectoryError> {
        let url = format!("{}/practitioners/{}/affiliations", self.base_url, practitioner_id);
        debug!(
            "Notifying directory: practitioner {} {} clinic {}",
            practitioner_id,
            if affiliated { "joined" } else { "left" },
            clinic_id
        );

        let response = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(&json!({ "clinic_id": clinic_id, "affiliated": affiliated }))
            .send()
            .await
            .map_err(|e| map_transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Protocol(format!(
                "Directory rejected affiliation notification ({})",
                status
            )));
        }

        Ok(())
    }

    async fn fetch_practitioner(
        &self,
        url: &str,
        reference: &str,
    ) -> Result<Practitioner, DirectoryError> {
        debug!("Resolving practitioner {} via {}", reference, url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| map_transport_error(url, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DirectoryError::NotFound(format!(
                "No practitioner matching {}",
                reference
            )));
        }
        if !status.is_success() {
            return Err(DirectoryError::Unavailable(format!(
                "Directory returned {}",
                status
            )));
        }

        response
            .json::<Practitioner>()
            .await
            .map_err(|e| DirectoryError::Protocol(format!("Malformed directory response: {}", e)))
    }
}

fn map_transport_error(url: &str, err: reqwest::Error) -> DirectoryError {
    if err.is_timeout() {
        DirectoryError::Unavailable(format!("Directory timed out at {}", url))
    } else if err.is_connect() {
        DirectoryError::Unavailable(format!("Directory unreachable at {}", url))
    } else {
        DirectoryError::Protocol(err.to_string())
    }
}
