use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::store::{return_representation, StoreClient};

use crate::models::{
    Affiliation, AffiliationError, AffiliationFilters, AffiliationStatus,
    OnboardAffiliationRequest,
};

pub struct AffiliationService {
    store: StoreClient,
}

impl AffiliationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            store: StoreClient::new(config),
        }
    }

    /// Create the affiliation for a (practitioner, clinic) pair. The pair
    /// invariant is enforced here: any non-removed affiliation for the
    /// same pair blocks the write.
    pub async fn onboard(
        &self,
        request: OnboardAffiliationRequest,
    ) -> Result<Affiliation, AffiliationError> {
        debug!(
            "Onboarding practitioner {} at clinic {}",
            request.practitioner_id, request.clinic_id
        );

        if request.standard_fee < 0.0 {
            return Err(AffiliationError::Validation(
                "Standard fee must not be negative".to_string(),
            ));
        }

        let existing_path = format!(
            "/rest/v1/affiliations?practitioner_id=eq.{}&clinic_id=eq.{}&status=neq.removed",
            request.practitioner_id, request.clinic_id
        );
        let existing: Vec<Value> = self
            .store
            .request(Method::GET, &existing_path, None)
            .await
            .map_err(|e| AffiliationError::Database(e.to_string()))?;

        if !existing.is_empty() {
            return Err(AffiliationError::AlreadyExists(format!(
                "Practitioner {} is already affiliated with clinic {}",
                request.practitioner_id, request.clinic_id
            )));
        }

        let now = Utc::now();
        let affiliation_data = json!({
            "practitioner_id": request.practitioner_id,
            "clinic_id": request.clinic_id,
            "role_in_clinic": request.role_in_clinic,
            "status": AffiliationStatus::Active,
            "standard_fee": request.standard_fee,
            "specializations_at_clinic": request.specializations_at_clinic,
            "secondary_login": request.secondary_login,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
            "removed_at": null,
        });

        let result: Vec<Value> = self
            .store
            .request_with_headers(
                Method::POST,
                "/rest/v1/affiliations",
                Some(affiliation_data),
                Some(return_representation()),
            )
            .await
            .map_err(|e| AffiliationError::Database(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            AffiliationError::Database("Store did not return the created affiliation".to_string())
        })?;

        let affiliation: Affiliation = serde_json::from_value(row)
            .map_err(|e| AffiliationError::Database(format!("Malformed affiliation row: {}", e)))?;
        debug!("Affiliation created with ID: {}", affiliation.id);

        Ok(affiliation)
    }

    /// Soft-delete the pair's active affiliation.
    pub async fn remove(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<Affiliation, AffiliationError> {
        debug!(
            "Removing affiliation of practitioner {} at clinic {}",
            practitioner_id, clinic_id
        );

        let active = self.get_pair(practitioner_id, clinic_id).await?;

        let now = Utc::now();
        let path = format!("/rest/v1/affiliations?id=eq.{}", active.id);
        let update = json!({
            "status": AffiliationStatus::Removed,
            "removed_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
        });

        let result: Vec<Value> = self
            .store
            .request_with_headers(Method::PATCH, &path, Some(update), Some(return_representation()))
            .await
            .map_err(|e| AffiliationError::Database(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            AffiliationError::Database("Store did not return the removed affiliation".to_string())
        })?;

        serde_json::from_value(row)
            .map_err(|e| AffiliationError::Database(format!("Malformed affiliation row: {}", e)))
    }

    /// The pair's active affiliation, or `NotFound`.
    pub async fn get_pair(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<Affiliation, AffiliationError> {
        let path = format!(
            "/rest/v1/affiliations?practitioner_id=eq.{}&clinic_id=eq.{}&status=eq.active",
            practitioner_id, clinic_id
        );
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AffiliationError::Database(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            AffiliationError::NotFound(format!(
                "No active affiliation for practitioner {} at clinic {}",
                practitioner_id, clinic_id
            ))
        })?;

        serde_json::from_value(row)
            .map_err(|e| AffiliationError::Database(format!("Malformed affiliation row: {}", e)))
    }

    pub async fn list_by_clinic(
        &self,
        clinic_id: Uuid,
        filters: &AffiliationFilters,
    ) -> Result<Vec<Affiliation>, AffiliationError> {
        let mut path = format!(
            "/rest/v1/affiliations?clinic_id=eq.{}&status=eq.active&order=created_at.asc",
            clinic_id
        );
        if let Some(ref specialization) = filters.specialization {
            path.push_str(&format!(
                "&specializations_at_clinic=cs.{{{}}}",
                specialization
            ));
        }
        path.push_str(&format!("&limit={}", filters.limit.unwrap_or(50)));
        path.push_str(&format!("&offset={}", filters.offset.unwrap_or(0)));

        self.fetch_list(&path).await
    }

    pub async fn list_by_practitioner(
        &self,
        practitioner_id: Uuid,
        filters: &AffiliationFilters,
    ) -> Result<Vec<Affiliation>, AffiliationError> {
        let mut path = format!(
            "/rest/v1/affiliations?practitioner_id=eq.{}&status=eq.active&order=created_at.asc",
            practitioner_id
        );
        path.push_str(&format!("&limit={}", filters.limit.unwrap_or(50)));
        path.push_str(&format!("&offset={}", filters.offset.unwrap_or(0)));

        self.fetch_list(&path).await
    }

    async fn fetch_list(&self, path: &str) -> Result<Vec<Affiliation>, AffiliationError> {
        let result: Vec<Value> = self
            .store
            .request(Method::GET, path, None)
            .await
            .map_err(|e| AffiliationError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Affiliation>, _>>()
            .map_err(|e| AffiliationError::Database(format!("Malformed affiliation rows: {}", e)))
    }
}
