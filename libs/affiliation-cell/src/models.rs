use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClinicRole {
    Consultant,
    Visiting,
    Permanent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffiliationStatus {
    Pending,
    Active,
    Removed,
}

/// The granted relationship allowing a practitioner to work at a clinic.
/// At most one non-removed affiliation exists per (practitioner, clinic)
/// pair. Removal is a soft delete: status flips to `removed` and
/// `removed_at` is stamped, so the record survives for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Affiliation {
    pub id: Uuid,
    pub practitioner_id: Uuid,
    pub clinic_id: Uuid,
    pub role_in_clinic: ClinicRole,
    pub status: AffiliationStatus,
    pub standard_fee: f64,
    pub specializations_at_clinic: Vec<String>,
    pub secondary_login: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub removed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardAffiliationRequest {
    pub practitioner_id: Uuid,
    pub clinic_id: Uuid,
    pub role_in_clinic: ClinicRole,
    pub standard_fee: f64,
    pub specializations_at_clinic: Vec<String>,
    pub secondary_login: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AffiliationFilters {
    pub specialization: Option<String>,
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

#[derive(Error, Debug)]
pub enum AffiliationError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Affiliation already exists: {0}")]
    AlreadyExists(String),

    #[error("Affiliation not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<AffiliationError> for AppError {
    fn from(err: AffiliationError) -> Self {
        match err {
            AffiliationError::Validation(msg) => AppError::Validation(msg),
            AffiliationError::AlreadyExists(msg) => AppError::Conflict(msg),
            AffiliationError::NotFound(msg) => AppError::NotFound(msg),
            AffiliationError::Database(msg) => AppError::Database(msg),
        }
    }
}
