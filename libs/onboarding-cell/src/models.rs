use serde::{Deserialize, Serialize};
use uuid::Uuid;

use affiliation_cell::models::{Affiliation, ClinicRole};
use directory_cell::models::Practitioner;

#[derive(Debug, Clone, Deserialize)]
pub struct OnboardRequest {
    pub clinic_id: Uuid,
    pub practitioner_code: String,
    pub role_in_clinic: ClinicRole,
    pub standard_fee: f64,
    #[serde(default)]
    pub specializations_at_clinic: Vec<String>,
    pub secondary_login: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnboardingOutcome {
    pub practitioner: Practitioner,
    pub affiliation: Affiliation,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemovalOutcome {
    pub affiliation: Affiliation,
    /// Bookings detached by the Appointment/Booking collaborator; `None`
    /// when that best-effort call failed.
    pub detached_bookings: Option<i64>,
}
