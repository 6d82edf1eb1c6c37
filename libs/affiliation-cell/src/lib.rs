pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::{
    Affiliation, AffiliationError, AffiliationStatus, ClinicRole, OnboardAffiliationRequest,
};
pub use services::affiliation::AffiliationService;
