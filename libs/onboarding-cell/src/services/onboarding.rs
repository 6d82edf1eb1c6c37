use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use affiliation_cell::models::OnboardAffiliationRequest;
use affiliation_cell::services::affiliation::AffiliationService;
use availability_cell::services::availability::AvailabilityService;
use booking_cell::client::BookingClient;
use directory_cell::client::DirectoryClient;
use shared_models::error::AppError;
use shared_utils::state::AppState;

use crate::models::{OnboardRequest, OnboardingOutcome, RemovalOutcome};

/// Composes the Practitioner Directory, Affiliation Registry,
/// Availability Store and Booking collaborator into the onboarding and
/// removal flows. There is no cross-service transaction: the affiliation
/// write is authoritative, every downstream step is best-effort and
/// failure of a later step never rolls back an earlier one.
pub struct OnboardingService {
    directory: DirectoryClient,
    booking: BookingClient,
    affiliations: AffiliationService,
    availability: AvailabilityService,
}

impl OnboardingService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            directory: DirectoryClient::new(&state.config),
            booking: BookingClient::new(&state.config),
            affiliations: AffiliationService::new(&state.config),
            availability: AvailabilityService::new(state),
        }
    }

    pub async fn onboard(&self, request: OnboardRequest) -> Result<OnboardingOutcome, AppError> {
        debug!(
            "Onboarding practitioner {} at clinic {}",
            request.practitioner_code, request.clinic_id
        );

        let practitioner = self
            .directory
            .get_by_code(&request.practitioner_code)
            .await?;

        if !practitioner.is_active {
            return Err(AppError::NotFound(format!(
                "Practitioner {} is inactive in the directory",
                request.practitioner_code
            )));
        }

        let affiliation = self
            .affiliations
            .onboard(OnboardAffiliationRequest {
                practitioner_id: practitioner.id,
                clinic_id: request.clinic_id,
                role_in_clinic: request.role_in_clinic,
                standard_fee: request.standard_fee,
                specializations_at_clinic: request.specializations_at_clinic,
                secondary_login: request.secondary_login,
            })
            .await?;

        if let Err(e) = self
            .directory
            .notify_affiliation(practitioner.id, request.clinic_id, true)
            .await
        {
            warn!(
                "Directory affiliation notification failed for practitioner {}: {}",
                practitioner.id, e
            );
        }

        info!(
            "Practitioner {} onboarded at clinic {}",
            practitioner.id, request.clinic_id
        );

        Ok(OnboardingOutcome {
            practitioner,
            affiliation,
        })
    }

    pub async fn remove(
        &self,
        clinic_id: Uuid,
        practitioner_id: Uuid,
    ) -> Result<RemovalOutcome, AppError> {
        debug!(
            "Removing practitioner {} from clinic {}",
            practitioner_id, clinic_id
        );

        let affiliation = self.affiliations.remove(practitioner_id, clinic_id).await?;

        // Removal cascades: the pair's availability document is archived
        // so its slots stop blocking the practitioner elsewhere.
        if let Err(e) = self
            .availability
            .archive_availability(practitioner_id, clinic_id)
            .await
        {
            warn!(
                "Failed to archive availability for practitioner {} at clinic {}: {}",
                practitioner_id, clinic_id, e
            );
        }

        let detached_bookings = match self
            .booking
            .detach_practitioner(clinic_id, practitioner_id)
            .await
        {
            Ok(result) => {
                info!(
                    "Detached practitioner {} from {} bookings at clinic {}",
                    practitioner_id, result.detached_count, clinic_id
                );
                Some(result.detached_count)
            }
            Err(e) => {
                warn!(
                    "Booking detach failed for practitioner {} at clinic {}: {}",
                    practitioner_id, clinic_id, e
                );
                None
            }
        };

        if let Err(e) = self
            .directory
            .notify_affiliation(practitioner_id, clinic_id, false)
            .await
        {
            warn!(
                "Directory removal notification failed for practitioner {}: {}",
                practitioner_id, e
            );
        }

        Ok(RemovalOutcome {
            affiliation,
            detached_bookings,
        })
    }
}
