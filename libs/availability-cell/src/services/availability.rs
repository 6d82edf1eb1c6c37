use std::sync::Arc;

use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_database::store::{return_representation, StoreClient};
use shared_utils::state::AppState;

use crate::models::{
    AvailabilityDocument, AvailabilityError, ConflictScope, Slot, SlotInput, WriteMode,
};
use crate::services::conflict;

pub struct AvailabilityService {
    store: StoreClient,
    state: Arc<AppState>,
}

impl AvailabilityService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            store: StoreClient::new(&state.config),
            state,
        }
    }

    /// Write the weekly slots of one practitioner at one clinic.
    ///
    /// Validation runs fully before any mutation: syntactic checks,
    /// overlaps inside the batch, then overlaps against every other
    /// clinic's active slots for the same practitioner. The commit is a
    /// single document write, so a rejected request leaves the stored
    /// list untouched. The whole read-validate-commit sequence holds the
    /// practitioner's lock, so concurrent edits at two clinics cannot
    /// both slip past validation.
    pub async fn add_or_replace_availability(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
        inputs: &[SlotInput],
        mode: WriteMode,
    ) -> Result<AvailabilityDocument, AvailabilityError> {
        debug!(
            "Availability write for practitioner {} at clinic {} ({} candidate slots)",
            practitioner_id,
            clinic_id,
            inputs.len()
        );

        let _guard = self
            .state
            .practitioner_locks
            .acquire(practitioner_id)
            .await;

        self.ensure_active_affiliation(practitioner_id, clinic_id)
            .await?;

        let candidates = conflict::parse_slots(inputs)?;
        conflict::check_intra_batch(&candidates, clinic_id)?;

        let documents = self.load_practitioner_documents(practitioner_id).await?;
        let own = documents
            .iter()
            .find(|doc| doc.clinic_id == clinic_id)
            .cloned();

        // Appended slots must also clear the pair's already-stored slots;
        // a full replacement supersedes them.
        if mode == WriteMode::Append {
            if let Some(ref own_doc) = own {
                conflict::check_against_slots(
                    &candidates,
                    &own_doc.slots,
                    ConflictScope::SameClinic,
                    clinic_id,
                )?;
            }
        }

        conflict::check_cross_clinic(&candidates, &documents, clinic_id)?;

        let final_slots: Vec<Slot> = match (mode, &own) {
            (WriteMode::Append, Some(own_doc)) => {
                own_doc.slots.iter().copied().chain(candidates).collect()
            }
            _ => candidates,
        };

        match own {
            Some(own_doc) => self.update_document(own_doc.id, &final_slots).await,
            None => {
                self.insert_document(practitioner_id, clinic_id, &final_slots)
                    .await
            }
        }
    }

    /// All of a practitioner's live schedules across clinics, slots
    /// normalized (ordered by day, then start).
    pub async fn read_by_practitioner(
        &self,
        practitioner_id: Uuid,
    ) -> Result<Vec<AvailabilityDocument>, AvailabilityError> {
        let mut documents = self.load_practitioner_documents(practitioner_id).await?;
        for doc in &mut documents {
            normalize_slots(&mut doc.slots);
        }
        documents.sort_by_key(|doc| doc.clinic_id);
        Ok(documents)
    }

    /// Live schedules of every practitioner affiliated with a clinic.
    pub async fn read_by_clinic(
        &self,
        clinic_id: Uuid,
    ) -> Result<Vec<AvailabilityDocument>, AvailabilityError> {
        let path = format!(
            "/rest/v1/availability_documents?clinic_id=eq.{}&archived_at=is.null",
            clinic_id
        );
        let mut documents = self.fetch_documents(&path).await?;
        for doc in &mut documents {
            normalize_slots(&mut doc.slots);
        }
        documents.sort_by_key(|doc| doc.practitioner_id);
        Ok(documents)
    }

    pub async fn read_pair(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<AvailabilityDocument, AvailabilityError> {
        let path = format!(
            "/rest/v1/availability_documents?practitioner_id=eq.{}&clinic_id=eq.{}&archived_at=is.null",
            practitioner_id, clinic_id
        );
        let mut documents = self.fetch_documents(&path).await?;

        let mut document = documents.pop().ok_or_else(|| {
            AvailabilityError::NotFound(format!(
                "No availability document for practitioner {} at clinic {}",
                practitioner_id, clinic_id
            ))
        })?;
        normalize_slots(&mut document.slots);
        Ok(document)
    }

    /// Cascade entry point for affiliation removal: stamp the pair's
    /// document as archived and deactivate its slots so they stop
    /// participating in cross-clinic checks. Idempotent; a pair without
    /// a document is not an error.
    pub async fn archive_availability(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<(), AvailabilityError> {
        let _guard = self
            .state
            .practitioner_locks
            .acquire(practitioner_id)
            .await;

        let path = format!(
            "/rest/v1/availability_documents?practitioner_id=eq.{}&clinic_id=eq.{}&archived_at=is.null",
            practitioner_id, clinic_id
        );
        let documents = self.fetch_documents(&path).await?;

        let Some(document) = documents.into_iter().next() else {
            return Ok(());
        };

        debug!(
            "Archiving availability document {} for practitioner {} at clinic {}",
            document.id, practitioner_id, clinic_id
        );

        let deactivated: Vec<Slot> = document
            .slots
            .iter()
            .map(|slot| Slot {
                is_active: false,
                ..*slot
            })
            .collect();

        let update_path = format!("/rest/v1/availability_documents?id=eq.{}", document.id);
        let update = json!({
            "slots": deactivated,
            "archived_at": Utc::now().to_rfc3339(),
            "updated_at": Utc::now().to_rfc3339(),
        });

        let _: Vec<Value> = self
            .store
            .request_with_headers(
                Method::PATCH,
                &update_path,
                Some(update),
                Some(return_representation()),
            )
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        Ok(())
    }

    // Private helper methods

    async fn ensure_active_affiliation(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
    ) -> Result<(), AvailabilityError> {
        let path = format!(
            "/rest/v1/affiliations?practitioner_id=eq.{}&clinic_id=eq.{}&status=eq.active",
            practitioner_id, clinic_id
        );
        let result: Vec<Value> = self
            .store
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        if result.is_empty() {
            return Err(AvailabilityError::Forbidden(format!(
                "Practitioner {} has no active affiliation with clinic {}",
                practitioner_id, clinic_id
            )));
        }

        Ok(())
    }

    async fn load_practitioner_documents(
        &self,
        practitioner_id: Uuid,
    ) -> Result<Vec<AvailabilityDocument>, AvailabilityError> {
        let path = format!(
            "/rest/v1/availability_documents?practitioner_id=eq.{}&archived_at=is.null",
            practitioner_id
        );
        self.fetch_documents(&path).await
    }

    async fn fetch_documents(
        &self,
        path: &str,
    ) -> Result<Vec<AvailabilityDocument>, AvailabilityError> {
        let result: Vec<Value> = self
            .store
            .request(Method::GET, path, None)
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        result
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AvailabilityDocument>, _>>()
            .map_err(|e| AvailabilityError::Database(format!("Malformed availability rows: {}", e)))
    }

    async fn update_document(
        &self,
        document_id: Uuid,
        slots: &[Slot],
    ) -> Result<AvailabilityDocument, AvailabilityError> {
        let path = format!("/rest/v1/availability_documents?id=eq.{}", document_id);
        let update = json!({
            "slots": slots,
            "updated_at": Utc::now().to_rfc3339(),
        });

        let result: Vec<Value> = self
            .store
            .request_with_headers(Method::PATCH, &path, Some(update), Some(return_representation()))
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            AvailabilityError::Database("Store did not return the updated document".to_string())
        })?;

        serde_json::from_value(row)
            .map_err(|e| AvailabilityError::Database(format!("Malformed availability row: {}", e)))
    }

    async fn insert_document(
        &self,
        practitioner_id: Uuid,
        clinic_id: Uuid,
        slots: &[Slot],
    ) -> Result<AvailabilityDocument, AvailabilityError> {
        let now = Utc::now();
        let document = json!({
            "practitioner_id": practitioner_id,
            "clinic_id": clinic_id,
            "slots": slots,
            "archived_at": null,
            "created_at": now.to_rfc3339(),
            "updated_at": now.to_rfc3339(),
        });

        let result: Vec<Value> = self
            .store
            .request_with_headers(
                Method::POST,
                "/rest/v1/availability_documents",
                Some(document),
                Some(return_representation()),
            )
            .await
            .map_err(|e| AvailabilityError::Database(e.to_string()))?;

        let row = result.into_iter().next().ok_or_else(|| {
            AvailabilityError::Database("Store did not return the created document".to_string())
        })?;

        serde_json::from_value(row)
            .map_err(|e| AvailabilityError::Database(format!("Malformed availability row: {}", e)))
    }
}

fn normalize_slots(slots: &mut [Slot]) {
    slots.sort_by_key(|slot| (slot.day, slot.start_time));
}
