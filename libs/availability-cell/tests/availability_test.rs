// Availability store tests against a mocked record store.

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use availability_cell::models::{AvailabilityError, ConflictScope, SlotDay, SlotInput, WriteMode};
use availability_cell::services::availability::AvailabilityService;
use shared_utils::test_utils::TestConfig;

fn slot_input(day: &str, start: &str, end: &str) -> SlotInput {
    SlotInput {
        day: day.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
    }
}

fn slot_json(day: &str, start: &str, end: &str) -> Value {
    json!({
        "day": day,
        "start_time": start,
        "end_time": end,
        "is_active": true,
    })
}

fn affiliation_row(practitioner_id: Uuid, clinic_id: Uuid) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "practitioner_id": practitioner_id,
        "clinic_id": clinic_id,
        "role_in_clinic": "consultant",
        "status": "active",
        "standard_fee": 150.0,
        "specializations_at_clinic": ["dermatology"],
        "secondary_login": null,
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339(),
        "removed_at": null,
    })
}

fn document_row(practitioner_id: Uuid, clinic_id: Uuid, slots: Vec<Value>) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "practitioner_id": practitioner_id,
        "clinic_id": clinic_id,
        "slots": slots,
        "archived_at": null,
        "created_at": Utc::now().to_rfc3339(),
        "updated_at": Utc::now().to_rfc3339(),
    })
}

async fn service_for(mock_server: &MockServer) -> AvailabilityService {
    AvailabilityService::new(TestConfig::with_base_url(&mock_server.uri()).to_state())
}

async fn mock_affiliation_active(mock_server: &MockServer, practitioner: Uuid, clinic: Uuid) {
    Mock::given(method("GET"))
        .and(path("/rest/v1/affiliations"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([affiliation_row(practitioner, clinic)])),
        )
        .mount(mock_server)
        .await;
}

async fn mock_no_writes(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn write_without_active_affiliation_is_forbidden() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/affiliations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    // Must never create the affiliation or write a document.
    Mock::given(method("POST"))
        .and(path("/rest/v1/affiliations"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;
    mock_no_writes(&mock_server).await;

    let service = service_for(&mock_server).await;
    let err = service
        .add_or_replace_availability(
            practitioner,
            clinic,
            &[slot_input("Monday", "09:00", "12:00")],
            WriteMode::Replace,
        )
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::Forbidden(_));
}

#[tokio::test]
async fn overlapping_slot_at_another_clinic_is_rejected_with_report() {
    // Scenario: Mon 09:00-12:00 exists at clinic A; Mon 11:00-13:00 at
    // clinic B must be rejected citing clinic A's slot.
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic_a = Uuid::new_v4();
    let clinic_b = Uuid::new_v4();

    mock_affiliation_active(&mock_server, practitioner, clinic_b).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic_a,
            vec![slot_json("Monday", "09:00", "12:00")],
        )])))
        .mount(&mock_server)
        .await;
    mock_no_writes(&mock_server).await;

    let service = service_for(&mock_server).await;
    let err = service
        .add_or_replace_availability(
            practitioner,
            clinic_b,
            &[slot_input("Monday", "11:00", "13:00")],
            WriteMode::Replace,
        )
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::Conflict(report) => {
        assert_eq!(report.day, SlotDay::Monday);
        assert_eq!(report.scope, ConflictScope::OtherClinic);
        assert_eq!(report.clinic_id, Some(clinic_a));
        assert_eq!(report.existing.to_string(), "09:00-12:00");
        assert_eq!(report.candidate.to_string(), "11:00-13:00");
    });
}

#[tokio::test]
async fn touching_slot_at_another_clinic_is_accepted() {
    // Scenario: Mon 09:00-12:00 at clinic A; Mon 12:00-14:00 at clinic B
    // touches the boundary and must be committed.
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic_a = Uuid::new_v4();
    let clinic_b = Uuid::new_v4();

    mock_affiliation_active(&mock_server, practitioner, clinic_b).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic_a,
            vec![slot_json("Monday", "09:00", "12:00")],
        )])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([document_row(
            practitioner,
            clinic_b,
            vec![slot_json("Monday", "12:00", "14:00")],
        )])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    let document = service
        .add_or_replace_availability(
            practitioner,
            clinic_b,
            &[slot_input("Monday", "12:00", "14:00")],
            WriteMode::Replace,
        )
        .await
        .unwrap();

    assert_eq!(document.clinic_id, clinic_b);
    assert_eq!(document.slots.len(), 1);
}

#[tokio::test]
async fn internal_overlap_in_replacement_list_is_rejected_before_any_write() {
    // Scenario: new list with Tue 09:00-10:00 and Tue 09:30-10:30 must
    // fail in validation; the stored document stays untouched.
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    mock_affiliation_active(&mock_server, practitioner, clinic).await;
    mock_no_writes(&mock_server).await;

    let service = service_for(&mock_server).await;
    let err = service
        .add_or_replace_availability(
            practitioner,
            clinic,
            &[
                slot_input("Tuesday", "09:00", "10:00"),
                slot_input("Tuesday", "09:30", "10:30"),
            ],
            WriteMode::Replace,
        )
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::Conflict(report) => {
        assert_eq!(report.day, SlotDay::Tuesday);
        assert_eq!(report.scope, ConflictScope::SameClinic);
    });
}

#[tokio::test]
async fn replace_overwrites_instead_of_appending() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    let stored = document_row(
        practitioner,
        clinic,
        vec![
            slot_json("Monday", "09:00", "12:00"),
            slot_json("Thursday", "14:00", "17:00"),
        ],
    );

    mock_affiliation_active(&mock_server, practitioner, clinic).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored])))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([stored])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    // Resubmitting the unchanged list must not duplicate slots.
    let document = service
        .add_or_replace_availability(
            practitioner,
            clinic,
            &[
                slot_input("Monday", "09:00", "12:00"),
                slot_input("Thursday", "14:00", "17:00"),
            ],
            WriteMode::Replace,
        )
        .await
        .unwrap();

    assert_eq!(document.slots.len(), 2);

    // The committed payload carries exactly the submitted list.
    let requests = mock_server.received_requests().await.unwrap();
    let patch = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .expect("expected a PATCH commit");
    let body: Value = serde_json::from_slice(&patch.body).unwrap();
    assert_eq!(body["slots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn append_conflicting_with_own_stored_slots_is_rejected() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    mock_affiliation_active(&mock_server, practitioner, clinic).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic,
            vec![slot_json("Friday", "08:00", "12:00")],
        )])))
        .mount(&mock_server)
        .await;
    mock_no_writes(&mock_server).await;

    let service = service_for(&mock_server).await;
    let err = service
        .add_or_replace_availability(
            practitioner,
            clinic,
            &[slot_input("Friday", "11:00", "13:00")],
            WriteMode::Append,
        )
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::Conflict(report) => {
        assert_eq!(report.scope, ConflictScope::SameClinic);
        assert_eq!(report.clinic_id, Some(clinic));
    });
}

#[tokio::test]
async fn append_merges_with_stored_slots_in_one_write() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    mock_affiliation_active(&mock_server, practitioner, clinic).await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic,
            vec![slot_json("Friday", "08:00", "12:00")],
        )])))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic,
            vec![
                slot_json("Friday", "08:00", "12:00"),
                slot_json("Friday", "13:00", "16:00"),
            ],
        )])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    let document = service
        .add_or_replace_availability(
            practitioner,
            clinic,
            &[slot_input("Friday", "13:00", "16:00")],
            WriteMode::Append,
        )
        .await
        .unwrap();

    assert_eq!(document.slots.len(), 2);

    let requests = mock_server.received_requests().await.unwrap();
    let patch = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .expect("expected a PATCH commit");
    let body: Value = serde_json::from_slice(&patch.body).unwrap();
    assert_eq!(body["slots"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn malformed_candidate_fails_validation_without_touching_the_store() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    mock_affiliation_active(&mock_server, practitioner, clinic).await;
    mock_no_writes(&mock_server).await;

    let service = service_for(&mock_server).await;
    let err = service
        .add_or_replace_availability(
            practitioner,
            clinic,
            &[slot_input("Monday", "noon", "13:00")],
            WriteMode::Replace,
        )
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::Validation(_));
}

#[tokio::test]
async fn read_by_practitioner_normalizes_and_groups_documents() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    // Slots deliberately out of order.
    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic,
            vec![
                slot_json("Friday", "13:00", "16:00"),
                slot_json("Monday", "09:00", "12:00"),
                slot_json("Monday", "07:30", "08:30"),
            ],
        )])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    let documents = service.read_by_practitioner(practitioner).await.unwrap();

    assert_eq!(documents.len(), 1);
    let slots = &documents[0].slots;
    assert_eq!(slots[0].day, SlotDay::Monday);
    assert_eq!(slots[0].start_time.format("%H:%M").to_string(), "07:30");
    assert_eq!(slots[1].start_time.format("%H:%M").to_string(), "09:00");
    assert_eq!(slots[2].day, SlotDay::Friday);
}

#[tokio::test]
async fn read_pair_not_found_when_document_absent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    let err = service
        .read_pair(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();

    assert_matches!(err, AvailabilityError::NotFound(_));
}

#[tokio::test]
async fn archive_deactivates_slots_and_stamps_document() {
    let mock_server = MockServer::start().await;
    let practitioner = Uuid::new_v4();
    let clinic = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([document_row(
            practitioner,
            clinic,
            vec![slot_json("Monday", "09:00", "12:00")],
        )])))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    service
        .archive_availability(practitioner, clinic)
        .await
        .unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let patch = requests
        .iter()
        .find(|r| r.method.as_str() == "PATCH")
        .expect("expected an archive PATCH");
    let body: Value = serde_json::from_slice(&patch.body).unwrap();
    assert!(body["archived_at"].is_string());
    assert_eq!(body["slots"][0]["is_active"], false);
}

#[tokio::test]
async fn archive_is_idempotent_when_no_document_exists() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/rest/v1/availability_documents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = service_for(&mock_server).await;
    service
        .archive_availability(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();
}
