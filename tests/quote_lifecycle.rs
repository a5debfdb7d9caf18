//! End-to-end lifecycle of the quote wizard: persistence, step gating,
//! and the submission path against a simulated form backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use renoquote::api::error::{ApiError, GENERIC_NETWORK};
use renoquote::api::submit::{
    PayloadField, SubmissionClient, SubmissionTransport, TransportResponse,
};
use renoquote::config::Config;
use renoquote::draft::{QuoteDraft, ServiceTag};
use renoquote::wizard::{QuoteWizard, Step, SubmitOutcome, BLOCKED_MESSAGE};

/// Transport that records every post and answers with a canned response
struct MockTransport {
    calls: AtomicUsize,
    seen_fields: Mutex<Vec<PayloadField>>,
    response: Result<TransportResponse, ApiError>,
}

impl MockTransport {
    fn responding(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            seen_fields: Mutex::new(Vec::new()),
            response: Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
        })
    }

    fn failing(error: ApiError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            seen_fields: Mutex::new(Vec::new()),
            response: Err(error),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubmissionTransport for MockTransport {
    async fn post(
        &self,
        _endpoint: &str,
        fields: Vec<PayloadField>,
    ) -> Result<TransportResponse, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.seen_fields.lock().unwrap() = fields;
        self.response.clone()
    }
}

fn test_config(dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.storage.dir = dir.path().to_string_lossy().to_string();
    config.form.endpoint = "http://localhost/never-reached".to_string();
    config
}

/// A draft that satisfies all three step predicates
fn fill_complete(machine: &mut QuoteWizard) {
    machine.update(|d| {
        d.title = "Kitchen remodel".to_string();
        d.services = vec![ServiceTag::Kitchen];
        d.description = "New cabinets, countertops and sink relocation".to_string();
        d.address = "Rua das Flores 12".to_string();
        d.city = "Porto".to_string();
        d.postal_code = "4000-123".to_string();
        d.name = "Ana Martins".to_string();
        d.email = "ana@example.com".to_string();
        d.phone = "+351 912 345 678".to_string();
        d.consent = true;
    });
}

#[test]
fn draft_round_trips_through_the_storage_slot() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);

    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));
    fill_complete(&mut machine);

    let first = std::fs::read(config.draft_path()).unwrap();

    // Restore and re-persist without touching anything
    let restored = QuoteDraft::load(&config);
    assert_eq!(restored.title, "Kitchen remodel");
    restored.save().unwrap();

    let second = std::fs::read(config.draft_path()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn step_gating_blocks_and_allows_navigation() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);
    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));

    assert!(!machine.advance());
    assert_eq!(machine.step(), Step::Project);

    fill_complete(&mut machine);
    assert!(machine.advance());
    assert!(machine.advance());
    assert_eq!(machine.step(), Step::Contact);

    assert!(machine.retreat());
    assert_eq!(machine.step(), Step::Property);
}

#[tokio::test]
async fn successful_submission_resets_draft_and_storage() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);
    let transport = MockTransport::responding(200, r#"{"ok":true}"#);
    let client = SubmissionClient::with_transport(&config, transport.clone());

    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));
    fill_complete(&mut machine);
    machine.advance();
    machine.advance();
    assert!(config.draft_path().exists());

    machine.submit(&client).await;

    assert_eq!(transport.call_count(), 1);
    assert_eq!(machine.outcome(), Some(&SubmitOutcome::Success));
    assert_eq!(machine.step(), Step::Project);
    assert!(machine.draft().title.is_empty());
    assert!(!config.draft_path().exists());

    // The payload carried the mapped fields
    let fields = transport.seen_fields.lock().unwrap();
    assert!(fields.iter().any(|f| matches!(
        f,
        PayloadField::Text { name, value } if name == "projectTitle" && value == "Kitchen remodel"
    )));
    assert!(fields.iter().any(|f| matches!(
        f,
        PayloadField::Text { name, value } if name == "_replyto" && value == "ana@example.com"
    )));
}

#[tokio::test]
async fn structured_rejection_surfaces_its_reason_and_keeps_draft() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);
    let transport =
        MockTransport::responding(422, r#"{"errors":[{"message":"Invalid email"}]}"#);
    let client = SubmissionClient::with_transport(&config, transport.clone());

    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));
    fill_complete(&mut machine);

    machine.submit(&client).await;

    assert_eq!(transport.call_count(), 1);
    assert_eq!(
        machine.outcome(),
        Some(&SubmitOutcome::Failure("Invalid email".to_string()))
    );
    assert_eq!(machine.draft().name, "Ana Martins");
    assert!(config.draft_path().exists());
}

#[tokio::test]
async fn transport_failure_yields_generic_connectivity_message() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);
    let transport = MockTransport::failing(ApiError::network("connection refused"));
    let client = SubmissionClient::with_transport(&config, transport.clone());

    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));
    fill_complete(&mut machine);

    machine.submit(&client).await;

    assert_eq!(
        machine.outcome(),
        Some(&SubmitOutcome::Failure(GENERIC_NETWORK.to_string()))
    );
    assert_eq!(machine.draft().email, "ana@example.com");
}

#[tokio::test]
async fn populated_trap_field_never_reaches_the_network() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);
    let transport = MockTransport::responding(200, "");
    let client = SubmissionClient::with_transport(&config, transport.clone());

    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));
    fill_complete(&mut machine);
    machine.update(|d| d.company_trap = "https://spam.example".to_string());

    machine.submit(&client).await;

    assert_eq!(transport.call_count(), 0);
    assert_eq!(
        machine.outcome(),
        Some(&SubmitOutcome::Failure(BLOCKED_MESSAGE.to_string()))
    );
}

#[tokio::test]
async fn in_flight_submission_swallows_reentrant_attempts() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);
    let transport = MockTransport::responding(200, "");
    let client = SubmissionClient::with_transport(&config, transport.clone());

    let mut machine = QuoteWizard::new(QuoteDraft::load(&config));
    fill_complete(&mut machine);

    // First attempt acquires the in-flight guard
    assert!(machine.begin_submit());
    // A second attempt while unresolved performs no call and stays guarded
    assert!(!machine.begin_submit());
    assert_eq!(transport.call_count(), 0);

    // Resolve the first attempt the way the app does
    let result = client.send(machine.draft()).await;
    machine.finish_submit(result);

    assert_eq!(transport.call_count(), 1);
    assert_eq!(machine.outcome(), Some(&SubmitOutcome::Success));
}

#[test]
fn malformed_stored_draft_falls_back_to_defaults() {
    let dir = tempfile::TempDir::new().unwrap();
    let config = test_config(&dir);

    std::fs::create_dir_all(config.storage_dir()).unwrap();
    std::fs::write(config.draft_path(), "{not valid json").unwrap();

    let draft = QuoteDraft::load(&config);
    assert!(draft.title.is_empty());
    assert!(draft.services.is_empty());
}
