//! The quote intake state machine.
//!
//! Owns the draft, the active step, and the submission lifecycle. All
//! mutation goes through this type so that the draft is persisted after
//! every edit and forward navigation stays gated on the step
//! predicates. Rendering lives in `ui`; nothing here touches the
//! terminal.

use crate::api::submit::SubmissionClient;
use crate::api::ApiError;
use crate::draft::{QuoteDraft, ServiceTag};
use crate::validate;

/// Shown when a submission was accepted by the form backend
pub const SUCCESS_MESSAGE: &str =
    "Thank you! We received your request. Our team will be in touch shortly.";

/// Shown when the anti-automation trap rejects the submission locally
pub const BLOCKED_MESSAGE: &str = "Submission blocked.";

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Project,
    Property,
    Contact,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::Project => 1,
            Step::Property => 2,
            Step::Contact => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Project => "Project & Services",
            Step::Property => "Property & Scope",
            Step::Contact => "Contact & Send",
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::Project => Some(Step::Property),
            Step::Property => Some(Step::Contact),
            Step::Contact => None,
        }
    }

    fn prev(self) -> Option<Step> {
        match self {
            Step::Project => None,
            Step::Property => Some(Step::Project),
            Step::Contact => Some(Step::Property),
        }
    }
}

/// Result of the most recent submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Success,
    Failure(String),
}

pub struct QuoteWizard {
    draft: QuoteDraft,
    step: Step,
    submitting: bool,
    outcome: Option<SubmitOutcome>,
}

impl QuoteWizard {
    pub fn new(draft: QuoteDraft) -> Self {
        Self {
            draft,
            step: Step::Project,
            submitting: false,
            outcome: None,
        }
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn outcome(&self) -> Option<&SubmitOutcome> {
        self.outcome.as_ref()
    }

    pub fn clear_outcome(&mut self) {
        self.outcome = None;
    }

    /// Whether the current step's predicate allows moving forward.
    pub fn can_advance(&self) -> bool {
        validate::step_valid(&self.draft, self.step)
    }

    /// Apply one field edit and persist the draft.
    ///
    /// Persistence is fire-and-forget: a failed write is logged and the
    /// interaction continues with the in-memory draft.
    pub fn update(&mut self, edit: impl FnOnce(&mut QuoteDraft)) {
        edit(&mut self.draft);
        if let Err(e) = self.draft.save() {
            tracing::warn!(error = %e, "Failed to autosave draft");
        }
    }

    /// Toggle a service tag; applying the same tag twice restores the
    /// original selection.
    pub fn toggle_service(&mut self, tag: ServiceTag) {
        self.update(|draft| draft.toggle_service(tag));
    }

    /// Move forward one step. No-op while the current step is invalid
    /// or already on the last step.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        let Some(next) = self.step.next() else {
            return false;
        };
        tracing::debug!(from = self.step.number(), to = next.number(), "Step forward");
        self.step = next;
        self.outcome = None;
        true
    }

    /// Move back one step; never gated on validation.
    pub fn retreat(&mut self) -> bool {
        let Some(prev) = self.step.prev() else {
            return false;
        };
        self.step = prev;
        self.outcome = None;
        true
    }

    /// Gate a submission attempt.
    ///
    /// Returns true when the caller should perform the network call and
    /// report back via [`finish_submit`](Self::finish_submit). Returns
    /// false when the attempt was swallowed: the trap field is
    /// populated (recorded as a failure, no network contact), a
    /// submission is already in flight, or the contact step is invalid.
    pub fn begin_submit(&mut self) -> bool {
        if !self.draft.company_trap.trim().is_empty() {
            tracing::warn!("Trap field populated, rejecting as automated submission");
            self.outcome = Some(SubmitOutcome::Failure(BLOCKED_MESSAGE.to_string()));
            return false;
        }
        if self.submitting {
            return false;
        }
        if !validate::contact_step_valid(&self.draft) {
            return false;
        }

        self.outcome = None;
        self.submitting = true;
        true
    }

    /// Record the resolution of an in-flight submission.
    ///
    /// Success clears the draft and its persisted slot and returns to
    /// step 1; failure keeps the draft untouched so it can be resent.
    pub fn finish_submit(&mut self, result: Result<(), ApiError>) {
        self.submitting = false;
        match result {
            Ok(()) => {
                tracing::info!("Quote request accepted");
                if let Err(e) = self.draft.clear_persisted() {
                    tracing::warn!(error = %e, "Failed to remove persisted draft");
                }
                self.draft.reset();
                self.step = Step::Project;
                self.outcome = Some(SubmitOutcome::Success);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Quote request failed");
                self.outcome = Some(SubmitOutcome::Failure(e.user_message()));
            }
        }
    }

    /// Submit the draft: the one suspension point of the machine.
    pub async fn submit(&mut self, client: &SubmissionClient) {
        if !self.begin_submit() {
            return;
        }
        let result = client.send(&self.draft).await;
        self.finish_submit(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::PropertyType;
    use std::path::PathBuf;

    fn wizard_with(draft: QuoteDraft) -> QuoteWizard {
        QuoteWizard::new(draft)
    }

    fn draft_in(dir: &tempfile::TempDir) -> QuoteDraft {
        QuoteDraft::with_store_path(dir.path().join("draft.json"))
    }

    fn fill_project_step(draft: &mut QuoteDraft) {
        draft.title = "Kitchen remodel".to_string();
        draft.description = "Cabinets, countertops, plumbing".to_string();
        draft.services = vec![ServiceTag::Kitchen];
        draft.property_type = PropertyType::Apartment;
    }

    fn fill_contact_step(draft: &mut QuoteDraft) {
        draft.name = "Ana Martins".to_string();
        draft.email = "ana@example.com".to_string();
        draft.phone = "912345678".to_string();
        draft.consent = true;
    }

    #[test]
    fn test_advance_is_noop_when_step_invalid() {
        let mut wizard = wizard_with(QuoteDraft::default());

        assert!(!wizard.advance());
        assert_eq!(wizard.step(), Step::Project);
    }

    #[test]
    fn test_advance_moves_exactly_one_step_when_valid() {
        let mut draft = QuoteDraft::default();
        fill_project_step(&mut draft);
        let mut wizard = wizard_with(draft);

        assert!(wizard.advance());
        assert_eq!(wizard.step(), Step::Property);
    }

    #[test]
    fn test_retreat_never_requires_validation() {
        let mut draft = QuoteDraft::default();
        fill_project_step(&mut draft);
        let mut wizard = wizard_with(draft);
        wizard.advance();

        // Step 2 fields are all empty, going back still works
        assert!(wizard.retreat());
        assert_eq!(wizard.step(), Step::Project);
        assert!(!wizard.retreat());
    }

    #[test]
    fn test_update_persists_after_every_edit() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut wizard = wizard_with(draft_in(&dir));

        wizard.update(|d| d.title = "Attic conversion".to_string());

        let stored = std::fs::read_to_string(dir.path().join("draft.json")).unwrap();
        assert!(stored.contains("Attic conversion"));
    }

    #[test]
    fn test_toggle_service_twice_restores_selection() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut wizard = wizard_with(draft_in(&dir));

        wizard.toggle_service(ServiceTag::Painting);
        wizard.toggle_service(ServiceTag::Painting);
        assert!(wizard.draft().services.is_empty());
    }

    #[test]
    fn test_begin_submit_rejects_populated_trap_field() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut draft = draft_in(&dir);
        fill_contact_step(&mut draft);
        draft.company_trap = "Acme Inc".to_string();
        let mut wizard = wizard_with(draft);

        assert!(!wizard.begin_submit());
        assert!(!wizard.is_submitting());
        assert_eq!(
            wizard.outcome(),
            Some(&SubmitOutcome::Failure(BLOCKED_MESSAGE.to_string()))
        );
    }

    #[test]
    fn test_begin_submit_requires_valid_contact_step() {
        let mut wizard = wizard_with(QuoteDraft::default());

        assert!(!wizard.begin_submit());
        assert!(wizard.outcome().is_none());
    }

    #[test]
    fn test_begin_submit_is_not_reentrant() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut draft = draft_in(&dir);
        fill_contact_step(&mut draft);
        let mut wizard = wizard_with(draft);

        assert!(wizard.begin_submit());
        assert!(wizard.is_submitting());
        // Second attempt while in flight is swallowed
        assert!(!wizard.begin_submit());
    }

    #[test]
    fn test_finish_submit_success_resets_draft_and_slot() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut draft = draft_in(&dir);
        fill_project_step(&mut draft);
        fill_contact_step(&mut draft);
        draft.save().unwrap();
        let mut wizard = wizard_with(draft);
        wizard.advance();

        assert!(wizard.begin_submit());
        wizard.finish_submit(Ok(()));

        assert!(!wizard.is_submitting());
        assert_eq!(wizard.step(), Step::Project);
        assert_eq!(wizard.outcome(), Some(&SubmitOutcome::Success));
        assert!(wizard.draft().title.is_empty());
        assert!(!dir.path().join("draft.json").exists());
    }

    #[test]
    fn test_finish_submit_failure_preserves_draft() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut draft = draft_in(&dir);
        fill_contact_step(&mut draft);
        draft.save().unwrap();
        let mut wizard = wizard_with(draft);

        assert!(wizard.begin_submit());
        wizard.finish_submit(Err(ApiError::rejected(422, "Invalid email")));

        assert_eq!(
            wizard.outcome(),
            Some(&SubmitOutcome::Failure("Invalid email".to_string()))
        );
        assert_eq!(wizard.draft().name, "Ana Martins");
        assert!(dir.path().join("draft.json").exists());
    }

    #[test]
    fn test_advance_clears_transient_outcome() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut draft = draft_in(&dir);
        fill_project_step(&mut draft);
        let mut wizard = wizard_with(draft);
        wizard.finish_submit(Err(ApiError::network("unreachable")));
        assert!(wizard.outcome().is_some());

        wizard.advance();
        assert!(wizard.outcome().is_none());
    }

    #[test]
    fn test_step_numbers_and_order() {
        assert_eq!(Step::Project.number(), 1);
        assert_eq!(Step::Contact.number(), 3);
        assert_eq!(Step::Project.next(), Some(Step::Property));
        assert_eq!(Step::Contact.next(), None);
        assert_eq!(Step::Project.prev(), None);
    }

    #[test]
    fn test_with_store_path_keeps_drafts_isolated() {
        let dir = tempfile::TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("draft.json");
        let draft = QuoteDraft::with_store_path(path.clone());
        assert_eq!(draft.store_path(), path.as_path());
    }
}
