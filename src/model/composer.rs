//! Review composer state machine
//!
//! `Editing -> Submitting -> (Redirected | Editing with error)`.
//! Navigation on success is returned to the caller as a `Route` instead of
//! being performed here.

use super::draft::{DraftError, ReviewDraft, ReviewPayload};
use super::payload::{is_success, message_of, Payload};
use super::route::Route;
use super::session::SessionGate;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComposerState {
    Editing { error: Option<String> },
    Submitting,
    Redirected(u64),
}

impl Default for ComposerState {
    fn default() -> Self {
        ComposerState::Editing { error: None }
    }
}

/// Draft plus submission state for one dealer
#[derive(Debug, Clone)]
pub struct Composer {
    dealer_id: u64,
    pub draft: ReviewDraft,
    state: ComposerState,
}

impl Composer {
    pub fn new(dealer_id: u64) -> Self {
        Self {
            dealer_id,
            draft: ReviewDraft::default(),
            state: ComposerState::default(),
        }
    }

    pub fn dealer_id(&self) -> u64 {
        self.dealer_id
    }

    pub fn state(&self) -> &ComposerState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, ComposerState::Editing { .. })
    }

    /// Message to show under the form, if any
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ComposerState::Editing { error } => error.as_deref(),
            _ => None,
        }
    }

    /// Try to start a submission
    ///
    /// On success the composer is `Submitting` and the caller must send the
    /// returned payload. On failure no request should be made; the composer
    /// stays `Editing` with the reason as its error.
    pub fn submit(&mut self, session: &SessionGate) -> Result<ReviewPayload, DraftError> {
        if !self.is_editing() {
            return Err(DraftError::AlreadySubmitting);
        }

        let result = self.prepare(session);
        match &result {
            Ok(_) => {
                info!(dealer_id = self.dealer_id, "submitting review");
                self.state = ComposerState::Submitting;
            }
            Err(e) => {
                self.state = ComposerState::Editing {
                    error: Some(e.to_string()),
                };
            }
        }
        result
    }

    fn prepare(&self, session: &SessionGate) -> Result<ReviewPayload, DraftError> {
        if !self.draft.is_complete() {
            return Err(DraftError::Incomplete);
        }
        // Identity is looked up now, not when the form was opened
        if !session.is_authenticated() {
            return Err(DraftError::NotAuthenticated);
        }
        let author = session.display_name().ok_or(DraftError::NotAuthenticated)?;
        self.draft.to_payload(self.dealer_id, &author)
    }

    /// Apply the `add_review` response
    ///
    /// Returns the route to navigate to when the review was accepted. The
    /// draft is never touched here.
    pub fn on_response(&mut self, payload: &Payload) -> Option<Route> {
        if self.state != ComposerState::Submitting {
            return None;
        }

        if is_success(payload) {
            info!(dealer_id = self.dealer_id, "review accepted");
            self.state = ComposerState::Redirected(self.dealer_id);
            return Some(Route::Dealer(self.dealer_id));
        }

        let reason = match payload {
            Err(e) => e.to_string(),
            Ok(_) => message_of(payload).unwrap_or_else(|| "unknown error".to_string()),
        };
        warn!(dealer_id = self.dealer_id, %reason, "review rejected");
        self.state = ComposerState::Editing {
            error: Some(format!("Review submission failed: {}", reason)),
        };
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::session::tests::MemorySession;
    use serde_json::json;

    fn signed_in() -> SessionGate {
        SessionGate::new(MemorySession::with(&[("username", "jdoe")]))
    }

    fn filled(dealer_id: u64) -> Composer {
        let mut composer = Composer::new(dealer_id);
        composer.draft = ReviewDraft {
            review: "Great!".into(),
            purchase_date: "2024-01-01".into(),
            selection: "Honda Civic".into(),
            year: "2020".into(),
        };
        composer
    }

    #[test]
    fn test_incomplete_draft_stays_editing() {
        let session = signed_in();
        for field in crate::model::draft::DraftField::all() {
            let mut composer = filled(7);
            composer.draft.field_mut(field).clear();

            assert_eq!(composer.submit(&session), Err(DraftError::Incomplete));
            assert!(composer.is_editing());
            assert_eq!(composer.error(), Some("All details are mandatory"));
        }
    }

    #[test]
    fn test_success_redirects_to_dealer() {
        let session = signed_in();
        let mut composer = filled(7);

        let payload = composer.submit(&session).unwrap();
        assert_eq!(payload.name, "jdoe");
        assert_eq!(payload.dealership, 7);
        assert_eq!(composer.state(), &ComposerState::Submitting);

        let route = composer.on_response(&Ok(json!({"status": 200, "message": "Review submitted successfully."})));
        assert_eq!(route, Some(Route::Dealer(7)));
        assert_eq!(composer.state(), &ComposerState::Redirected(7));
    }

    #[test]
    fn test_failure_keeps_draft() {
        let session = signed_in();
        let mut composer = filled(7);
        let before = composer.draft.clone();

        composer.submit(&session).unwrap();
        let route = composer.on_response(&Ok(json!({
            "status": 500,
            "message": "Failed to submit review to external API."
        })));

        assert_eq!(route, None);
        assert_eq!(
            composer.error(),
            Some("Review submission failed: Failed to submit review to external API.")
        );
        assert_eq!(composer.draft, before);

        // Can resubmit without re-entering anything
        assert!(composer.submit(&session).is_ok());
    }

    #[test]
    fn test_transport_failure_keeps_draft() {
        let session = signed_in();
        let mut composer = filled(3);
        composer.submit(&session).unwrap();

        assert_eq!(composer.on_response(&Err(ApiError::Timeout)), None);
        assert_eq!(
            composer.error(),
            Some("Review submission failed: request timed out")
        );
        assert_eq!(composer.draft.selection, "Honda Civic");
    }

    #[test]
    fn test_double_submit_is_refused() {
        let session = signed_in();
        let mut composer = filled(7);
        composer.submit(&session).unwrap();
        assert_eq!(composer.submit(&session), Err(DraftError::AlreadySubmitting));
        assert_eq!(composer.state(), &ComposerState::Submitting);
    }

    #[test]
    fn test_make_without_model_is_not_sent() {
        let session = signed_in();
        let mut composer = filled(7);
        composer.draft.selection = "Tesla ".into();

        assert_eq!(composer.submit(&session), Err(DraftError::Incomplete));
        assert!(composer.is_editing());
        assert_eq!(composer.error(), Some("All details are mandatory"));
    }

    #[test]
    fn test_anonymous_cannot_submit() {
        let session = SessionGate::new(MemorySession::with(&[]));
        let mut composer = filled(7);
        assert_eq!(composer.submit(&session), Err(DraftError::NotAuthenticated));
        assert!(composer.is_editing());
    }

    #[test]
    fn test_author_resolved_at_submit_time() {
        let store = MemorySession::with(&[("username", "jdoe")]);
        let session = SessionGate::new(store.clone());
        let mut composer = filled(7);

        store.set("firstname", "Jane");
        store.set("lastname", "Doe");

        let payload = composer.submit(&session).unwrap();
        assert_eq!(payload.name, "Jane Doe");
    }

    #[test]
    fn test_response_without_submission_is_ignored() {
        let mut composer = filled(7);
        assert_eq!(composer.on_response(&Ok(json!({"status": 200}))), None);
        assert!(composer.is_editing());
    }
}
