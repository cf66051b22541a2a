//! Per-screen state fed by background fetches
//!
//! Each view owns the key of its current fetch cycle and routes incoming
//! messages to its models. Messages with any other key are stale and are
//! dropped without touching state.

use super::catalog::CatalogState;
use super::composer::Composer;
use super::dealer::DealerProfile;
use super::directory::DealerDirectory;
use super::fetch::{FetchKey, FetchMessage, FetchRequest, FetchStatus};
use super::review::ReviewList;
use super::route::Route;
use tracing::debug;

fn is_current(key: FetchKey, msg: &FetchMessage) -> bool {
    if msg.key == key {
        return true;
    }
    debug!(
        request = msg.request.name(),
        stale = msg.key.generation,
        current = key.generation,
        "dropping stale response"
    );
    false
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dealer Detail
// ═══════════════════════════════════════════════════════════════════════════════

/// Dealer profile and reviews for one dealer id
#[derive(Debug, Clone)]
pub struct DealerView {
    key: FetchKey,
    dealer_id: u64,
    pub profile: DealerProfile,
    pub reviews: ReviewList,
    pub profile_status: FetchStatus,
    pub reviews_status: FetchStatus,
}

impl DealerView {
    /// Fresh, empty view; the caller issues `requests()` under `key`
    pub fn new(key: FetchKey, dealer_id: u64) -> Self {
        Self {
            key,
            dealer_id,
            profile: DealerProfile::Unloaded,
            reviews: ReviewList::Pending,
            profile_status: FetchStatus::InFlight,
            reviews_status: FetchStatus::InFlight,
        }
    }

    pub fn key(&self) -> FetchKey {
        self.key
    }

    pub fn dealer_id(&self) -> u64 {
        self.dealer_id
    }

    /// The two independent fetches this view needs
    pub fn requests(&self) -> Vec<FetchRequest> {
        vec![
            FetchRequest::Dealer(self.dealer_id),
            FetchRequest::Reviews(self.dealer_id),
        ]
    }

    /// Requests for fetches that failed, marking them in flight again
    pub fn retry(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        if self.profile_status.is_failed() {
            self.profile_status = FetchStatus::InFlight;
            requests.push(FetchRequest::Dealer(self.dealer_id));
        }
        if self.reviews_status.is_failed() {
            self.reviews_status = FetchStatus::InFlight;
            requests.push(FetchRequest::Reviews(self.dealer_id));
        }
        requests
    }

    /// Route a completed fetch to its model; returns whether it was current
    pub fn apply(&mut self, msg: &FetchMessage) -> bool {
        if !is_current(self.key, msg) {
            return false;
        }

        match &msg.request {
            FetchRequest::Dealer(_) => {
                let accepted = self.profile.receive(&msg.payload);
                self.profile_status = FetchStatus::settle(accepted, &msg.payload);
            }
            FetchRequest::Reviews(_) => {
                let accepted = self.reviews.receive(&msg.payload);
                self.reviews_status = FetchStatus::settle(accepted, &msg.payload);
            }
            other => debug!(request = other.name(), "dealer view ignores request kind"),
        }
        true
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Review Composer
// ═══════════════════════════════════════════════════════════════════════════════

/// Everything the review form needs for one dealer
#[derive(Debug, Clone)]
pub struct ComposerView {
    key: FetchKey,
    pub profile: DealerProfile,
    pub profile_status: FetchStatus,
    pub catalog: CatalogState,
    pub catalog_status: FetchStatus,
    pub composer: Composer,
}

impl ComposerView {
    pub fn new(key: FetchKey, dealer_id: u64) -> Self {
        Self {
            key,
            profile: DealerProfile::Unloaded,
            profile_status: FetchStatus::InFlight,
            catalog: CatalogState::Pending,
            catalog_status: FetchStatus::InFlight,
            composer: Composer::new(dealer_id),
        }
    }

    pub fn key(&self) -> FetchKey {
        self.key
    }

    pub fn dealer_id(&self) -> u64 {
        self.composer.dealer_id()
    }

    /// Dealer heading and vehicle catalog, fetched independently
    pub fn requests(&self) -> Vec<FetchRequest> {
        vec![FetchRequest::Dealer(self.dealer_id()), FetchRequest::Cars]
    }

    /// Requests for fetches that failed, marking them in flight again
    pub fn retry(&mut self) -> Vec<FetchRequest> {
        let mut requests = Vec::new();
        if self.profile_status.is_failed() {
            self.profile_status = FetchStatus::InFlight;
            requests.push(FetchRequest::Dealer(self.dealer_id()));
        }
        if self.catalog_status.is_failed() {
            self.catalog_status = FetchStatus::InFlight;
            requests.push(FetchRequest::Cars);
        }
        requests
    }

    /// Route a completed fetch; returns a navigation command when a
    /// submitted review was accepted
    pub fn apply(&mut self, msg: &FetchMessage) -> Option<Route> {
        if !is_current(self.key, msg) {
            return None;
        }

        match &msg.request {
            FetchRequest::Dealer(_) => {
                let accepted = self.profile.receive(&msg.payload);
                self.profile_status = FetchStatus::settle(accepted, &msg.payload);
                None
            }
            FetchRequest::Cars => {
                let accepted = self.catalog.receive(&msg.payload);
                self.catalog_status = FetchStatus::settle(accepted, &msg.payload);
                None
            }
            FetchRequest::AddReview(_) => self.composer.on_response(&msg.payload),
            other => {
                debug!(request = other.name(), "composer view ignores request kind");
                None
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Dealer Directory
// ═══════════════════════════════════════════════════════════════════════════════

/// Dealer listing, optionally filtered by state
#[derive(Debug, Clone)]
pub struct DirectoryView {
    key: FetchKey,
    filter: Option<String>,
    pub directory: DealerDirectory,
    pub status: FetchStatus,
    /// States offered by the filter dialog, from the last unfiltered listing
    pub known_states: Vec<String>,
}

impl DirectoryView {
    pub fn new(key: FetchKey, filter: Option<String>) -> Self {
        Self {
            key,
            filter,
            directory: DealerDirectory::Pending,
            status: FetchStatus::InFlight,
            known_states: Vec::new(),
        }
    }

    pub fn key(&self) -> FetchKey {
        self.key
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn request(&self) -> FetchRequest {
        FetchRequest::Dealers {
            state: self.filter.clone(),
        }
    }

    /// Restart the listing under a new key and filter
    ///
    /// Known states survive so the filter dialog stays populated.
    pub fn refilter(&mut self, key: FetchKey, filter: Option<String>) {
        let known_states = std::mem::take(&mut self.known_states);
        *self = DirectoryView::new(key, filter);
        self.known_states = known_states;
    }

    pub fn retry(&mut self) -> Option<FetchRequest> {
        if self.status.is_failed() {
            self.status = FetchStatus::InFlight;
            Some(self.request())
        } else {
            None
        }
    }

    pub fn apply(&mut self, msg: &FetchMessage) -> bool {
        if !is_current(self.key, msg) {
            return false;
        }

        if let FetchRequest::Dealers { .. } = msg.request {
            let accepted = self.directory.receive(&msg.payload);
            self.status = FetchStatus::settle(accepted, &msg.payload);
            if accepted && self.filter.is_none() {
                self.known_states = self.directory.states();
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::session::{tests::MemorySession, SessionGate};
    use crate::model::draft::ReviewDraft;
    use serde_json::json;

    fn key(generation: u64, dealer_id: u64) -> FetchKey {
        FetchKey {
            generation,
            dealer_id: Some(dealer_id),
        }
    }

    fn message(key: FetchKey, request: FetchRequest, body: serde_json::Value) -> FetchMessage {
        FetchMessage {
            key,
            request,
            payload: Ok(body),
        }
    }

    #[test]
    fn test_dealer_with_no_reviews() {
        let k = key(1, 42);
        let mut view = DealerView::new(k, 42);
        assert_eq!(
            view.requests(),
            vec![FetchRequest::Dealer(42), FetchRequest::Reviews(42)]
        );

        // Reviews arrive first; order does not matter
        view.apply(&message(k, FetchRequest::Reviews(42), json!({"status": 200, "reviews": []})));
        view.apply(&message(
            k,
            FetchRequest::Dealer(42),
            json!({"status": 200, "dealer": {"id": 42, "full_name": "Joe's Motors", "city": "Springfield"}}),
        ));

        assert!(view.profile.is_loaded());
        assert_eq!(view.reviews, ReviewList::Empty);
        assert_eq!(view.reviews_status, FetchStatus::Succeeded);
    }

    #[test]
    fn test_one_failure_does_not_block_the_other() {
        let k = key(1, 5);
        let mut view = DealerView::new(k, 5);

        view.apply(&FetchMessage {
            key: k,
            request: FetchRequest::Dealer(5),
            payload: Err(ApiError::Transport("connection refused".into())),
        });
        view.apply(&message(
            k,
            FetchRequest::Reviews(5),
            json!({"status": 200, "reviews": [{"id": 1, "name": "A", "review": "ok", "sentiment": "positive"}]}),
        ));

        assert!(!view.profile.is_loaded());
        assert!(view.profile_status.is_failed());
        assert_eq!(view.reviews.reviews().len(), 1);

        assert_eq!(view.retry(), vec![FetchRequest::Dealer(5)]);
        assert_eq!(view.profile_status, FetchStatus::InFlight);
        assert!(view.retry().is_empty());
    }

    #[test]
    fn test_stale_response_after_identifier_change() {
        let old = key(1, 1);
        let first = DealerView::new(old, 1);
        assert_eq!(first.requests()[0], FetchRequest::Dealer(1));

        // Identifier changes to 2 before anything for 1 arrived
        let mut view = DealerView::new(key(2, 2), 2);

        let late = message(
            old,
            FetchRequest::Dealer(1),
            json!({"status": 200, "dealer": {"id": 1, "full_name": "Old Dealer"}}),
        );
        assert!(!view.apply(&late));
        let late = message(
            old,
            FetchRequest::Reviews(1),
            json!({"status": 200, "reviews": []}),
        );
        assert!(!view.apply(&late));

        assert!(!view.profile.is_loaded());
        assert!(view.reviews.is_pending());
        assert_eq!(view.dealer_id(), 2);
    }

    #[test]
    fn test_same_dealer_revisit_drops_previous_cycle() {
        let first = key(1, 9);
        let second = key(3, 9);
        let mut view = DealerView::new(second, 9);
        let late = message(first, FetchRequest::Reviews(9), json!({"status": 200, "reviews": []}));
        assert!(!view.apply(&late));
        assert!(view.reviews.is_pending());
    }

    #[test]
    fn test_composer_submission_redirects() {
        let k = key(4, 7);
        let mut view = ComposerView::new(k, 7);
        view.composer.draft = ReviewDraft {
            review: "Great!".into(),
            purchase_date: "2024-01-01".into(),
            selection: "Honda Civic".into(),
            year: "2020".into(),
        };
        let session = SessionGate::new(MemorySession::with(&[("username", "jdoe")]));

        let payload = view.composer.submit(&session).unwrap();
        let route = view.apply(&message(
            k,
            FetchRequest::AddReview(payload),
            json!({"status": 200}),
        ));
        assert_eq!(route, Some(Route::Dealer(7)));
    }

    #[test]
    fn test_composer_catalog_failure_is_retryable() {
        let k = key(5, 7);
        let mut view = ComposerView::new(k, 7);
        view.apply(&message(k, FetchRequest::Cars, json!({"status": 500, "message": "db down"})));

        assert_eq!(view.catalog, CatalogState::Pending);
        assert_eq!(view.catalog_status.failure(), Some("db down"));
        assert_eq!(view.retry(), vec![FetchRequest::Cars]);
    }

    #[test]
    fn test_composer_dealer_failure_is_retryable() {
        let k = key(6, 7);
        let mut view = ComposerView::new(k, 7);
        view.apply(&message(k, FetchRequest::Dealer(7), json!({"status": 404, "message": "no such dealer"})));
        view.apply(&message(k, FetchRequest::Cars, json!({"status": 500})));

        assert!(!view.profile.is_loaded());
        assert_eq!(view.profile_status.failure(), Some("no such dealer"));
        assert_eq!(view.retry(), vec![FetchRequest::Dealer(7), FetchRequest::Cars]);
        assert!(view.retry().is_empty());

        view.apply(&message(
            k,
            FetchRequest::Dealer(7),
            json!({"status": 200, "dealer": [{"id": 7, "full_name": "Joe's Motors"}]}),
        ));
        assert!(view.profile.is_loaded());
        assert!(!view.profile_status.is_failed());
    }

    #[test]
    fn test_directory_filter_keeps_known_states() {
        let k = FetchKey { generation: 1, dealer_id: None };
        let mut view = DirectoryView::new(k, None);
        view.apply(&message(
            k,
            FetchRequest::Dealers { state: None },
            json!({"status": 200, "dealers": [
                {"id": 1, "full_name": "A", "state": "Texas"},
                {"id": 2, "full_name": "B", "state": "Kansas"}
            ]}),
        ));
        assert_eq!(view.known_states, vec!["Kansas", "Texas"]);

        let k2 = FetchKey { generation: 2, dealer_id: None };
        view.refilter(k2, Some("Kansas".into()));
        assert_eq!(view.directory, DealerDirectory::Pending);
        assert_eq!(view.known_states, vec!["Kansas", "Texas"]);
        assert_eq!(
            view.request(),
            FetchRequest::Dealers { state: Some("Kansas".into()) }
        );

        // The unfiltered listing arriving late must not overwrite the filter
        let late = message(
            k,
            FetchRequest::Dealers { state: None },
            json!({"status": 200, "dealers": [{"id": 1, "full_name": "A", "state": "Texas"}]}),
        );
        assert!(!view.apply(&late));
        assert_eq!(view.directory, DealerDirectory::Pending);
    }
}
