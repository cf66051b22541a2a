//! Background fetch service
//!
//! Every request runs on its own thread and reports back through a channel
//! that the UI drains on each tick. Requests issued together therefore run
//! concurrently and complete in any order; nothing here blocks the UI.

use super::api::{execute, DealershipApi};
use crate::model::{FetchKey, FetchMessage, FetchRequest};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, warn};

pub struct Fetcher {
    api: Arc<dyn DealershipApi>,
    sender: Sender<FetchMessage>,
    receiver: Receiver<FetchMessage>,
    generation: u64,
}

impl Fetcher {
    pub fn new(api: Arc<dyn DealershipApi>) -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            api,
            sender,
            receiver,
            generation: 0,
        }
    }

    /// Allocate a key for a new fetch cycle
    ///
    /// Keys are never reused, so every earlier cycle becomes stale.
    pub fn next_key(&mut self, dealer_id: Option<u64>) -> FetchKey {
        self.generation += 1;
        FetchKey {
            generation: self.generation,
            dealer_id,
        }
    }

    /// Start a request in the background
    pub fn issue(&self, key: FetchKey, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let sender = self.sender.clone();
        debug!(generation = key.generation, request = request.name(), "issuing fetch");

        thread::spawn(move || {
            let payload = execute(api.as_ref(), &request);
            if let Err(e) = &payload {
                warn!(request = request.name(), error = %e, "fetch failed");
            }
            // The receiver lives as long as the Fetcher; a send error only
            // means the app is shutting down.
            let _ = sender.send(FetchMessage {
                key,
                request,
                payload,
            });
        });
    }

    /// Start several independent requests under one key
    pub fn issue_all(&self, key: FetchKey, requests: impl IntoIterator<Item = FetchRequest>) {
        for request in requests {
            self.issue(key, request);
        }
    }

    /// Drain completed requests without blocking
    pub fn poll(&self) -> Vec<FetchMessage> {
        let mut messages = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(msg) => messages.push(msg),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        messages
    }

    #[cfg(test)]
    pub fn wait(&self, timeout: std::time::Duration) -> Option<FetchMessage> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::{DealerView, Payload, ReviewList};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Condvar, Mutex};
    use std::time::Duration;

    /// Canned backend; paths listed in `held` block until released
    #[derive(Default)]
    pub struct FakeApi {
        pub responses: Mutex<HashMap<String, Payload>>,
        pub posted: Mutex<Vec<(String, Value)>>,
        held: Mutex<Vec<String>>,
        released: Condvar,
    }

    impl FakeApi {
        pub fn respond(&self, path: &str, payload: Payload) {
            self.responses
                .lock()
                .unwrap()
                .insert(path.to_string(), payload);
        }

        pub fn hold(&self, path: &str) {
            self.held.lock().unwrap().push(path.to_string());
        }

        pub fn release(&self, path: &str) {
            self.held.lock().unwrap().retain(|p| p != path);
            self.released.notify_all();
        }

        fn answer(&self, path: &str) -> Payload {
            let mut held = self.held.lock().unwrap();
            while held.iter().any(|p| p == path) {
                held = self.released.wait(held).unwrap();
            }
            drop(held);

            self.responses
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or(Err(ApiError::Status(404)))
        }
    }

    impl DealershipApi for FakeApi {
        fn get(&self, path: &str) -> Payload {
            self.answer(path)
        }

        fn post(&self, path: &str, body: &Value) -> Payload {
            self.posted
                .lock()
                .unwrap()
                .push((path.to_string(), body.clone()));
            self.answer(path)
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_keys_are_unique() {
        let mut fetcher = Fetcher::new(Arc::new(FakeApi::default()));
        let a = fetcher.next_key(Some(1));
        let b = fetcher.next_key(Some(1));
        assert_ne!(a, b);
    }

    #[test]
    fn test_dealer_fetches_complete_independently() {
        let api = Arc::new(FakeApi::default());
        api.respond("dealer/42", Ok(json!({"status": 200, "dealer": {"id": 42, "full_name": "Joe's Motors"}})));
        api.respond("reviews/dealer/42", Ok(json!({"status": 200, "reviews": []})));
        api.hold("dealer/42");

        let mut fetcher = Fetcher::new(api.clone());
        let key = fetcher.next_key(Some(42));
        let mut view = DealerView::new(key, 42);
        fetcher.issue_all(key, view.requests());

        // Reviews arrive while the dealer request is still held
        let first = fetcher.wait(WAIT).expect("reviews response");
        assert_eq!(first.request, FetchRequest::Reviews(42));
        view.apply(&first);
        assert_eq!(view.reviews, ReviewList::Empty);
        assert!(!view.profile.is_loaded());

        api.release("dealer/42");
        let second = fetcher.wait(WAIT).expect("dealer response");
        view.apply(&second);
        assert!(view.profile.is_loaded());
    }

    #[test]
    fn test_late_response_for_previous_dealer_is_dropped() {
        let api = Arc::new(FakeApi::default());
        api.respond("dealer/1", Ok(json!({"status": 200, "dealer": {"id": 1, "full_name": "First"}})));
        api.respond("dealer/2", Ok(json!({"status": 200, "dealer": {"id": 2, "full_name": "Second"}})));
        api.hold("dealer/1");

        let mut fetcher = Fetcher::new(api.clone());
        let first_key = fetcher.next_key(Some(1));
        fetcher.issue(first_key, FetchRequest::Dealer(1));

        // Identifier changes before dealer 1 answered
        let second_key = fetcher.next_key(Some(2));
        let mut view = DealerView::new(second_key, 2);
        fetcher.issue(second_key, FetchRequest::Dealer(2));

        let msg = fetcher.wait(WAIT).expect("dealer 2 response");
        assert!(view.apply(&msg));
        assert_eq!(view.profile.dealer().unwrap().full_name, "Second");

        api.release("dealer/1");
        let late = fetcher.wait(WAIT).expect("dealer 1 response");
        assert!(!view.apply(&late));
        assert_eq!(view.profile.dealer().unwrap().full_name, "Second");
    }

    #[test]
    fn test_review_is_posted_as_json() {
        let api = Arc::new(FakeApi::default());
        api.respond("add_review", Ok(json!({"status": 200})));
        let mut fetcher = Fetcher::new(api.clone());
        let key = fetcher.next_key(Some(7));

        let draft = crate::model::draft::ReviewDraft {
            review: "Great!".into(),
            purchase_date: "2024-01-01".into(),
            selection: "Honda Civic".into(),
            year: "2020".into(),
        };
        let payload = draft.to_payload(7, "jdoe").unwrap();
        fetcher.issue(key, FetchRequest::AddReview(payload));

        let msg = fetcher.wait(WAIT).expect("post response");
        assert!(msg.payload.is_ok());
        let posted = api.posted.lock().unwrap();
        assert_eq!(posted[0].0, "add_review");
        assert_eq!(posted[0].1["car_make"], "Honda");
        assert_eq!(posted[0].1["purchase"], true);
    }

    #[test]
    fn test_poll_is_non_blocking() {
        let fetcher = Fetcher::new(Arc::new(FakeApi::default()));
        assert!(fetcher.poll().is_empty());
    }
}
