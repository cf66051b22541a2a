//! Requests, their keys, and what comes back

use super::draft::ReviewPayload;
use super::payload::{failure_reason, Payload};

/// Identity of one fetch cycle
///
/// Captured when requests are issued and echoed back with every response.
/// A view only applies responses carrying its current key, so anything
/// issued for a previous dealer (or a previous visit to the same dealer)
/// is dropped on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub generation: u64,
    pub dealer_id: Option<u64>,
}

/// A backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Dealers { state: Option<String> },
    Dealer(u64),
    Reviews(u64),
    Cars,
    AddReview(ReviewPayload),
}

impl FetchRequest {
    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            FetchRequest::Dealers { state: None } => "get_dealers".to_string(),
            FetchRequest::Dealers { state: Some(state) } => format!("get_dealers/{}", state),
            FetchRequest::Dealer(id) => format!("dealer/{}", id),
            FetchRequest::Reviews(id) => format!("reviews/dealer/{}", id),
            FetchRequest::Cars => "get_cars".to_string(),
            FetchRequest::AddReview(_) => "add_review".to_string(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FetchRequest::Dealers { .. } => "dealers",
            FetchRequest::Dealer(_) => "dealer",
            FetchRequest::Reviews(_) => "reviews",
            FetchRequest::Cars => "cars",
            FetchRequest::AddReview(_) => "add_review",
        }
    }
}

/// A completed request
#[derive(Debug, Clone)]
pub struct FetchMessage {
    pub key: FetchKey,
    pub request: FetchRequest,
    pub payload: Payload,
}

/// Progress of one fetch, kept beside the model it feeds
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    InFlight,
    Succeeded,
    Failed(String),
}

impl FetchStatus {
    /// Status after a payload was offered to a model
    pub fn settle(accepted: bool, payload: &Payload) -> FetchStatus {
        if accepted {
            FetchStatus::Succeeded
        } else {
            FetchStatus::Failed(failure_reason(payload))
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FetchStatus::Failed(_))
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            FetchStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    #[test]
    fn test_paths() {
        assert_eq!(FetchRequest::Dealer(42).path(), "dealer/42");
        assert_eq!(FetchRequest::Reviews(42).path(), "reviews/dealer/42");
        assert_eq!(FetchRequest::Cars.path(), "get_cars");
        assert_eq!(FetchRequest::Dealers { state: None }.path(), "get_dealers");
        assert_eq!(
            FetchRequest::Dealers { state: Some("Texas".into()) }.path(),
            "get_dealers/Texas"
        );
    }

    #[test]
    fn test_settle() {
        let ok: Payload = Ok(json!({"status": 200}));
        assert_eq!(FetchStatus::settle(true, &ok), FetchStatus::Succeeded);
        assert_eq!(
            FetchStatus::settle(false, &Err(ApiError::Timeout)),
            FetchStatus::Failed("request timed out".into())
        );
    }
}
