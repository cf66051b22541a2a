//! Dealer directory listing

use super::dealer::Dealer;
use super::payload::{success_field, Payload};
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DealerDirectory {
    #[default]
    Pending,
    Empty,
    Loaded(Vec<Dealer>),
}

impl DealerDirectory {
    pub fn dealers(&self) -> &[Dealer] {
        match self {
            DealerDirectory::Loaded(dealers) => dealers,
            _ => &[],
        }
    }

    /// Distinct states present in the listing, sorted
    pub fn states(&self) -> Vec<String> {
        self.dealers()
            .iter()
            .map(|d| d.state.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Apply a `{status, dealers}` envelope
    ///
    /// Nameless records are dropped; a failed or malformed payload leaves
    /// the listing alone.
    pub fn receive(&mut self, payload: &Payload) -> bool {
        let Some(items) = success_field(payload, "dealers").and_then(|v| v.as_array()) else {
            warn!("ignoring unusable dealer list payload");
            return false;
        };

        let dealers: Vec<Dealer> = items.iter().filter_map(Dealer::from_value).collect();
        if dealers.len() < items.len() {
            warn!(
                dropped = items.len() - dealers.len(),
                "dealer list contained unusable records"
            );
        }

        *self = if dealers.is_empty() {
            DealerDirectory::Empty
        } else {
            DealerDirectory::Loaded(dealers)
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receive_and_states() {
        let mut dir = DealerDirectory::default();
        let payload = Ok(json!({
            "status": 200,
            "dealers": [
                {"id": 1, "full_name": "Holdlamis Car Dealership", "state": "Texas"},
                {"id": 2, "full_name": "Temp Car Dealership", "state": "Kansas"},
                {"id": 3, "full_name": "Sub-Ex Car Dealership", "state": "Texas"},
                {"id": 4, "full_name": ""}
            ]
        }));
        assert!(dir.receive(&payload));
        assert_eq!(dir.dealers().len(), 3);
        assert_eq!(dir.states(), vec!["Kansas".to_string(), "Texas".to_string()]);
    }

    #[test]
    fn test_not_found_keeps_listing() {
        let mut dir = DealerDirectory::default();
        let payload = Ok(json!({"status": 404, "message": "Could not fetch dealer list from API."}));
        assert!(!dir.receive(&payload));
        assert_eq!(dir, DealerDirectory::Pending);
    }

    #[test]
    fn test_empty_listing() {
        let mut dir = DealerDirectory::default();
        assert!(dir.receive(&Ok(json!({"status": 200, "dealers": []}))));
        assert_eq!(dir, DealerDirectory::Empty);
    }
}
