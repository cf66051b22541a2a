//! Dealer records and the single-dealer profile model

use super::payload::{lenient_string, lenient_u64, success_field, Payload};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// A dealership as returned by the backend
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Dealer {
    /// 0 when the backend sent no usable id
    #[serde(default, deserialize_with = "lenient_u64")]
    pub id: u64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub zip: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: String,
}

impl Dealer {
    /// A dealer without a display name counts as not loaded
    pub fn has_name(&self) -> bool {
        !self.full_name.trim().is_empty()
    }

    /// Whether the record can be opened by id
    pub fn has_id(&self) -> bool {
        self.id != 0
    }

    /// `city, address, Zip - zip, state`
    pub fn location_line(&self) -> String {
        format!(
            "{}, {}, Zip - {}, {}",
            self.city, self.address, self.zip, self.state
        )
    }

    /// Parse one dealer record, rejecting nameless ones
    pub fn from_value(value: &Value) -> Option<Dealer> {
        serde_json::from_value::<Dealer>(value.clone())
            .ok()
            .filter(Dealer::has_name)
    }
}

/// Profile of the dealer a screen is showing
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DealerProfile {
    #[default]
    Unloaded,
    Loaded(Dealer),
}

impl DealerProfile {
    pub fn is_loaded(&self) -> bool {
        matches!(self, DealerProfile::Loaded(_))
    }

    pub fn dealer(&self) -> Option<&Dealer> {
        match self {
            DealerProfile::Loaded(dealer) => Some(dealer),
            DealerProfile::Unloaded => None,
        }
    }

    /// Apply a `{status, dealer}` envelope
    ///
    /// `dealer` may be a record or an array whose first element is the
    /// record. Anything unusable leaves the current state alone. Returns
    /// whether the payload was accepted.
    pub fn receive(&mut self, payload: &Payload) -> bool {
        let record = match success_field(payload, "dealer") {
            Some(Value::Array(items)) => items.first(),
            Some(other) => Some(other),
            None => None,
        };

        match record.and_then(Dealer::from_value) {
            Some(dealer) => {
                *self = DealerProfile::Loaded(dealer);
                true
            }
            None => {
                warn!("ignoring unusable dealer payload");
                false
            }
        }
    }
}
