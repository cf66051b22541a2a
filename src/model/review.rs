//! Customer reviews and the per-dealer review list model

use super::payload::{lenient_bool, lenient_label, lenient_string, success_field, Payload};
use super::sentiment::{resolve_icon, SentimentIcon};
use serde::Deserialize;
use tracing::warn;

/// A customer review of a dealer
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub review: String,
    #[serde(default, deserialize_with = "lenient_label")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub purchase: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub car_make: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub car_model: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub car_year: String,
}

/// Vehicle bought alongside a review
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseInfo<'a> {
    pub make: &'a str,
    pub model: &'a str,
    pub year: &'a str,
}

impl Review {
    pub fn icon(&self) -> SentimentIcon {
        resolve_icon(self.sentiment.as_deref())
    }

    /// Purchase annotation, present only for purchase-linked reviews
    pub fn purchase_info(&self) -> Option<PurchaseInfo<'_>> {
        self.purchase.then_some(PurchaseInfo {
            make: &self.car_make,
            model: &self.car_model,
            year: &self.car_year,
        })
    }

    /// `name` or `name - make model year`
    pub fn byline(&self) -> String {
        match self.purchase_info() {
            Some(p) => format!("{} - {} {} {}", self.name, p.make, p.model, p.year),
            None => self.name.clone(),
        }
    }
}

/// Reviews for one dealer
///
/// `Pending` and `Empty` are different answers: the first means nothing
/// usable has arrived yet, the second that the backend confirmed there are
/// no reviews.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ReviewList {
    #[default]
    Pending,
    Empty,
    Populated(Vec<Review>),
}

impl ReviewList {
    pub fn is_pending(&self) -> bool {
        matches!(self, ReviewList::Pending)
    }

    pub fn reviews(&self) -> &[Review] {
        match self {
            ReviewList::Populated(reviews) => reviews,
            _ => &[],
        }
    }

    /// Apply a `{status, reviews}` envelope
    ///
    /// Failed or malformed payloads leave the current state alone. Returns
    /// whether the payload was accepted.
    pub fn receive(&mut self, payload: &Payload) -> bool {
        let Some(raw) = success_field(payload, "reviews") else {
            warn!("ignoring unusable reviews payload");
            return false;
        };

        let Some(items) = raw.as_array() else {
            warn!("reviews payload is not a list");
            return false;
        };

        let reviews: Vec<Review> = items
            .iter()
            .filter_map(|item| match serde_json::from_value::<Review>(item.clone()) {
                Ok(review) => Some(review),
                Err(e) => {
                    warn!(error = %e, "skipping unusable review record");
                    None
                }
            })
            .collect();

        // A non-empty list with nothing usable is not a confirmed "no reviews"
        if reviews.is_empty() && !items.is_empty() {
            return false;
        }

        *self = if reviews.is_empty() {
            ReviewList::Empty
        } else {
            ReviewList::Populated(reviews)
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use serde_json::json;

    fn review(id: u64, name: &str, sentiment: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "dealership": 15,
            "review": "Fantastic services",
            "purchase": false,
            "sentiment": sentiment
        })
    }

    #[test]
    fn test_failure_stays_pending() {
        let mut list = ReviewList::default();
        assert!(!list.receive(&Err(ApiError::Transport("refused".into()))));
        assert!(!list.receive(&Ok(json!({"status": 500, "message": "boom"}))));
        assert!(!list.receive(&Ok(json!({"status": 200}))));
        assert!(!list.receive(&Ok(json!({"status": 200, "reviews": "nope"}))));
        assert!(list.is_pending());
    }

    #[test]
    fn test_empty_collection() {
        let mut list = ReviewList::default();
        assert!(list.receive(&Ok(json!({"status": 200, "reviews": []}))));
        assert_eq!(list, ReviewList::Empty);
        assert!(list.reviews().is_empty());
    }

    #[test]
    fn test_populated_preserves_order() {
        let mut list = ReviewList::default();
        let payload = Ok(json!({
            "status": 200,
            "reviews": [review(2, "Berkly Shepley", "positive"), review(1, "Gwenora Zettoi", "negative")]
        }));
        assert!(list.receive(&payload));

        let names: Vec<_> = list.reviews().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Berkly Shepley", "Gwenora Zettoi"]);
        assert_eq!(list.reviews()[0].icon(), SentimentIcon::Positive);
        assert_eq!(list.reviews()[1].icon(), SentimentIcon::Negative);
    }

    #[test]
    fn test_redelivery_is_idempotent() {
        let payload = Ok(json!({"status": 200, "reviews": [review(1, "A", "neutral")]}));
        let mut once = ReviewList::default();
        once.receive(&payload);
        let mut twice = once.clone();
        twice.receive(&payload);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_failure_keeps_populated_list() {
        let mut list = ReviewList::default();
        list.receive(&Ok(json!({"status": 200, "reviews": [review(1, "A", "positive")]})));
        list.receive(&Err(ApiError::Timeout));
        assert_eq!(list.reviews().len(), 1);
    }

    #[test]
    fn test_purchase_byline() {
        let r: Review = serde_json::from_value(json!({
            "id": 7,
            "name": "Lion Hart",
            "review": "Fine",
            "purchase": true,
            "car_make": "Audi",
            "car_model": "A6",
            "car_year": 2010
        }))
        .unwrap();
        assert_eq!(r.byline(), "Lion Hart - Audi A6 2010");
        assert_eq!(r.icon(), SentimentIcon::Neutral);

        let r: Review = serde_json::from_value(review(8, "Anon", "positive")).unwrap();
        assert!(r.purchase_info().is_none());
        assert_eq!(r.byline(), "Anon");
    }

    #[test]
    fn test_odd_fields_do_not_hide_other_reviews() {
        let mut list = ReviewList::default();
        let payload = Ok(json!({
            "status": 200,
            "reviews": [
                review(1, "Berkly Shepley", "positive"),
                {"id": 2, "name": "Null Purchase", "review": "ok", "purchase": null, "sentiment": "negative"},
                {"id": 3, "name": "Numeric Sentiment", "review": "meh", "sentiment": 3},
                "not a review"
            ]
        }));
        assert!(list.receive(&payload));

        let reviews = list.reviews();
        assert_eq!(reviews.len(), 3);
        assert_eq!(reviews[0].icon(), SentimentIcon::Positive);
        assert!(!reviews[1].purchase);
        assert_eq!(reviews[1].icon(), SentimentIcon::Negative);
        assert_eq!(reviews[2].sentiment, None);
        assert_eq!(reviews[2].icon(), SentimentIcon::Neutral);
    }

    #[test]
    fn test_all_records_unusable_stays_pending() {
        let mut list = ReviewList::default();
        assert!(!list.receive(&Ok(json!({"status": 200, "reviews": [1, "x"]}))));
        assert!(list.is_pending());
    }
}
