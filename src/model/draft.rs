//! In-progress review and the payload it becomes

use super::catalog::split_selection;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Format of the purchase date field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Reasons a draft cannot be submitted yet
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("All details are mandatory")]
    Incomplete,

    #[error("Purchase date must be a date like 2024-01-31")]
    InvalidDate,

    #[error("Car year must be a number")]
    InvalidYear,

    #[error("Log in to post a review")]
    NotAuthenticated,

    #[error("A review is already being submitted")]
    AlreadySubmitting,
}

/// Editable fields of a draft, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Review,
    PurchaseDate,
    Selection,
    Year,
}

impl DraftField {
    pub fn all() -> [DraftField; 4] {
        [
            DraftField::Review,
            DraftField::PurchaseDate,
            DraftField::Selection,
            DraftField::Year,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Review => "Review",
            DraftField::PurchaseDate => "Purchase Date",
            DraftField::Selection => "Car Make",
            DraftField::Year => "Car Year",
        }
    }
}

/// A review being composed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    pub review: String,
    pub purchase_date: String,
    /// `"<Make> <Model>"` as picked from the catalog
    pub selection: String,
    pub year: String,
}

impl ReviewDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Review => &self.review,
            DraftField::PurchaseDate => &self.purchase_date,
            DraftField::Selection => &self.selection,
            DraftField::Year => &self.year,
        }
    }

    pub fn field_mut(&mut self, field: DraftField) -> &mut String {
        match field {
            DraftField::Review => &mut self.review,
            DraftField::PurchaseDate => &mut self.purchase_date,
            DraftField::Selection => &mut self.selection,
            DraftField::Year => &mut self.year,
        }
    }

    /// True when no field is blank
    pub fn is_complete(&self) -> bool {
        DraftField::all()
            .iter()
            .all(|f| !self.field(*f).trim().is_empty())
    }

    /// Validate the draft and encode it for `add_review`
    pub fn to_payload(&self, dealer_id: u64, author: &str) -> Result<ReviewPayload, DraftError> {
        if !self.is_complete() {
            return Err(DraftError::Incomplete);
        }

        let purchase_date = NaiveDate::parse_from_str(self.purchase_date.trim(), DATE_FORMAT)
            .map_err(|_| DraftError::InvalidDate)?;
        let car_year: u16 = self
            .year
            .trim()
            .parse()
            .map_err(|_| DraftError::InvalidYear)?;
        let (car_make, car_model) = split_selection(&self.selection);
        // A lone make such as "Tesla " leaves no model to post
        if car_make.is_empty() || car_model.is_empty() {
            return Err(DraftError::Incomplete);
        }

        Ok(ReviewPayload {
            name: author.to_string(),
            dealership: dealer_id,
            review: self.review.clone(),
            purchase: true,
            purchase_date: purchase_date.format(DATE_FORMAT).to_string(),
            car_make,
            car_model,
            car_year,
        })
    }
}

/// JSON body for `POST add_review`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewPayload {
    pub name: String,
    pub dealership: u64,
    pub review: String,
    /// Always true; the form has no way to say otherwise
    pub purchase: bool,
    pub purchase_date: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: u16,
}
