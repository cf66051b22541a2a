//! External service interactions
//!
//! This module contains services for talking to the dealership backend:
//! - HTTP client behind the `DealershipApi` trait
//! - Background fetch execution with keyed delivery

pub mod api;
pub mod fetcher;

pub use api::{DealershipApi, HttpApi};
pub use fetcher::Fetcher;
