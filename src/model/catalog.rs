//! Vehicle catalog offered to reviewers

use super::payload::{success_field, Payload};
use serde::Deserialize;
use tracing::warn;

/// A car model within a make
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarModel {
    #[serde(default)]
    pub id: u64,
    pub name: String,
}

/// A car manufacturer and its models
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarMake {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub models: Vec<CarModel>,
}

/// One selectable make/model combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogOption {
    /// Make this option is grouped under
    pub make: String,
    /// `"<Make> <Model>"`, also the selection value
    pub label: String,
}

/// Ordered list of makes, each with ordered models
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VehicleCatalog {
    pub makes: Vec<CarMake>,
}

impl VehicleCatalog {
    pub fn new(makes: Vec<CarMake>) -> Self {
        Self { makes }
    }

    /// All make/model combinations in catalog order
    pub fn options(&self) -> Vec<CatalogOption> {
        self.makes
            .iter()
            .flat_map(|make| {
                make.models.iter().map(move |model| CatalogOption {
                    make: make.name.clone(),
                    label: format!("{} {}", make.name, model.name),
                })
            })
            .collect()
    }
}

/// Split a `"<Make> <Model>"` selection into make and model
///
/// The make is the first whitespace-delimited token and the model is the
/// rest, re-joined with single spaces. Multi-word makes are therefore
/// mis-split ("Land Rover Discovery" gives make "Land"); the backend has
/// always received selections this way.
pub fn split_selection(selection: &str) -> (String, String) {
    let mut tokens = selection.split_whitespace();
    let make = tokens.next().unwrap_or_default().to_string();
    let model = tokens.collect::<Vec<_>>().join(" ");
    (make, model)
}

/// Catalog as seen by the composer
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CatalogState {
    #[default]
    Pending,
    Loaded(VehicleCatalog),
}

impl CatalogState {
    pub fn catalog(&self) -> Option<&VehicleCatalog> {
        match self {
            CatalogState::Loaded(catalog) => Some(catalog),
            CatalogState::Pending => None,
        }
    }

    /// Apply a `{status, cars}` envelope; unusable payloads are ignored
    pub fn receive(&mut self, payload: &Payload) -> bool {
        let Some(raw) = success_field(payload, "cars") else {
            warn!("ignoring unusable catalog payload");
            return false;
        };

        match serde_json::from_value::<Vec<CarMake>>(raw.clone()) {
            Ok(makes) => {
                *self = CatalogState::Loaded(VehicleCatalog::new(makes));
                true
            }
            Err(e) => {
                warn!(error = %e, "catalog payload did not match the expected shape");
                false
            }
        }
    }
}
