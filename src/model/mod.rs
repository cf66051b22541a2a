//! Model layer - dealership data and per-screen state
//!
//! This module contains all state-related types:
//! - `DealerProfile`, `ReviewList`, `DealerDirectory` - fail-soft models fed by backend payloads
//! - `Composer` / `ReviewDraft` - review form state machine
//! - `SessionGate` - read-only view over the session identity
//! - `DealerView`, `ComposerView`, `DirectoryView` - per-screen state keyed by fetch cycle
//! - `ModalStack` - overlay management

pub mod catalog;
pub mod composer;
pub mod dealer;
pub mod directory;
pub mod draft;
pub mod fetch;
pub mod modal;
pub mod payload;
pub mod review;
pub mod route;
pub mod sentiment;
pub mod session;
pub mod view;

// Re-export commonly used types
pub use catalog::CatalogOption;
pub use composer::ComposerState;
pub use directory::DealerDirectory;
pub use draft::DraftField;
pub use fetch::{FetchKey, FetchMessage, FetchRequest};
pub use modal::{Modal, ModalStack};
pub use payload::Payload;
pub use review::{Review, ReviewList};
pub use route::Route;
pub use sentiment::SentimentIcon;
pub use session::{IdentityProvider, SessionFile, SessionGate};
pub use view::{ComposerView, DealerView, DirectoryView};
