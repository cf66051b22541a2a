//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod dealer_detail;
pub mod directory;
pub mod help_dialog;
pub mod layout;
pub mod review_form;
pub mod state_filter_dialog;
pub mod text;

pub use dealer_detail::DealerScreen;
pub use directory::DirectoryScreen;
pub use help_dialog::HelpDialog;
pub use layout::calculate_screen_layout;
pub use review_form::ReviewFormScreen;
pub use state_filter_dialog::StateFilterDialog;
