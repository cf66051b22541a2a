//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::Route;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; drains finished fetches
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit the application
    Quit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Mount the screen for a route
    Navigate(Route),
    /// Move to next item in list
    NextItem,
    /// Move to previous item in list
    PrevItem,
    /// Re-issue fetches that failed on the current screen
    Retry,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open the state filter dialog on the directory
    OpenStateFilter,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
    /// Filter the directory by state
    SetStateFilter(String),
    /// Show every dealer again
    ClearStateFilter,

    // ─────────────────────────────────────────────────────────────────────────
    // Review Composer
    // ─────────────────────────────────────────────────────────────────────────
    /// Submit the review draft
    SubmitReview,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::Quit => write!(f, "Quit"),
            Action::Navigate(route) => write!(f, "Navigate({})", route),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::Retry => write!(f, "Retry"),
            Action::OpenStateFilter => write!(f, "OpenStateFilter"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::SetStateFilter(state) => write!(f, "SetStateFilter({})", state),
            Action::ClearStateFilter => write!(f, "ClearStateFilter"),
            Action::SubmitReview => write!(f, "SubmitReview"),
        }
    }
}
