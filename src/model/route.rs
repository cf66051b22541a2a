//! Screens the application can navigate between

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Dealer directory, optionally filtered by state
    Dealers { state: Option<String> },
    /// Detail view for one dealer
    Dealer(u64),
    /// Review composer for one dealer
    PostReview(u64),
}

impl Default for Route {
    fn default() -> Self {
        Route::Dealers { state: None }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Dealers { state: None } => write!(f, "/"),
            Route::Dealers { state: Some(state) } => write!(f, "/?state={}", state),
            Route::Dealer(id) => write!(f, "/dealer/{}", id),
            Route::PostReview(id) => write!(f, "/postreview/{}", id),
        }
    }
}
