//! Component trait - Interface for screens and dialogs
//!
//! Each component owns its presentation state, turns key events into
//! Actions, and renders itself. Data changes arrive through Actions or
//! through the view a screen wraps, never by reaching into another
//! component.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// The pattern follows:
/// 1. `handle_key_event` - Convert key presses to Actions (local edits such
///    as typing into a field may happen here)
/// 2. `update` - Process Actions and update state
/// 3. `draw` - Render the component
pub trait Component {
    /// Handle a key event, returning an optional Action
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// Update component state based on an Action
    ///
    /// May return a follow-up Action, which the caller processes next.
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    /// Draw the component to the frame
    ///
    /// Pure rendering; `&mut self` only so stateful widgets can be used.
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
