//! State filter dialog component
//!
//! Allows narrowing the dealer directory to a single state.

use super::layout::centered_popup;
use super::text::sanitize;
use crate::action::Action;
use crate::component::Component;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// State filter dialog
#[derive(Default)]
pub struct StateFilterDialog {
    /// States seen in the unfiltered listing
    pub states: Vec<String>,
    /// Selected row; 0 is "Show all"
    pub selected_index: usize,
    list_state: ListState,
    /// Active filter, if any
    pub current_filter: Option<String>,
}

impl StateFilterDialog {
    /// Set available states and highlight the active one
    pub fn set_states(&mut self, states: Vec<String>, current_filter: Option<&str>) {
        self.states = states;
        self.current_filter = current_filter.map(str::to_string);

        self.selected_index = current_filter
            .and_then(|f| self.states.iter().position(|s| s == f))
            .map_or(0, |idx| idx + 1);
        self.list_state.select(Some(self.selected_index));
    }

    /// Selected state (None means show all)
    pub fn selected_state(&self) -> Option<&str> {
        match self.selected_index {
            0 => None,
            i => self.states.get(i - 1).map(|s| s.as_str()),
        }
    }

    fn select_next(&mut self) {
        if self.selected_index < self.states.len() {
            self.selected_index += 1;
            self.list_state.select(Some(self.selected_index));
        }
    }

    fn select_prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
            self.list_state.select(Some(self.selected_index));
        }
    }
}

impl Component for StateFilterDialog {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('f') => Some(Action::CloseModal),
            KeyCode::Enter => match self.selected_state() {
                Some(state) => Some(Action::SetStateFilter(state.to_string())),
                None => Some(Action::ClearStateFilter),
            },
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let content_height = if self.states.is_empty() { 4 } else { self.states.len() as u16 + 3 };
        let popup_height = (content_height + 6).min(area.height.saturating_sub(4)).max(12);
        let popup_area = centered_popup(area, 46u16.min(area.width.saturating_sub(4)), popup_height);
        frame.render_widget(Clear, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // State list
                Constraint::Length(3), // Help bar
            ])
            .split(popup_area);

        let header_text = match &self.current_filter {
            Some(state) => format!("Current: {}", sanitize(state)),
            None => "Showing all states".to_string(),
        };
        let header = Paragraph::new(Line::from(Span::styled(
            header_text,
            Style::default().fg(Color::Cyan),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Filter by State ")
                .title_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)),
        );
        frame.render_widget(header, chunks[0]);

        let marker = |active: bool| {
            Span::styled(if active { "● " } else { "  " }, Style::default().fg(Color::Green))
        };

        let mut items = vec![ListItem::new(Line::from(vec![
            marker(self.current_filter.is_none()),
            Span::styled("Show all", Style::default().fg(Color::DarkGray)),
        ]))];
        for state in &self.states {
            let active = self.current_filter.as_deref() == Some(state.as_str());
            items.push(ListItem::new(Line::from(vec![
                marker(active),
                Span::styled(
                    sanitize(state),
                    if active {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    },
                ),
            ])));
        }
        if self.states.is_empty() {
            items.push(ListItem::new(Span::styled(
                "  No states loaded yet",
                Style::default().fg(Color::Yellow),
            )));
        }

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);

        let help = Paragraph::new(Line::from(vec![
            Span::styled(" Enter ", Style::default().fg(Color::Yellow)),
            Span::raw("Select  "),
            Span::styled(" j/k ", Style::default().fg(Color::Cyan)),
            Span::raw("Navigate  "),
            Span::styled(" Esc/f ", Style::default().fg(Color::Yellow)),
            Span::raw("Cancel"),
        ]))
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(help, chunks[2]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(dialog: &mut StateFilterDialog, code: KeyCode) -> Option<Action> {
        dialog
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn test_preselects_active_filter() {
        let mut dialog = StateFilterDialog::default();
        dialog.set_states(vec!["Kansas".into(), "Texas".into()], Some("Texas"));
        assert_eq!(dialog.selected_state(), Some("Texas"));

        dialog.set_states(vec!["Kansas".into()], Some("Ohio"));
        assert_eq!(dialog.selected_state(), None);
    }

    #[test]
    fn test_enter_sets_or_clears_filter() {
        let mut dialog = StateFilterDialog::default();
        dialog.set_states(vec!["Kansas".into(), "Texas".into()], None);
        assert_eq!(press(&mut dialog, KeyCode::Enter), Some(Action::ClearStateFilter));

        press(&mut dialog, KeyCode::Char('j'));
        press(&mut dialog, KeyCode::Char('j'));
        press(&mut dialog, KeyCode::Char('j'));
        assert_eq!(
            press(&mut dialog, KeyCode::Enter),
            Some(Action::SetStateFilter("Texas".to_string()))
        );
        assert_eq!(press(&mut dialog, KeyCode::Esc), Some(Action::CloseModal));
    }
}
