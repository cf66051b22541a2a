//! Dealer directory screen
//!
//! Lists dealers, optionally filtered by state. Enter opens the selected
//! dealer.

use super::text::{sanitize, truncate};
use crate::action::Action;
use crate::component::Component;
use crate::model::{DealerDirectory, DirectoryView, Route};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub struct DirectoryScreen {
    pub view: DirectoryView,
    table_state: TableState,
}

impl DirectoryScreen {
    pub fn new(view: DirectoryView) -> Self {
        Self {
            view,
            table_state: TableState::default(),
        }
    }

    /// Id of the highlighted dealer
    pub fn selected_dealer(&self) -> Option<u64> {
        let index = self.table_state.selected()?;
        self.view
            .directory
            .dealers()
            .get(index)
            .filter(|d| d.has_id())
            .map(|d| d.id)
    }

    /// Keep the highlight inside the list after data changes
    pub fn clamp_selection(&mut self) {
        let len = self.view.directory.dealers().len();
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            None => self.table_state.select(Some(0)),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }

    fn select_next(&mut self) {
        let len = self.view.directory.dealers().len();
        if len == 0 {
            return;
        }
        let next = self.table_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        if !self.view.directory.dealers().is_empty() {
            self.table_state.select(Some(prev));
        }
    }

    fn placeholder(&self) -> Line<'static> {
        if let Some(reason) = self.view.status.failure() {
            return Line::from(vec![
                Span::styled(
                    format!("Could not load dealers: {}  ", sanitize(reason)),
                    Style::default().fg(Color::Red),
                ),
                Span::styled("r", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::raw(" retry"),
            ]);
        }
        match self.view.directory {
            DealerDirectory::Empty => Line::from(Span::styled(
                "No dealers found",
                Style::default().fg(Color::Yellow),
            )),
            _ => Line::from(Span::styled(
                "Loading dealers...",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

impl Component for DirectoryScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Enter => self.selected_dealer().map(|id| Action::Navigate(Route::Dealer(id))),
            KeyCode::Char('f') => Some(Action::OpenStateFilter),
            KeyCode::Char('r') => Some(Action::Retry),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.select_next(),
            Action::PrevItem => self.select_prev(),
            Action::Tick => self.clamp_selection(),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let title = match self.view.filter() {
            Some(state) => format!(" Dealers in {} ", sanitize(state)),
            None => " Dealers ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let dealers = self.view.directory.dealers();
        if dealers.is_empty() {
            frame.render_widget(Paragraph::new(self.placeholder()).block(block), area);
            return Ok(());
        }

        let name_width = (area.width as usize / 3).max(12);
        let rows: Vec<Row> = dealers
            .iter()
            .map(|d| {
                Row::new(vec![
                    Cell::from(if d.has_id() { d.id.to_string() } else { "-".to_string() }),
                    Cell::from(truncate(&sanitize(&d.full_name), name_width)),
                    Cell::from(sanitize(&d.city)),
                    Cell::from(sanitize(&d.address)),
                    Cell::from(sanitize(&d.zip)),
                    Cell::from(sanitize(&d.state)),
                ])
            })
            .collect();

        let header = Row::new(vec!["ID", "Dealer Name", "City", "Address", "Zip", "State"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Percentage(33),
                Constraint::Percentage(15),
                Constraint::Percentage(27),
                Constraint::Length(7),
                Constraint::Min(8),
            ],
        )
        .header(header)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
        Ok(())
    }
}
