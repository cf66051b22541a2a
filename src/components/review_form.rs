//! Review composer screen
//!
//! Form with review text, purchase date, a make/model picker grouped by
//! make, and model year. Typing edits the focused field directly; the
//! submission itself goes through `Action::SubmitReview`.

use super::text::sanitize;
use crate::action::Action;
use crate::component::Component;
use crate::model::draft::DATE_FORMAT;
use crate::model::{CatalogOption, ComposerState, ComposerView, DraftField, Route};
use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

const SELECTION_PLACEHOLDER: &str = "Choose Car Make and Model";

/// Focusable parts of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(DraftField),
    Submit,
}

impl Focus {
    fn order() -> Vec<Focus> {
        let mut order: Vec<Focus> = DraftField::all().into_iter().map(Focus::Field).collect();
        order.push(Focus::Submit);
        order
    }

    fn step(self, forward: bool) -> Focus {
        let order = Focus::order();
        let pos = order.iter().position(|f| *f == self).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        order[next]
    }
}

/// Row in the grouped make/model list
enum PickerRow<'a> {
    /// Make header (not selectable)
    Make(&'a str),
    /// Index into the flat option list
    Option(usize),
}

pub struct ReviewFormScreen {
    pub view: ComposerView,
    pub focus: Focus,
    /// Index of the chosen option in catalog order
    option_index: Option<usize>,
}

impl ReviewFormScreen {
    pub fn new(view: ComposerView) -> Self {
        Self {
            view,
            focus: Focus::Field(DraftField::Review),
            option_index: None,
        }
    }

    fn options(&self) -> Vec<CatalogOption> {
        self.view
            .catalog
            .catalog()
            .map(|c| c.options())
            .unwrap_or_default()
    }

    fn cycle_option(&mut self, forward: bool) {
        let options = self.options();
        if options.is_empty() {
            return;
        }
        let next = match (self.option_index, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(options.len() - 1),
            (Some(i), false) => i.saturating_sub(1),
        };
        self.option_index = Some(next);
        self.view.composer.draft.selection = options[next].label.clone();
    }

    fn edit_text(&mut self, key: KeyEvent, field: DraftField) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('t') && field == DraftField::PurchaseDate {
                self.view.composer.draft.purchase_date = Local::now().format(DATE_FORMAT).to_string();
            }
            return;
        }

        let value = self.view.composer.draft.field_mut(field);
        match key.code {
            KeyCode::Char(c) => value.push(c),
            KeyCode::Backspace => {
                value.pop();
            }
            _ => {}
        }
    }

    fn field_style(&self, focus: Focus) -> Style {
        if self.focus == focus {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn draw_field(&self, frame: &mut Frame, area: Rect, field: DraftField) {
        let value = self.view.composer.draft.field(field);
        let text = match field {
            DraftField::Selection if value.is_empty() => Span::styled(
                SELECTION_PLACEHOLDER,
                Style::default().fg(Color::DarkGray),
            ),
            DraftField::PurchaseDate if value.is_empty() => Span::styled(
                "YYYY-MM-DD (Ctrl+T for today)",
                Style::default().fg(Color::DarkGray),
            ),
            _ => Span::raw(value.to_string()),
        };
        let focused = self.focus == Focus::Field(field);
        let mut line = vec![text];
        if focused && field != DraftField::Selection {
            line.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
        }

        let paragraph = Paragraph::new(Line::from(line))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", field.label()))
                    .border_style(self.field_style(Focus::Field(field))),
            );
        frame.render_widget(paragraph, area);
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Car Make and Model ")
            .border_style(self.field_style(Focus::Field(DraftField::Selection)));

        if let Some(reason) = self.view.catalog_status.failure() {
            let line = Line::from(vec![
                Span::styled(
                    format!("Could not load cars: {}  ", sanitize(reason)),
                    Style::default().fg(Color::Red),
                ),
                Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)),
                Span::raw(" retry"),
            ]);
            frame.render_widget(Paragraph::new(line).wrap(Wrap { trim: false }).block(block), area);
            return;
        }

        let options = self.options();
        if options.is_empty() {
            let text = if self.view.catalog.catalog().is_some() {
                "No cars available"
            } else {
                "Loading cars..."
            };
            frame.render_widget(Paragraph::new(text).block(block), area);
            return;
        }

        let mut rows = Vec::new();
        let mut last_make: Option<&str> = None;
        for (i, option) in options.iter().enumerate() {
            if last_make != Some(option.make.as_str()) {
                rows.push(PickerRow::Make(&option.make));
                last_make = Some(option.make.as_str());
            }
            rows.push(PickerRow::Option(i));
        }

        let selected_row = self.option_index.and_then(|chosen| {
            rows.iter()
                .position(|r| matches!(r, PickerRow::Option(i) if *i == chosen))
        });

        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| match row {
                PickerRow::Make(make) => ListItem::new(Line::from(Span::styled(
                    sanitize(make),
                    Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
                ))),
                PickerRow::Option(i) => ListItem::new(format!("  {}", sanitize(&options[*i].label))),
            })
            .collect();

        let mut state = ListState::default();
        state.select(selected_row);
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");
        frame.render_stateful_widget(list, area, &mut state);
    }

    /// Form title naming the dealer, or why its profile is missing
    fn title(&self) -> String {
        match (self.view.profile.dealer(), self.view.profile_status.failure()) {
            (Some(dealer), _) => format!(" Review {} ", sanitize(&dealer.full_name)),
            (None, Some(reason)) => format!(
                " Review Dealer #{} ({}; Ctrl+R to retry) ",
                self.view.dealer_id(),
                sanitize(reason)
            ),
            (None, None) => format!(" Review Dealer #{} ", self.view.dealer_id()),
        }
    }

    fn status_line(&self) -> Line<'static> {
        match self.view.composer.state() {
            ComposerState::Submitting => Line::from(Span::styled(
                "Submitting review...",
                Style::default().fg(Color::Cyan),
            )),
            ComposerState::Redirected(_) => Line::from(Span::styled(
                "Review posted",
                Style::default().fg(Color::Green),
            )),
            ComposerState::Editing { .. } => match self.view.composer.error() {
                Some(error) => Line::from(Span::styled(
                    sanitize(error),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                None => Line::from(""),
            },
        }
    }
}

impl Component for ReviewFormScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            // Stay put until the pending submission answers
            KeyCode::Esc if !self.view.composer.is_editing() => return Ok(None),
            KeyCode::Esc => {
                return Ok(Some(Action::Navigate(Route::Dealer(self.view.dealer_id()))))
            }
            KeyCode::Char('s') if ctrl => return Ok(Some(Action::SubmitReview)),
            KeyCode::Char('r') if ctrl => return Ok(Some(Action::Retry)),
            KeyCode::Tab => {
                self.focus = self.focus.step(true);
                return Ok(None);
            }
            KeyCode::BackTab => {
                self.focus = self.focus.step(false);
                return Ok(None);
            }
            KeyCode::Enter => {
                if self.focus == Focus::Submit {
                    return Ok(Some(Action::SubmitReview));
                }
                self.focus = self.focus.step(true);
                return Ok(None);
            }
            _ => {}
        }

        if !self.view.composer.is_editing() {
            return Ok(None);
        }

        match self.focus {
            Focus::Field(DraftField::Selection) => match key.code {
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => self.cycle_option(true),
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => self.cycle_option(false),
                _ => {}
            },
            Focus::Field(field) => self.edit_text(key, field),
            Focus::Submit => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let outer = Block::default()
            .borders(Borders::ALL)
            .title(self.title())
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(inner);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),    // Review
                Constraint::Length(3), // Purchase date
                Constraint::Length(3), // Make/model
                Constraint::Length(3), // Year
                Constraint::Length(3), // Submit
                Constraint::Length(1), // Status
            ])
            .split(columns[0]);

        for (area, field) in rows.iter().zip(DraftField::all()) {
            self.draw_field(frame, *area, field);
        }

        let button_style = if self.focus == Focus::Submit {
            Style::default().fg(Color::Black).bg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let button = Paragraph::new(Line::from(Span::styled(" Post Review ", button_style)))
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.field_style(Focus::Submit)),
            );
        frame.render_widget(button, rows[4]);
        frame.render_widget(Paragraph::new(self.status_line()), rows[5]);

        self.draw_picker(frame, columns[1]);
        Ok(())
    }
}
