//! Dealer detail screen
//!
//! Dealer heading plus the review panel. The heading waits for the dealer
//! profile; the review panel distinguishes loading, no reviews, and a list.

use super::layout::split_heading;
use super::text::sanitize;
use crate::action::Action;
use crate::component::Component;
use crate::model::{DealerView, Review, Route, SentimentIcon};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub struct DealerScreen {
    pub view: DealerView,
    /// Whether the post-review affordance is offered
    pub can_post: bool,
    scroll: u16,
}

fn icon_color(icon: SentimentIcon) -> Color {
    match icon {
        SentimentIcon::Positive => Color::Green,
        SentimentIcon::Neutral => Color::Yellow,
        SentimentIcon::Negative => Color::Red,
    }
}

fn review_lines(review: &Review) -> Vec<Line<'static>> {
    let icon = review.icon();
    vec![
        Line::from(vec![
            Span::styled(
                format!("{} ", icon.glyph()),
                Style::default().fg(icon_color(icon)).add_modifier(Modifier::BOLD),
            ),
            Span::raw(sanitize(&review.review)),
        ]),
        Line::from(Span::styled(
            format!("   {}", sanitize(&review.byline())),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ]
}

fn retry_hint(what: &str, reason: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("Could not load {}: {}  ", what, sanitize(reason)),
            Style::default().fg(Color::Red),
        ),
        Span::styled("r", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw(" retry"),
    ])
}

impl DealerScreen {
    pub fn new(view: DealerView) -> Self {
        Self {
            view,
            can_post: false,
            scroll: 0,
        }
    }

    fn heading(&self) -> Vec<Line<'static>> {
        let Some(dealer) = self.view.profile.dealer() else {
            return vec![];
        };

        let mut title = vec![Span::styled(
            sanitize(&dealer.full_name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )];
        if self.can_post {
            title.push(Span::raw("  "));
            title.push(Span::styled(
                "[p] Post Review",
                Style::default().fg(Color::Black).bg(Color::Cyan),
            ));
        }

        vec![
            Line::from(title),
            Line::from(Span::styled(
                sanitize(&dealer.location_line()),
                Style::default().fg(Color::Gray),
            )),
        ]
    }

    fn review_panel(&self) -> Vec<Line<'static>> {
        let reviews = &self.view.reviews;
        if reviews.is_pending() {
            return match self.view.reviews_status.failure() {
                Some(reason) => vec![retry_hint("reviews", reason)],
                None => vec![Line::from(Span::styled(
                    "Loading Reviews....",
                    Style::default().fg(Color::DarkGray),
                ))],
            };
        }

        match reviews.reviews() {
            [] => vec![Line::from("No reviews yet! ")],
            list => list.iter().flat_map(review_lines).collect(),
        }
    }
}

impl Component for DealerScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let id = self.view.dealer_id();
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => Some(Action::NextItem),
            KeyCode::Char('k') | KeyCode::Up => Some(Action::PrevItem),
            KeyCode::Char('p') if self.can_post => Some(Action::Navigate(Route::PostReview(id))),
            KeyCode::Char(']') => id.checked_add(1).map(|next| Action::Navigate(Route::Dealer(next))),
            KeyCode::Char('[') if id > 1 => Some(Action::Navigate(Route::Dealer(id - 1))),
            KeyCode::Char('r') => Some(Action::Retry),
            KeyCode::Esc | KeyCode::Char('b') => Some(Action::Navigate(Route::default())),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::NextItem => self.scroll = self.scroll.saturating_add(1),
            Action::PrevItem => self.scroll = self.scroll.saturating_sub(1),
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Dealer #{} ", self.view.dealer_id()))
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.view.profile.is_loaded() {
            let line = match self.view.profile_status.failure() {
                Some(reason) => retry_hint("dealer", reason),
                None => Line::from(Span::styled(
                    "Loading dealer details...",
                    Style::default().fg(Color::DarkGray),
                )),
            };
            frame.render_widget(Paragraph::new(line), inner);
            return Ok(());
        }

        let (heading_area, reviews_area) = split_heading(inner, 3);
        frame.render_widget(Paragraph::new(self.heading()), heading_area);

        let reviews = Paragraph::new(self.review_panel())
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(format!(" Reviews ({}) ", self.view.reviews.reviews().len()))
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(reviews, reviews_area);
        Ok(())
    }
}
