//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to the mounted screen and any
//! open modal. It owns the fetcher and is the only place fetch results are
//! routed into screen state.

use crate::action::Action;
use crate::component::Component;
use crate::components::{
    calculate_screen_layout, DealerScreen, DirectoryScreen, HelpDialog, ReviewFormScreen,
    StateFilterDialog,
};
use crate::config::Config;
use crate::model::{
    ComposerView, DealerView, DirectoryView, FetchMessage, FetchRequest, IdentityProvider, Modal,
    ModalStack, Route, SessionFile, SessionGate,
};
use crate::services::{DealershipApi, Fetcher, HttpApi};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The screen mounted for the current route
pub enum Screen {
    Directory(DirectoryScreen),
    Dealer(DealerScreen),
    ReviewForm(ReviewFormScreen),
}

impl Screen {
    fn component(&mut self) -> &mut dyn Component {
        match self {
            Screen::Directory(s) => s,
            Screen::Dealer(s) => s,
            Screen::ReviewForm(s) => s,
        }
    }

    fn key_hints(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Screen::Directory(_) => vec![
                ("j/k", "Move"),
                ("Enter", "Open"),
                ("f", "Filter"),
                ("r", "Retry"),
                ("?", "Help"),
                ("q", "Quit"),
            ],
            Screen::Dealer(s) if s.can_post => vec![
                ("j/k", "Scroll"),
                ("p", "Post Review"),
                ("[/]", "Prev/Next"),
                ("r", "Retry"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
            Screen::Dealer(_) => vec![
                ("j/k", "Scroll"),
                ("[/]", "Prev/Next"),
                ("r", "Retry"),
                ("Esc", "Back"),
                ("q", "Quit"),
            ],
            Screen::ReviewForm(_) => vec![
                ("Tab", "Next field"),
                ("↑/↓", "Car"),
                ("Ctrl+t", "Today"),
                ("Ctrl+s", "Post"),
                ("Esc", "Cancel"),
            ],
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// App State
// ═══════════════════════════════════════════════════════════════════════════════

pub struct App {
    fetcher: Fetcher,
    session: SessionGate,
    /// Backend base URL, shown in the title bar
    api_url: String,

    pub route: Route,
    pub screen: Screen,
    pub modals: ModalStack,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// One-line notice shown in the help bar until the next key press
    pub status_message: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Dialogs
    // ─────────────────────────────────────────────────────────────────────────
    pub state_filter_dialog: StateFilterDialog,
    pub help_dialog: HelpDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create the app against the configured backend and session store
    pub fn new(config: &Config) -> Result<App> {
        let api = HttpApi::new(
            &config.api_base_url,
            config.request_timeout(),
            config.session_cookie.as_deref(),
        )?;
        let session = SessionFile::new(config.session_path());
        info!(api_url = %config.api_base_url, session = %config.session_path().display(), "starting");
        Ok(Self::with_parts(
            Arc::new(api),
            Arc::new(session),
            config.api_base_url.clone(),
        ))
    }

    /// Create the app from explicit parts and mount the directory
    pub fn with_parts(
        api: Arc<dyn DealershipApi>,
        identity: Arc<dyn IdentityProvider>,
        api_url: String,
    ) -> App {
        let mut fetcher = Fetcher::new(api);
        let session = SessionGate::new(identity);
        let route = Route::default();
        let screen = Self::mount(&mut fetcher, &route);

        App {
            fetcher,
            session,
            api_url,
            route,
            screen,
            modals: ModalStack::new(),
            should_quit: false,
            status_message: None,
            state_filter_dialog: StateFilterDialog::default(),
            help_dialog: HelpDialog::default(),
        }
    }

    /// Build the screen for a route and start its fetches
    ///
    /// Every mount gets a fresh key, so results still in flight for the
    /// previous screen are discarded on arrival.
    fn mount(fetcher: &mut Fetcher, route: &Route) -> Screen {
        match route {
            Route::Dealers { state } => {
                let key = fetcher.next_key(None);
                let view = DirectoryView::new(key, state.clone());
                fetcher.issue(key, view.request());
                Screen::Directory(DirectoryScreen::new(view))
            }
            Route::Dealer(id) => {
                let key = fetcher.next_key(Some(*id));
                let view = DealerView::new(key, *id);
                fetcher.issue_all(key, view.requests());
                Screen::Dealer(DealerScreen::new(view))
            }
            Route::PostReview(id) => {
                let key = fetcher.next_key(Some(*id));
                let view = ComposerView::new(key, *id);
                fetcher.issue_all(key, view.requests());
                Screen::ReviewForm(ReviewFormScreen::new(view))
            }
        }
    }

    fn navigate(&mut self, route: Route) {
        if matches!(route, Route::PostReview(_)) && !self.session.is_authenticated() {
            info!(%route, "refusing review form without a session");
            self.status_message = Some("Log in to post a review".to_string());
            return;
        }

        info!(from = %self.route, to = %route, "navigate");
        self.modals.clear();
        self.screen = Self::mount(&mut self.fetcher, &route);
        self.route = route;
    }

    /// Route one completed fetch into the mounted screen
    ///
    /// Returns a follow-up navigation when a review submission succeeded.
    fn apply_message(&mut self, msg: &FetchMessage) -> Option<Action> {
        match &mut self.screen {
            Screen::Directory(s) => {
                s.view.apply(msg);
                None
            }
            Screen::Dealer(s) => {
                s.view.apply(msg);
                None
            }
            Screen::ReviewForm(s) => {
                let route = s.view.apply(msg)?;
                self.status_message = Some("Review posted".to_string());
                Some(Action::Navigate(route))
            }
        }
    }

    fn retry(&mut self) {
        match &mut self.screen {
            Screen::Directory(s) => {
                if let Some(request) = s.view.retry() {
                    self.fetcher.issue(s.view.key(), request);
                }
            }
            Screen::Dealer(s) => {
                let requests = s.view.retry();
                self.fetcher.issue_all(s.view.key(), requests);
            }
            Screen::ReviewForm(s) => {
                let requests = s.view.retry();
                self.fetcher.issue_all(s.view.key(), requests);
            }
        }
    }

    /// Re-list the directory under a new filter, keeping its known states
    fn apply_state_filter(&mut self, state: Option<String>) {
        self.modals.pop();
        let Screen::Directory(s) = &mut self.screen else {
            return;
        };

        let key = self.fetcher.next_key(None);
        s.view.refilter(key, state.clone());
        self.fetcher.issue(key, s.view.request());
        self.route = Route::Dealers { state };
        info!(route = %self.route, "directory filter changed");
    }

    fn submit_review(&mut self) {
        let Screen::ReviewForm(s) = &mut self.screen else {
            return;
        };

        match s.view.composer.submit(&self.session) {
            Ok(payload) => {
                info!(dealer = payload.dealership, "posting review");
                self.fetcher.issue(s.view.key(), FetchRequest::AddReview(payload));
            }
            Err(e) => debug!(error = %e, "review not submitted"),
        }
    }

    fn handle_modal_key_event(&mut self, modal: Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::StateFilter => self.state_filter_dialog.handle_key_event(key),
            Modal::Help => self.help_dialog.handle_key_event(key),
        }
    }

    fn draw_title(&self, frame: &mut Frame, area: Rect) {
        let title = Line::from(vec![
            Span::styled(
                " Dealerships ",
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {}", self.route), Style::default().fg(Color::White)),
            Span::styled(format!("  {}", self.api_url), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(title), area);

        // Session is re-read on every frame; login happens outside this app
        let user = match self.session.display_name() {
            Some(name) => Span::styled(format!("● {} ", name), Style::default().fg(Color::Green)),
            None => Span::styled("Not signed in ", Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(Paragraph::new(Line::from(user)).alignment(Alignment::Right), area);
    }

    fn draw_help_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = Vec::new();
        if let Some(message) = &self.status_message {
            spans.push(Span::styled(
                format!(" {} ", message),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::raw(" │ "));
        }
        for (key, label) in self.screen.key_hints() {
            spans.push(Span::styled(format!(" {} ", key), Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!("{}  ", label)));
        }

        let help = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
        frame.render_widget(help, area);
    }
}

impl Component for App {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        self.status_message = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }
        if key.code == KeyCode::F(1) {
            return Ok(Some(Action::OpenHelp));
        }

        if let Some(modal) = self.modals.top() {
            return self.handle_modal_key_event(modal, key);
        }

        // The review form takes every printable key as text
        if let Screen::ReviewForm(s) = &mut self.screen {
            return s.handle_key_event(key);
        }

        match key.code {
            KeyCode::Char('q') => Ok(Some(Action::Quit)),
            KeyCode::Char('?') => Ok(Some(Action::OpenHelp)),
            _ => self.screen.component().handle_key_event(key),
        }
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                let mut follow_up = None;
                for msg in self.fetcher.poll() {
                    if let Some(action) = self.apply_message(&msg) {
                        follow_up.get_or_insert(action);
                    }
                }

                if let Screen::Dealer(s) = &mut self.screen {
                    s.can_post = self.session.is_authenticated();
                }
                self.screen.component().update(Action::Tick)?;
                return Ok(follow_up);
            }
            Action::Resize(w, h) => debug!(w, h, "resize"),
            Action::Quit => self.should_quit = true,

            // ─────────────────────────────────────────────────────────────────
            // Navigation
            // ─────────────────────────────────────────────────────────────────
            Action::Navigate(route) => self.navigate(route),
            Action::NextItem | Action::PrevItem => {
                return self.screen.component().update(action);
            }
            Action::Retry => self.retry(),

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenStateFilter => {
                if let Screen::Directory(s) = &self.screen {
                    self.state_filter_dialog
                        .set_states(s.view.known_states.clone(), s.view.filter());
                    self.modals.push(Modal::StateFilter);
                }
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.push(Modal::Help);
            }
            Action::CloseModal => {
                self.modals.pop();
            }
            Action::SetStateFilter(state) => self.apply_state_filter(Some(state)),
            Action::ClearStateFilter => self.apply_state_filter(None),

            // ─────────────────────────────────────────────────────────────────
            // Review Composer
            // ─────────────────────────────────────────────────────────────────
            Action::SubmitReview => self.submit_review(),
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let layout = calculate_screen_layout(area);
        self.draw_title(frame, layout.title);
        if let Err(e) = self.screen.component().draw(frame, layout.body) {
            warn!(error = %e, "screen draw failed");
        }
        self.draw_help_bar(frame, layout.help);

        match self.modals.top() {
            Some(Modal::StateFilter) => self.state_filter_dialog.draw(frame, area)?,
            Some(Modal::Help) => self.help_dialog.draw(frame, area)?,
            None => {}
        }
        Ok(())
    }
}
