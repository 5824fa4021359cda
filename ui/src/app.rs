use std::sync::Arc;
use std::time::Duration;

use client::client::AuthClient;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};
use ratatui::{DefaultTerminal, Frame};

use crate::auth::{AuthScreenData, AuthScreenWidget};
use crate::config::AppConfig;
use crate::controller::AuthController;
use crate::data::{Controller, OnKeyEvent, Screen, ScreenChange, Theme};
use crate::home::{HomeScreenData, HomeWidget};
use crate::session::{KeyringSessionStore, SessionStore};
use crate::view::{Notification, NotificationKind, TerminalView, View};

pub struct App {
    /// Is the application running?
    running: bool,
    screen: Screen,
    controller: Arc<Controller>,
    theme: Theme,
}

impl App {
    /// Construct a new instance of [`App`]. Opens on the home screen when the
    /// keyring already holds a session flag.
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = AuthClient::new(&config.client)?;
        let session = KeyringSessionStore::new()?;
        let screen = match session.load() {
            Ok(Some(session)) if session.logged_in => {
                info!("found session flag for {}", session.email);
                Screen::Home(HomeScreenData::new(
                    config.form.default_destination.clone(),
                    Some(session),
                ))
            }
            Ok(_) => Screen::Auth(AuthScreenData::new(config.form.signup_variant)),
            Err(e) => {
                warn!("could not read session flag: {}", e);
                Screen::Auth(AuthScreenData::new(config.form.signup_variant))
            }
        };
        let controller = Arc::new(AuthController::new(
            client,
            TerminalView::default(),
            session,
            config.form,
        ));
        Ok(Self {
            running: true,
            screen,
            controller,
            theme: Theme::default(),
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while self.running {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_crossterm_events()?;
            self.follow_navigation();
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let view = self.controller.view().snapshot();
        frame.render_widget(Block::default().style(self.theme.style()), frame.area());

        let cursor_position = match &mut self.screen {
            Screen::Auth(data) => {
                frame.render_stateful_widget(AuthScreenWidget { view: &view }, frame.area(), data);
                data.cursor_position
            }
            Screen::Home(data) => {
                frame.render_stateful_widget(HomeWidget, frame.area(), data);
                None
            }
        };
        if let Some(position) = cursor_position {
            frame.set_cursor_position(position);
        }

        if let Some(notice) = view.notice {
            let [_, popup_area] =
                Layout::vertical([Constraint::Fill(1), Constraint::Length(5)]).areas(frame.area());
            let [_, popup_area, _] =
                Layout::horizontal(Constraint::from_ratios([(1, 4), (1, 2), (1, 4)]))
                    .areas(popup_area);
            frame.render_widget(
                NotificationPopup {
                    notification: notice.notification,
                },
                popup_area,
            );
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    fn handle_crossterm_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key_event) = event::read()? {
                if let Err(e) = self.on_key_event(key_event) {
                    self.controller
                        .view()
                        .notify(Notification::error(e.to_string()));
                }
            }
        }
        Ok(())
    }

    fn on_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if let (KeyEventKind::Press, KeyModifiers::CONTROL, KeyCode::Char('t')) =
            (key.kind, key.modifiers, key.code)
        {
            self.theme = self.theme.toggled();
            return Ok(());
        }
        let change = match &mut self.screen {
            Screen::Auth(data) => data.on_key_event(key, &self.controller)?,
            Screen::Home(data) => data.on_key_event(key, &self.controller)?,
        };
        match change {
            ScreenChange::Quit => self.quit(),
            ScreenChange::Switch(screen) => self.screen = screen,
            ScreenChange::None => {}
        }
        Ok(())
    }

    /// Switches to the home screen once a login has asked to navigate.
    fn follow_navigation(&mut self) {
        if let Some(destination) = self.controller.view().take_destination() {
            info!("navigating to {}", destination);
            let session = self.controller.session().load().unwrap_or_else(|e| {
                warn!("could not read session flag: {}", e);
                None
            });
            self.screen = Screen::Home(HomeScreenData::new(destination, session));
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

pub struct NotificationPopup {
    notification: Notification,
}

impl Widget for NotificationPopup {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let (title, color) = match self.notification.kind {
            NotificationKind::Info => ("Notice", Color::Green),
            NotificationKind::Error => ("Error occurred", Color::Red),
        };
        Clear.render(area, buf);
        Paragraph::new(self.notification.text)
            .block(Block::bordered().title(title).style(Style::default().fg(color)))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
