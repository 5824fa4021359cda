use std::borrow::Cow;
use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::prelude::{Color, Modifier, Span, Style};

use crate::auth::AuthScreenData;
use crate::controller::AuthController;
use crate::home::HomeScreenData;
use crate::session::KeyringSessionStore;
use crate::view::TerminalView;

pub type Controller = AuthController<TerminalView, KeyringSessionStore>;

pub enum ScreenChange {
    Quit,
    Switch(Screen),
    None,
}

#[derive(Debug)]
pub enum Screen {
    Auth(AuthScreenData),
    Home(HomeScreenData),
}

pub trait OnKeyEvent {
    fn on_key_event(&mut self, key: KeyEvent, controller: &Arc<Controller>) -> Result<ScreenChange>;
}

pub fn highlight<'a>(text: impl Into<Cow<'a, str>>, needed: bool) -> Span<'a> {
    if needed {
        Span::styled(text, Style::default().add_modifier(Modifier::REVERSED))
    } else {
        Span::styled(text, Style::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn style(self) -> Style {
        match self {
            Theme::Dark => Style::default().bg(Color::Black).fg(Color::White),
            Theme::Light => Style::default().bg(Color::White).fg(Color::Black),
        }
    }
}
