use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::info;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::prelude::{Line, StatefulWidget, Stylize, Widget};
use ratatui::widgets::{Block, Paragraph};
use types::domain::Session;

use crate::auth::AuthScreenData;
use crate::data::{Controller, OnKeyEvent, Screen, ScreenChange};
use crate::session::SessionStore;
use crate::view::{FormKind, View};

/// Where a login lands. Reads the session flag to decide what to greet with.
#[derive(Debug)]
pub struct HomeScreenData {
    destination: String,
    session: Option<Session>,
}

impl HomeScreenData {
    pub fn new(destination: String, session: Option<Session>) -> Self {
        Self {
            destination,
            session: session.filter(|session| session.logged_in),
        }
    }

    fn greeting(&self) -> String {
        match &self.session {
            Some(session) => format!("Signed in as {}", session.email),
            None => "Not signed in on this device".to_string(),
        }
    }
}

pub struct HomeWidget;

impl StatefulWidget for HomeWidget {
    type State = HomeScreenData;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [_, body, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [body] = Layout::horizontal([Constraint::Max(60)])
            .flex(Flex::Center)
            .areas(body);
        Paragraph::new(vec![
            Line::from(state.destination.as_str()).bold(),
            Line::from(state.greeting()),
        ])
        .centered()
        .block(
            Block::bordered()
                .title(Line::from("Home").centered())
                .title_bottom(Line::from("Press l to sign out, Esc to quit").centered()),
        )
        .render(body, buf);
    }
}

impl OnKeyEvent for HomeScreenData {
    fn on_key_event(&mut self, key: KeyEvent, controller: &Arc<Controller>) -> Result<ScreenChange> {
        let change = match (key.kind, key.modifiers, key.code) {
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Esc)
            | (KeyEventKind::Press, KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                ScreenChange::Quit
            }
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Char('l')) => {
                controller.session().clear()?;
                info!("local session flag cleared");
                controller
                    .view()
                    .show_form(FormKind::Login, FormKind::Login.toggle_label());
                ScreenChange::Switch(Screen::Auth(AuthScreenData::new(
                    controller.config().signup_variant,
                )))
            }
            _ => ScreenChange::None,
        };
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greets_remembered_email() {
        let home = HomeScreenData::new(
            "/dashboard".to_string(),
            Some(Session {
                logged_in: true,
                email: "a@b.com".to_string(),
            }),
        );
        assert_eq!(home.greeting(), "Signed in as a@b.com");
    }

    #[test]
    fn test_ignores_logged_out_session() {
        let home = HomeScreenData::new(
            "/dashboard".to_string(),
            Some(Session {
                logged_in: false,
                email: "a@b.com".to_string(),
            }),
        );
        assert_eq!(home.greeting(), "Not signed in on this device");
    }
}
