use std::sync::Arc;

use color_eyre::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::debug;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};
use ratatui::prelude::{Masked, Modifier, Span, StatefulWidget, Style, Stylize, Widget};
use ratatui::widgets::{Block, Paragraph};
use tui_input::backend::crossterm::EventHandler;
use tui_input::Input;
use types::domain::{LoginFields, SignupFields, SignupVariant};

use crate::data::{highlight, Controller, OnKeyEvent, ScreenChange};
use crate::view::{FormKind, View, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    Dob,
    Email,
    Password,
}

impl Field {
    fn title(self) -> &'static str {
        match self {
            Field::FirstName => "First name",
            Field::LastName => "Last name",
            Field::Dob => "Date of birth",
            Field::Email => "Email",
            Field::Password => "Password",
        }
    }
}

const FULL_SIGNUP_FIELDS: [Field; 5] = [
    Field::FirstName,
    Field::LastName,
    Field::Dob,
    Field::Email,
    Field::Password,
];
const CREDENTIAL_FIELDS: [Field; 2] = [Field::Email, Field::Password];

#[derive(Debug)]
struct FormInputs {
    inputs: Vec<(Field, Input)>,
}

impl FormInputs {
    fn new(fields: &[Field]) -> Self {
        Self {
            inputs: fields
                .iter()
                .map(|field| (*field, Input::default()))
                .collect(),
        }
    }

    fn len(&self) -> usize {
        self.inputs.len()
    }

    fn value(&self, field: Field) -> String {
        self.inputs
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, input)| input.value().to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFocus {
    Field(usize),
    Submit,
    Toggle,
}

/// State of the auth screen: both forms keep their input while hidden.
#[derive(Debug)]
pub struct AuthScreenData {
    signup: FormInputs,
    login: FormInputs,
    focus: AuthFocus,
    pub(crate) cursor_position: Option<Position>,
}

impl AuthScreenData {
    pub fn new(variant: SignupVariant) -> Self {
        let signup_fields: &[Field] = match variant {
            SignupVariant::Full => &FULL_SIGNUP_FIELDS,
            SignupVariant::Minimal => &CREDENTIAL_FIELDS,
        };
        Self {
            signup: FormInputs::new(signup_fields),
            login: FormInputs::new(&CREDENTIAL_FIELDS),
            focus: AuthFocus::Field(0),
            cursor_position: None,
        }
    }

    fn form(&self, kind: FormKind) -> &FormInputs {
        match kind {
            FormKind::Signup => &self.signup,
            FormKind::Login => &self.login,
        }
    }

    fn form_mut(&mut self, kind: FormKind) -> &mut FormInputs {
        match kind {
            FormKind::Signup => &mut self.signup,
            FormKind::Login => &mut self.login,
        }
    }

    fn switch_focus(&mut self, field_count: usize) {
        self.focus = match self.focus {
            AuthFocus::Field(index) if index + 1 < field_count => AuthFocus::Field(index + 1),
            AuthFocus::Field(_) => AuthFocus::Submit,
            AuthFocus::Submit => AuthFocus::Toggle,
            AuthFocus::Toggle => AuthFocus::Field(0),
        };
    }

    fn handle_input_event(&mut self, visible: FormKind, key: KeyEvent) {
        if let AuthFocus::Field(index) = self.focus {
            if let Some((_, input)) = self.form_mut(visible).inputs.get_mut(index) {
                input.handle_event(&Event::Key(key));
            }
        }
    }

    fn handle_enter(&mut self, controller: &Arc<Controller>) {
        let view = controller.view().snapshot();
        let visible = view.visible_form;
        match self.focus {
            AuthFocus::Submit if view.is_submitting(visible) => {
                debug!("{} form is submitting, enter ignored", visible.title());
            }
            AuthFocus::Submit => self.submit(visible, controller),
            AuthFocus::Toggle => {
                controller.toggle_form_view();
                self.focus = AuthFocus::Field(0);
            }
            AuthFocus::Field(_) => self.switch_focus(self.form(visible).len()),
        }
    }

    /// Runs the submission on its own task so the screen keeps drawing while
    /// the request is in flight. The controller reports the outcome on the view.
    fn submit(&self, form: FormKind, controller: &Arc<Controller>) {
        let controller = Arc::clone(controller);
        match form {
            FormKind::Signup => {
                let fields = self.signup_fields();
                tokio::spawn(async move {
                    if let Err(e) = controller.submit_signup(fields).await {
                        debug!("signup ended with {}", e);
                    }
                });
            }
            FormKind::Login => {
                let fields = self.login_fields();
                tokio::spawn(async move {
                    if let Err(e) = controller.submit_login(fields).await {
                        debug!("login ended with {}", e);
                    }
                });
            }
        }
    }

    fn signup_fields(&self) -> SignupFields {
        SignupFields {
            first_name: self.signup.value(Field::FirstName),
            last_name: self.signup.value(Field::LastName),
            dob: self.signup.value(Field::Dob),
            email: self.signup.value(Field::Email),
            password: self.signup.value(Field::Password),
        }
    }

    fn login_fields(&self) -> LoginFields {
        LoginFields {
            email: self.login.value(Field::Email),
            password: self.login.value(Field::Password),
        }
    }
}

pub struct AuthScreenWidget<'a> {
    pub view: &'a ViewState,
}

impl StatefulWidget for AuthScreenWidget<'_> {
    type State = AuthScreenData;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let visible = self.view.visible_form;
        let form = state.form(visible);
        let field_count = form.len();

        let height = 1 + 3 * field_count as u16 + 3 + 1 + 1;
        let [_, all, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .areas(area);
        let [all] = Layout::horizontal([Constraint::Max(50)])
            .flex(Flex::Center)
            .areas(all);

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(std::iter::repeat(Constraint::Length(3)).take(field_count));
        constraints.extend([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ]);
        let areas = Layout::vertical(constraints).split(all);

        Paragraph::new(visible.title())
            .bold()
            .centered()
            .render(areas[0], buf);

        let mut cursor_position = None;
        for (index, (field, input)) in form.inputs.iter().enumerate() {
            let field_area = areas[index + 1];
            let text = if *field == Field::Password {
                Span::styled(Masked::new(input.value(), '*'), Style::default())
            } else {
                Span::raw(input.value())
            };
            // two columns for the borders, one for the cursor
            let width = field_area.width.max(3) - 3;
            let scroll = input.visual_scroll(width as usize);
            let mut block = Block::bordered().title(field.title());
            if state.focus == AuthFocus::Field(index) {
                block = block.border_style(Style::default().add_modifier(Modifier::BOLD));
                cursor_position = Some(Position::new(
                    field_area.x + (input.visual_cursor().max(scroll) - scroll) as u16 + 1,
                    field_area.y + 1,
                ));
            }
            Paragraph::new(text)
                .scroll((0, scroll as u16))
                .block(block)
                .render(field_area, buf);
        }

        let [submit_area, toggle_area, instructions_area] =
            [field_count + 1, field_count + 2, field_count + 3].map(|index| areas[index]);
        let submit_label = if self.view.is_submitting(visible) {
            "Submitting..."
        } else {
            visible.title()
        };
        Paragraph::new(highlight(submit_label, state.focus == AuthFocus::Submit))
            .centered()
            .block(Block::bordered())
            .render(submit_area, buf);
        Paragraph::new(
            highlight(
                self.view.toggle_label.as_str(),
                state.focus == AuthFocus::Toggle,
            )
            .underlined(),
        )
        .centered()
        .render(toggle_area, buf);
        Paragraph::new("Tab to switch focus, Ctrl+T for theme, Esc to quit")
            .style(Style::default().add_modifier(Modifier::ITALIC))
            .centered()
            .render(instructions_area, buf);

        state.cursor_position = cursor_position;
    }
}

impl OnKeyEvent for AuthScreenData {
    fn on_key_event(&mut self, key: KeyEvent, controller: &Arc<Controller>) -> Result<ScreenChange> {
        let visible = controller.view().visible_form();
        match (key.kind, key.modifiers, key.code) {
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Esc)
            | (KeyEventKind::Press, KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                return Ok(ScreenChange::Quit)
            }
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Tab) => {
                self.switch_focus(self.form(visible).len());
            }
            (KeyEventKind::Press, KeyModifiers::NONE, KeyCode::Enter) => {
                self.handle_enter(controller);
            }
            _ => self.handle_input_event(visible, key),
        }
        Ok(ScreenChange::None)
    }
}
