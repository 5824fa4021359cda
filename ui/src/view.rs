use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};

const NOTICE_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormKind {
    #[default]
    Signup,
    Login,
}

impl FormKind {
    pub fn other(self) -> Self {
        match self {
            FormKind::Signup => FormKind::Login,
            FormKind::Login => FormKind::Signup,
        }
    }

    /// Label of the toggle link while this form is visible; it offers the other one.
    pub fn toggle_label(self) -> &'static str {
        match self {
            FormKind::Login => "Don't have an account? Sign Up",
            FormKind::Signup => "Already have an account? Log In",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::Signup => "Sign Up",
            FormKind::Login => "Log In",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

/// Everything the form controller is allowed to do to the screen.
pub trait View: Send + Sync {
    fn notify(&self, notification: Notification);
    fn visible_form(&self) -> FormKind;
    fn show_form(&self, form: FormKind, toggle_label: &str);
    fn navigate(&self, destination: &str);
    /// Disables or re-enables the submit control of `form`.
    fn set_submitting(&self, form: FormKind, submitting: bool);
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub notification: Notification,
    expiry_time: DateTime<Utc>,
}

impl Notice {
    fn is_expired(&self) -> bool {
        Utc::now() > self.expiry_time
    }
}

impl From<Notification> for Notice {
    fn from(notification: Notification) -> Self {
        Self {
            notification,
            expiry_time: Utc::now() + NOTICE_LIFETIME,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub visible_form: FormKind,
    pub toggle_label: String,
    pub notice: Option<Notice>,
    pub destination: Option<String>,
    pub signup_submitting: bool,
    pub login_submitting: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        let visible_form = FormKind::default();
        Self {
            visible_form,
            toggle_label: visible_form.toggle_label().to_string(),
            notice: None,
            destination: None,
            signup_submitting: false,
            login_submitting: false,
        }
    }
}

impl ViewState {
    pub fn is_submitting(&self, form: FormKind) -> bool {
        match form {
            FormKind::Signup => self.signup_submitting,
            FormKind::Login => self.login_submitting,
        }
    }
}

/// View backed by shared state that the render loop reads every frame.
/// Submissions run on spawned tasks and write into it from there.
#[derive(Debug, Clone, Default)]
pub struct TerminalView {
    state: Arc<RwLock<ViewState>>,
}

impl TerminalView {
    fn read(&self) -> RwLockReadGuard<'_, ViewState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ViewState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state with expired notices dropped.
    pub fn snapshot(&self) -> ViewState {
        let mut state = self.write();
        if state.notice.as_ref().is_some_and(Notice::is_expired) {
            state.notice = None;
        }
        state.clone()
    }

    /// Pending navigation, consumed by the app loop.
    pub fn take_destination(&self) -> Option<String> {
        self.write().destination.take()
    }
}

impl View for TerminalView {
    fn notify(&self, notification: Notification) {
        self.write().notice = Some(notification.into());
    }

    fn visible_form(&self) -> FormKind {
        self.read().visible_form
    }

    fn show_form(&self, form: FormKind, toggle_label: &str) {
        let mut state = self.write();
        state.visible_form = form;
        state.toggle_label = toggle_label.to_string();
    }

    fn navigate(&self, destination: &str) {
        self.write().destination = Some(destination.to_string());
    }

    fn set_submitting(&self, form: FormKind, submitting: bool) {
        let mut state = self.write();
        match form {
            FormKind::Signup => state.signup_submitting = submitting,
            FormKind::Login => state.login_submitting = submitting,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_signup_form() {
        let state = TerminalView::default().snapshot();
        assert_eq!(state.visible_form, FormKind::Signup);
        assert_eq!(state.toggle_label, "Already have an account? Log In");
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_destination_is_taken_once() {
        let view = TerminalView::default();
        view.navigate("/dashboard");
        assert_eq!(view.take_destination().as_deref(), Some("/dashboard"));
        assert_eq!(view.take_destination(), None);
    }

    #[test]
    fn test_clones_share_state() {
        let view = TerminalView::default();
        let handle = view.clone();
        handle.notify(Notification::error("Login error"));
        handle.set_submitting(FormKind::Login, true);

        let state = view.snapshot();
        assert_eq!(
            state.notice.as_ref().map(|notice| notice.notification.clone()),
            Some(Notification::error("Login error"))
        );
        assert!(state.is_submitting(FormKind::Login));
        assert!(!state.is_submitting(FormKind::Signup));
    }
}
