use std::sync::atomic::{AtomicBool, Ordering};

use client::client::AuthClient;
use log::{debug, info, warn};
use types::domain::{LoginFields, Operation, SignupFields};
use types::error::AuthError;

use crate::config::FormConfig;
use crate::session::SessionStore;
use crate::view::{FormKind, Notification, View};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    SignedUp,
    LoggedIn { destination: String },
    /// The same form already has a request in flight; nothing was sent.
    AlreadySubmitting,
}

/// Mediates between the signup/login forms and the authentication backend.
///
/// Every submission that gets past the in-flight check ends in exactly one
/// notification on the view. Failures are terminal for the attempt and are
/// returned after being shown.
pub struct AuthController<V, S> {
    client: AuthClient,
    view: V,
    session: S,
    config: FormConfig,
    signup_in_flight: AtomicBool,
    login_in_flight: AtomicBool,
}

impl<V: View, S: SessionStore> AuthController<V, S> {
    pub fn new(client: AuthClient, view: V, session: S, config: FormConfig) -> Self {
        Self {
            client,
            view,
            session,
            config,
            signup_in_flight: AtomicBool::new(false),
            login_in_flight: AtomicBool::new(false),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub async fn submit_signup(&self, fields: SignupFields) -> Result<Submission, AuthError> {
        let operation = Operation::Signup;
        let request = fields
            .into_request(self.config.signup_variant)
            .map_err(|e| self.fail(operation, e))?;
        let Some(_guard) = SubmitGuard::acquire(&self.signup_in_flight, &self.view, FormKind::Signup)
        else {
            debug!("signup already in flight, ignoring submission");
            return Ok(Submission::AlreadySubmitting);
        };

        let response = self
            .client
            .signup(request)
            .await
            .map_err(|e| self.fail(operation, e))?;
        info!("signup accepted");
        self.view.notify(Notification::info(response.message));
        self.view
            .show_form(FormKind::Login, FormKind::Login.toggle_label());
        Ok(Submission::SignedUp)
    }

    pub async fn submit_login(&self, fields: LoginFields) -> Result<Submission, AuthError> {
        let operation = Operation::Login;
        let request = fields.into_request().map_err(|e| self.fail(operation, e))?;
        let Some(_guard) = SubmitGuard::acquire(&self.login_in_flight, &self.view, FormKind::Login)
        else {
            debug!("login already in flight, ignoring submission");
            return Ok(Submission::AlreadySubmitting);
        };

        let email = request.email.clone();
        let response = self
            .client
            .login(request)
            .await
            .map_err(|e| self.fail(operation, e))?;
        info!("login accepted");
        self.view.notify(Notification::info(response.message));
        if self.config.remember_session {
            if let Err(e) = self.session.record_login(&email) {
                warn!("could not record session flag: {}", e);
            }
        }
        let destination = response
            .redirect
            .filter(|redirect| !redirect.is_empty())
            .unwrap_or_else(|| self.config.default_destination.clone());
        self.view.navigate(&destination);
        Ok(Submission::LoggedIn { destination })
    }

    /// Shows whichever form is hidden and relabels the toggle link. Returns the
    /// form now visible.
    pub fn toggle_form_view(&self) -> FormKind {
        let next = self.view.visible_form().other();
        self.view.show_form(next, next.toggle_label());
        next
    }

    fn fail(&self, operation: Operation, error: AuthError) -> AuthError {
        debug!("{} failed: {}", operation.as_ref(), error);
        self.view
            .notify(Notification::error(error.notification(operation)));
        error
    }
}

/// Holds a form in `Submitting`; dropping it returns the form to `Idle`,
/// including when the submission future is dropped mid-request.
struct SubmitGuard<'a, V: View> {
    in_flight: &'a AtomicBool,
    view: &'a V,
    form: FormKind,
}

impl<'a, V: View> SubmitGuard<'a, V> {
    fn acquire(in_flight: &'a AtomicBool, view: &'a V, form: FormKind) -> Option<Self> {
        in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        view.set_submitting(form, true);
        Some(Self {
            in_flight,
            view,
            form,
        })
    }
}

impl<V: View> Drop for SubmitGuard<'_, V> {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
        self.view.set_submitting(self.form, false);
    }
}
