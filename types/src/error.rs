use thiserror::Error;

use crate::domain::Operation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Request could not complete: {0}")]
    Transport(String),
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Response body is not valid JSON: {0}")]
    MalformedResponse(String),
}

impl AuthError {
    /// Text shown to the user when `operation` fails with this error.
    pub fn notification(&self, operation: Operation) -> String {
        match self {
            AuthError::Validation(message) => message.clone(),
            AuthError::Api { message, .. } => message.clone(),
            AuthError::Transport(_) | AuthError::MalformedResponse(_) => {
                operation.failure_message().to_string()
            }
        }
    }
}
