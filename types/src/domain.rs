use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;
use validator::Validate;

use crate::error::AuthError;

/// The two calls the form controller makes against the authentication backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Signup,
    Login,
}

impl Operation {
    /// Path of the endpoint relative to the configured base URL.
    pub fn path(&self) -> String {
        format!("/{}", self.as_ref())
    }

    /// Reason shown when the backend rejects the request without an `error` field.
    pub fn fallback_error(&self) -> &'static str {
        match self {
            Operation::Signup => "Signup error",
            Operation::Login => "Login error",
        }
    }

    /// Reason shown when the request never produced a usable response.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Signup => "Signup failed. Please try again.",
            Operation::Login => "Login failed. Please try again.",
        }
    }
}

/// Which fields the signup form asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignupVariant {
    #[default]
    Full,
    Minimal,
}

impl SignupVariant {
    pub fn validation_message(&self) -> &'static str {
        match self {
            SignupVariant::Full => "Please fill out all the fields.",
            SignupVariant::Minimal => LOGIN_VALIDATION_MESSAGE,
        }
    }
}

impl FromStr for SignupVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(SignupVariant::Full),
            "minimal" => Ok(SignupVariant::Minimal),
            other => Err(format!("unknown signup variant {other:?}, expected full or minimal")),
        }
    }
}

const LOGIN_VALIDATION_MESSAGE: &str = "Please provide email and password.";

#[derive(Debug, Clone, PartialEq, Validate, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[validate(length(min = 1))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Validate, Deserialize, Serialize)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Raw values of the signup form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignupFields {
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub email: String,
    pub password: String,
}

impl SignupFields {
    /// Trims every field the variant uses and rejects the form if any of them is empty.
    pub fn into_request(self, variant: SignupVariant) -> Result<SignupRequest, AuthError> {
        let request = match variant {
            SignupVariant::Full => SignupRequest {
                first_name: Some(trimmed(self.first_name)),
                last_name: Some(trimmed(self.last_name)),
                dob: Some(trimmed(self.dob)),
                email: trimmed(self.email),
                password: trimmed(self.password),
            },
            SignupVariant::Minimal => SignupRequest {
                first_name: None,
                last_name: None,
                dob: None,
                email: trimmed(self.email),
                password: trimmed(self.password),
            },
        };
        request
            .validate()
            .map_err(|_| AuthError::Validation(variant.validation_message().to_string()))?;
        Ok(request)
    }
}

/// Raw values of the login form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginFields {
    pub email: String,
    pub password: String,
}

impl LoginFields {
    pub fn into_request(self) -> Result<LoginRequest, AuthError> {
        let request = LoginRequest {
            email: trimmed(self.email),
            password: trimmed(self.password),
        };
        request
            .validate()
            .map_err(|_| AuthError::Validation(LOGIN_VALIDATION_MESSAGE.to_string()))?;
        Ok(request)
    }
}

fn trimmed(value: String) -> String {
    value.trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SignupResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

/// Client-side belief that a login happened. Only used to adjust the UI;
/// the real session is whatever cookie the backend issued.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub logged_in: bool,
    pub email: String,
}
