use log::debug;
use reqwest::Client as ReqwestClient;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use types::domain::{LoginRequest, LoginResponse, Operation, SignupRequest, SignupResponse};
use types::error::AuthError;

use crate::config::ClientConfig;

/// HTTP side of the auth forms: one JSON POST per submission, no retries.
#[cfg_attr(any(test, feature = "mock"), faux::create)]
pub struct AuthClient {
    client: ReqwestClient,
    base_url: String,
}

#[cfg_attr(any(test, feature = "mock"), faux::methods)]
impl AuthClient {
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let client = ReqwestClient::builder()
            .cookie_store(config.include_credentials)
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, AuthError> {
        post(&self.client, &self.base_url, Operation::Signup, &request).await
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        post(&self.client, &self.base_url, Operation::Login, &request).await
    }
}

async fn post<B: Serialize, R: DeserializeOwned>(
    client: &ReqwestClient,
    base_url: &str,
    operation: Operation,
    body: &B,
) -> Result<R, AuthError> {
    let url = format!("{}{}", base_url, operation.path());
    debug!("POST {}", url);
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(transport_error)?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport_error)?;
    debug!("{} answered {}", operation.as_ref(), status);
    if status.is_success() {
        serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedResponse(e.to_string()))
    } else {
        Err(api_error(operation, status, &bytes))
    }
}

/// Maps a rejected request to the backend's `error` field, or the per-operation
/// fallback when the body carries none.
fn api_error(operation: Operation, status: StatusCode, body: &[u8]) -> AuthError {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => AuthError::Api {
            status: status.as_u16(),
            message: value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or(operation.fallback_error())
                .to_string(),
        },
        Err(e) => AuthError::MalformedResponse(e.to_string()),
    }
}

fn transport_error(error: reqwest::Error) -> AuthError {
    if error.is_timeout() {
        AuthError::Transport("request timed out".to_string())
    } else {
        AuthError::Transport(error.to_string())
    }
}
