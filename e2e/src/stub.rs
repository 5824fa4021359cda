use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Extension, Json, Router};
use bcrypt::{hash, verify};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use eyre::Result;
use log::{error, info};
use serde_json::json;
use tap::TapFallible;
use tokio::net::TcpListener;
use uuid::Uuid;

use types::domain::{LoginRequest, LoginResponse, SignupRequest, SignupResponse};

// low cost keeps the test suite fast; this backend never sees real passwords
const HASH_COST: u32 = 4;

/// In-memory stand-in for the authentication backend the forms talk to.
#[derive(Clone, Default)]
pub struct StubBackend {
    users: Arc<DashMap<String, String>>,
    redirect: Option<String>,
}

impl StubBackend {
    /// Backend whose successful logins name `redirect` as the next page.
    pub fn with_redirect(redirect: impl Into<String>) -> Self {
        Self {
            redirect: Some(redirect.into()),
            ..Default::default()
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route("/signup", post(signup))
            .route("/login", post(login))
            .layer(Extension(self))
    }

    /// Serves the backend on an ephemeral local port.
    pub async fn spawn(self) -> Result<SocketAddr> {
        serve(self.router(), "127.0.0.1:0").await
    }
}

/// Binds `addr` and serves `router` on a background task.
pub async fn serve(router: Router, addr: &str) -> Result<SocketAddr> {
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router)
            .await
            .tap_err(|e| error!("stub backend stopped: {}", e));
    });
    info!("stub backend listening on {}", local_addr);
    Ok(local_addr)
}

fn error_response(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

async fn signup(
    Extension(backend): Extension<StubBackend>,
    Json(payload): Json<SignupRequest>,
) -> Response {
    match backend.users.entry(payload.email) {
        Entry::Occupied(entry) => {
            info!("signup rejected, {} exists", entry.key());
            error_response(StatusCode::CONFLICT, "User already exists")
        }
        Entry::Vacant(entry) => match hash(payload.password, HASH_COST) {
            Ok(hashed_password) => {
                info!("signed up {}", entry.key());
                entry.insert(hashed_password);
                Json(SignupResponse {
                    message: "Signup successful".to_string(),
                })
                .into_response()
            }
            Err(e) => {
                error!("failed to hash password: {}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Signup failed")
            }
        },
    }
}

async fn login(
    Extension(backend): Extension<StubBackend>,
    Json(payload): Json<LoginRequest>,
) -> Response {
    let verified = backend
        .users
        .get(&payload.email)
        .map(|hashed_password| verify(&payload.password, hashed_password.value()))
        .transpose()
        .tap_err(|e| error!("failed to verify password: {}", e));
    if !matches!(verified, Ok(Some(true))) {
        return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
    }

    info!("logged in {}", payload.email);
    let cookie = format!("session={}; HttpOnly; Path=/", Uuid::new_v4());
    (
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            message: "Login successful".to_string(),
            redirect: backend.redirect.clone(),
        }),
    )
        .into_response()
}
