use std::time::Duration;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use eyre::Result;
use tokio::net::TcpListener;

use client::client::AuthClient;
use client::config::ClientConfig;
use types::domain::{
    LoginRequest, LoginResponse, SignupFields, SignupRequest, SignupResponse, SignupVariant,
};
use types::error::AuthError;

use crate::stub::{serve, StubBackend};
use crate::util::{client_for, config_for, random_email};

fn signup_request(email: &str) -> SignupRequest {
    SignupFields {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        dob: "1815-12-10".to_string(),
        email: email.to_string(),
        password: "password".to_string(),
    }
    .into_request(SignupVariant::Full)
    .expect("valid signup fields")
}

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_signup_and_login() -> Result<()> {
    let addr = StubBackend::default().spawn().await?;
    let client = client_for(addr)?;
    let email = random_email();

    let response = client.signup(signup_request(&email)).await?;
    assert_eq!(response.message, "Signup successful");

    let response = client.login(login_request(&email, "password")).await?;
    assert_eq!(response.message, "Login successful");
    assert_eq!(response.redirect, None);
    Ok(())
}

#[tokio::test]
async fn test_login_carries_redirect() -> Result<()> {
    let addr = StubBackend::with_redirect("/dashboard").spawn().await?;
    let client = client_for(addr)?;
    let email = random_email();
    client.signup(signup_request(&email)).await?;

    let response = client.login(login_request(&email, "password")).await?;
    assert_eq!(response.redirect.as_deref(), Some("/dashboard"));
    Ok(())
}

#[tokio::test]
async fn test_minimal_signup_body_is_accepted() -> Result<()> {
    let addr = StubBackend::default().spawn().await?;
    let client = client_for(addr)?;
    let request = SignupFields {
        email: random_email(),
        password: "password".to_string(),
        ..Default::default()
    }
    .into_request(SignupVariant::Minimal)?;

    let response = client.signup(request).await?;
    assert_eq!(response.message, "Signup successful");
    Ok(())
}

#[tokio::test]
async fn test_duplicate_signup_surfaces_backend_error() -> Result<()> {
    let addr = StubBackend::default().spawn().await?;
    let client = client_for(addr)?;
    let email = random_email();
    client.signup(signup_request(&email)).await?;

    let error = client.signup(signup_request(&email)).await.unwrap_err();
    assert_eq!(
        error,
        AuthError::Api {
            status: 409,
            message: "User already exists".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_wrong_password_surfaces_backend_error() -> Result<()> {
    let addr = StubBackend::default().spawn().await?;
    let client = client_for(addr)?;
    let email = random_email();
    client.signup(signup_request(&email)).await?;

    let error = client
        .login(login_request(&email, "not the password"))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        AuthError::Api {
            status: 401,
            message: "Invalid credentials".to_string()
        }
    );

    let error = client
        .login(login_request(&random_email(), "password"))
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::Api { status: 401, .. }));
    Ok(())
}

#[tokio::test]
async fn test_error_without_error_field_uses_fallback() -> Result<()> {
    let router = Router::new().route(
        "/signup",
        post(|| async { (StatusCode::BAD_REQUEST, axum::Json(serde_json::json!({}))) }),
    );
    let addr = serve(router, "127.0.0.1:0").await?;

    let error = client_for(addr)?
        .signup(signup_request(&random_email()))
        .await
        .unwrap_err();
    assert_eq!(
        error,
        AuthError::Api {
            status: 400,
            message: "Signup error".to_string()
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_malformed() -> Result<()> {
    let router = Router::new()
        .route("/login", post(|| async { "Login successful" }))
        .route(
            "/signup",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
    let addr = serve(router, "127.0.0.1:0").await?;
    let client = client_for(addr)?;

    let error = client
        .login(login_request("a@b.com", "secret"))
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::MalformedResponse(_)));

    let error = client
        .signup(signup_request("a@b.com"))
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::MalformedResponse(_)));
    Ok(())
}

#[tokio::test]
async fn test_slow_backend_times_out() -> Result<()> {
    let router = Router::new().route(
        "/login",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let addr = serve(router, "127.0.0.1:0").await?;
    let client = AuthClient::new(&ClientConfig {
        timeout: Duration::from_millis(200),
        ..config_for(addr)
    })?;

    let error = client
        .login(login_request("a@b.com", "secret"))
        .await
        .unwrap_err();
    assert_eq!(error, AuthError::Transport("request timed out".to_string()));
    Ok(())
}

#[tokio::test]
async fn test_closed_port_is_transport_error() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);

    let error = client_for(addr)?
        .login(login_request("a@b.com", "secret"))
        .await
        .unwrap_err();
    assert!(matches!(error, AuthError::Transport(_)));
    Ok(())
}

/// Logs in against a route that sets a session cookie, then signs up against
/// one that echoes the `Cookie` header it received.
async fn cookie_after_login(include_credentials: bool) -> Result<Option<String>> {
    let router = Router::new()
        .route(
            "/login",
            post(|| async {
                (
                    [(SET_COOKIE, "session=abc; Path=/")],
                    Json(LoginResponse {
                        message: "Login successful".to_string(),
                        redirect: None,
                    }),
                )
            }),
        )
        .route(
            "/signup",
            post(|headers: HeaderMap| async move {
                let cookie = headers
                    .get(COOKIE)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or_default();
                Json(SignupResponse {
                    message: cookie.to_string(),
                })
            }),
        );
    let addr = serve(router, "127.0.0.1:0").await?;
    let client = AuthClient::new(&ClientConfig {
        include_credentials,
        ..config_for(addr)
    })?;

    client.login(login_request("a@b.com", "secret")).await?;
    let response = client.signup(signup_request("a@b.com")).await?;
    Ok(Some(response.message).filter(|cookie| !cookie.is_empty()))
}

#[tokio::test]
async fn test_session_cookie_sent_back_with_credentials() -> Result<()> {
    assert_eq!(
        cookie_after_login(true).await?.as_deref(),
        Some("session=abc")
    );
    Ok(())
}

#[tokio::test]
async fn test_session_cookie_dropped_without_credentials() -> Result<()> {
    assert_eq!(cookie_after_login(false).await?, None);
    Ok(())
}
