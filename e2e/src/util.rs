use std::net::SocketAddr;
use std::time::Duration;

use rand::distr::Alphanumeric;
use rand::{rng, Rng};

use client::client::AuthClient;
use client::config::ClientConfig;
use types::error::AuthError;

pub fn random_email() -> String {
    let random_string: String = rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    format!("{}@gmail.com", random_string)
}

pub fn config_for(addr: SocketAddr) -> ClientConfig {
    ClientConfig {
        timeout: Duration::from_secs(5),
        ..ClientConfig::new(format!("http://{}", addr))
    }
}

pub fn client_for(addr: SocketAddr) -> Result<AuthClient, AuthError> {
    AuthClient::new(&config_for(addr))
}
