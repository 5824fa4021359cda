use e2e::stub::{serve, StubBackend};
use log::info;

/// Runs the stub backend for trying the terminal forms by hand:
/// `STUB_ADDR=127.0.0.1:5000 cargo run -p e2e --bin stub-backend`.
#[tokio::main]
async fn main() -> eyre::Result<()> {
    env_logger::init();
    let addr = std::env::var("STUB_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string());
    let backend = match std::env::var("STUB_REDIRECT") {
        Ok(redirect) => StubBackend::with_redirect(redirect),
        Err(_) => StubBackend::default(),
    };
    let local_addr = serve(backend.router(), &addr).await?;
    info!("serving /signup and /login on {}", local_addr);
    tokio::signal::ctrl_c().await?;
    Ok(())
}
