mod app;
mod auth;
mod config;
mod controller;
mod data;
mod home;
mod session;
mod view;

use cli_log::*;

use crate::app::App;
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    init_cli_log!("authform");
    color_eyre::install()?;
    let config = AppConfig::from_env()?;
    info!("authentication backend at {}", config.client.base_url);
    let app = App::new(config)?;
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}
