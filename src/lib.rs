use tracing::Level;
use ytmp3_core::fs_paths::{AppPaths, DesktopPaths};

pub mod cli;
pub mod commands;
pub mod core;
pub mod models;
pub mod platforms;
pub mod storage;

use cli::{Cli, Command};

pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings_path = cli.config.unwrap_or_else(|| DesktopPaths.config_file());
    let settings = storage::config::load_settings(&settings_path);
    crate::core::http_client::init_proxy(settings.proxy.clone());

    match cli.command {
        Command::Get(args) => commands::get::run(args, &settings).await,
        Command::Quick(args) => commands::quick::run(args, &settings).await,
        Command::Shell(args) => commands::shell::run(args, &settings).await,
        Command::Search(args) => commands::search::run(args, &settings).await,
        Command::Check => commands::dependencies::run().await,
        Command::Config(args) => commands::config::run(args, &settings, &settings_path),
    }
}
