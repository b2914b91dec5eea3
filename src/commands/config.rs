use std::path::Path;

use crate::cli::ConfigArgs;
use crate::models::settings::AppSettings;
use crate::storage::config;

pub fn run(args: ConfigArgs, settings: &AppSettings, path: &Path) -> anyhow::Result<()> {
    if args.init {
        config::save_settings(path, settings)?;
        tracing::info!("Settings written to {}", path.display());
    }
    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
