use clap::Parser;

use ytmp3_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    ytmp3_lib::init_logging(cli.verbose);
    tracing::debug!("ytmp3 v{}", env!("CARGO_PKG_VERSION"));

    ytmp3_lib::run(cli).await
}
