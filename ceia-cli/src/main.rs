use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use ceia_sdk::{Ceia, CeiaHttpClient, FileStore};
use clap::Parser;

mod commands;
mod config;
mod logging;

use commands::Command;
use config::ConfigToml;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults to `<config dir>/ceia/config.toml`.
    #[arg(short, long, env = "CEIA_CONFIG")]
    config: Option<PathBuf>,

    /// Base log level, overriding `logging.level`.
    #[arg(short, long)]
    level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::SampleConfig = cli.command {
        println!("{}", ConfigToml::sample_string());
        return Ok(());
    }

    let config = ConfigToml::load(cli.config.as_deref())?;
    logging::init_tracing_logs_with_config_if_set(config.logging.as_ref(), cli.level.as_deref())?;

    let client = CeiaHttpClient::builder()
        .base_url(config.api.base_url.as_str())?
        .request_timeout(config.request_timeout())
        .user_agent_extra(concat!("ceia-cli/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let storage_path = config.storage_path()?;
    tracing::debug!(
        "Using {} with storage at {}",
        config.api.base_url,
        storage_path.display()
    );
    let storage = Arc::new(FileStore::new(storage_path));
    let ceia = Ceia::new(client, storage, config.secret_key()?);

    commands::run(&ceia, cli.command).await
}
