use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::{Config, Server};

#[derive(Args)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "rulesmith.toml")]
    pub config: PathBuf,

    /// Override the listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = Config::from_file(&args.config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    crate::logging::init_logging(&config.logging.level, &config.logging.format)?;

    info!("Starting waf-rulesmith v{}", crate::VERSION);
    info!("Loaded configuration from: {}", args.config.display());

    for warning in config.validate()? {
        warn!("{}", warning);
    }

    let server = Server::new(config).await?;
    server.serve().await
}
