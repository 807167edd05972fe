use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use waf_rulesmith::cli;

#[derive(Parser)]
#[command(name = "waf-rulesmith")]
#[command(version = waf_rulesmith::VERSION)]
#[command(about = "Turn plain-language security intents into Cloudflare WAF rules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve(cli::serve::ServeArgs),

    /// Check an expression offline
    Validate(cli::validate::ValidateArgs),

    /// Turn a raw model reply into a rule offline
    Normalize(cli::normalize::NormalizeArgs),

    /// Configuration management
    Config(cli::config::ConfigArgs),

    /// Interactive chat with a running server
    Chat(cli::chat::ChatArgs),

    /// Manage firewall rules through a running server
    Rules(cli::rules::RulesArgs),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => cli::serve::run(args).await?,
        Commands::Validate(args) => {
            if !cli::validate::run(args)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Normalize(args) => cli::normalize::run(args)?,
        Commands::Config(args) => cli::config::run(args).await?,
        Commands::Chat(args) => cli::chat::run(args).await?,
        Commands::Rules(args) => cli::rules::run(args).await?,
    }

    Ok(ExitCode::SUCCESS)
}
