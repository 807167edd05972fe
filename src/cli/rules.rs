use anyhow::Result;
use clap::{Args, Subcommand};

use crate::client::{created_rule_id, NewRule, RulesmithClient};
use crate::rules::RuleAction;

#[derive(Args)]
pub struct RulesArgs {
    /// Base URL of a running server
    #[arg(short, long, global = true, default_value = "http://localhost:8787")]
    pub server: String,

    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// List firewall rules in a zone
    List {
        /// Zone id (server default when omitted)
        #[arg(short, long)]
        zone: Option<String>,
    },

    /// Create a firewall rule
    Apply {
        #[arg(short, long)]
        zone: String,

        #[arg(short, long)]
        expression: String,

        #[arg(short, long, default_value = "block")]
        action: String,

        #[arg(short, long, default_value = "WAF rule")]
        description: String,

        /// Create the rule paused
        #[arg(long)]
        disabled: bool,
    },

    /// Delete a firewall rule
    Delete {
        rule_id: String,

        #[arg(short, long)]
        zone: Option<String>,
    },
}

pub async fn run(args: RulesArgs) -> Result<()> {
    crate::logging::init_cli_logging(false)?;
    let client = RulesmithClient::new(&args.server);

    match args.command {
        RulesCommand::List { zone } => {
            let reply = client.list_rules(zone.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }

        RulesCommand::Apply {
            zone,
            expression,
            action,
            description,
            disabled,
        } => {
            let rule = NewRule {
                zone_id: zone.clone(),
                expression,
                action: RuleAction::from(action),
                description,
                enabled: !disabled,
            };
            let reply = client.create_rule(&rule).await?;
            println!(
                "[OK] Rule applied to zone {}. Rule ID: {}",
                zone,
                created_rule_id(&reply).unwrap_or("N/A")
            );
        }

        RulesCommand::Delete { rule_id, zone } => {
            let reply = client.delete_rule(&rule_id, zone.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&reply)?);
        }
    }

    Ok(())
}
