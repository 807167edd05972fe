use anyhow::Result;
use clap::Args;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::client::{created_rule_id, ChatSession, NewRule, RulesmithClient};
use crate::rules::Rule;

#[derive(Args)]
pub struct ChatArgs {
    /// Base URL of a running server
    #[arg(short, long, default_value = "http://localhost:8787")]
    pub server: String,

    /// Continue an existing session
    #[arg(long)]
    pub session: Option<String>,

    /// Zone used by /apply when none is given
    #[arg(short, long)]
    pub zone: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

enum Input {
    Message(String),
    Validate,
    Apply(Option<String>),
    History,
    Help,
    Quit,
    Empty,
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }

    let mut parts = line.splitn(2, char::is_whitespace);
    match parts.next() {
        Some("/quit") | Some("/exit") => Input::Quit,
        Some("/validate") => Input::Validate,
        Some("/history") => Input::History,
        Some("/help") => Input::Help,
        Some("/apply") => Input::Apply(
            parts.next().map(str::trim).filter(|z| !z.is_empty()).map(str::to_string),
        ),
        _ => Input::Message(line.to_string()),
    }
}

const HELP: &str = "\
Describe what to protect in plain language, for example:
  block requests to /admin from outside Canada

Commands:
  /validate       check the last generated expression
  /apply [zone]   create the last rule in a Cloudflare zone
  /history        show this conversation
  /quit           leave";

pub async fn run(args: ChatArgs) -> Result<()> {
    crate::logging::init_cli_logging(args.verbose)?;

    let client = RulesmithClient::new(&args.server);
    let mut session = match args.session {
        Some(id) => ChatSession::resume(id),
        None => ChatSession::new(),
    };

    println!("WAF Rulesmith chat against {} (type /help)", client.base_url());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::History => {
                for entry in &session.history {
                    println!("{}: {}", entry.role, entry.content);
                }
                if let Some(id) = &session.session_id {
                    println!("(session {})", id);
                }
            }
            Input::Message(message) => match client.chat(&mut session, &message).await {
                Ok(response) => {
                    println!("\n{}\n", response.message);
                    print_rule(&response.rule);
                }
                Err(e) => println!("Error: {}", e),
            },
            Input::Validate => {
                let Some(rule) = &session.last_rule else {
                    println!("No rule generated yet");
                    continue;
                };
                match client.preview(&rule.expression).await {
                    Ok(result) if result.valid => {
                        if result.warnings.is_empty() {
                            println!("[OK] Expression is valid");
                        } else {
                            println!("[OK] Expression is valid. Warnings: {}", result.warnings.join(", "));
                        }
                    }
                    Ok(result) => println!("[X] Validation failed: {}", result.errors.join(", ")),
                    Err(e) => println!("Error: {}", e),
                }
            }
            Input::Apply(zone) => {
                let Some(rule) = &session.last_rule else {
                    println!("No rule generated yet");
                    continue;
                };
                let Some(zone_id) = zone.or_else(|| args.zone.clone()) else {
                    println!("Please provide a Cloudflare Zone ID: /apply <zone_id>");
                    continue;
                };

                let new_rule = NewRule {
                    zone_id: zone_id.clone(),
                    expression: rule.expression.clone(),
                    action: rule.action.effective(),
                    description: rule.description.clone(),
                    enabled: true,
                };
                match client.create_rule(&new_rule).await {
                    Ok(reply) => println!(
                        "[OK] Rule applied to zone {}. Rule ID: {}",
                        zone_id,
                        created_rule_id(&reply).unwrap_or("N/A")
                    ),
                    Err(e) => println!("Failed: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn print_rule(rule: &Rule) {
    let title = if rule.description.is_empty() {
        "Generated WAF Rule"
    } else {
        rule.description.as_str()
    };
    println!("== {} [{}]", title, rule.action);
    if !rule.action.is_recognized() {
        println!("   (unrecognized action, /apply will use '{}')", rule.action.effective());
    }
    println!("   {}", rule.expression);
    println!("   confidence: {}", rule.confidence);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input() {
        assert!(matches!(parse_input("   "), Input::Empty));
        assert!(matches!(parse_input("/quit"), Input::Quit));
        assert!(matches!(parse_input("/validate"), Input::Validate));
        assert!(matches!(parse_input("/apply"), Input::Apply(None)));
        match parse_input("/apply  zone-9 ") {
            Input::Apply(Some(zone)) => assert_eq!(zone, "zone-9"),
            _ => panic!("expected /apply with zone"),
        }
        match parse_input(" block bots ") {
            Input::Message(m) => assert_eq!(m, "block bots"),
            _ => panic!("expected message"),
        }
    }
}
