use anyhow::{Context, Result};
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

use crate::rules::normalize;

#[derive(Args)]
pub struct NormalizeArgs {
    /// File holding a raw model reply (stdin when omitted)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

pub fn run(args: NormalizeArgs) -> Result<()> {
    let text = match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let rule = normalize(&text);
    println!("{}", serde_json::to_string_pretty(&rule)?);
    Ok(())
}
