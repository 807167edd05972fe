use anyhow::Result;
use clap::Args;

use crate::rules::validate;

#[derive(Args)]
pub struct ValidateArgs {
    /// Expression to check
    pub expression: String,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Returns whether the expression passed, so `main` can set the exit code.
pub fn run(args: ValidateArgs) -> Result<bool> {
    let result = validate(&args.expression);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(result.valid);
    }

    if result.valid {
        println!("[OK] Expression is valid");
    } else {
        println!("[X] Validation failed");
    }
    for error in &result.errors {
        println!("  error: {}", error);
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }

    Ok(result.valid)
}
