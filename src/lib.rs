pub mod ai;
pub mod cli;
pub mod client;
pub mod cloudflare;
pub mod config;
pub mod logging;
pub mod rules;
pub mod server;
pub mod session;
pub mod utils;

pub use config::Config;
pub use rules::{normalize, validate, Rule, RuleAction, ValidationResult};
pub use server::Server;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
