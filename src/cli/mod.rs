pub mod chat;
pub mod config;
pub mod normalize;
pub mod rules;
pub mod serve;
pub mod validate;

pub use chat::ChatArgs;
pub use config::ConfigArgs;
pub use normalize::NormalizeArgs;
pub use rules::RulesArgs;
pub use serve::ServeArgs;
pub use validate::ValidateArgs;
