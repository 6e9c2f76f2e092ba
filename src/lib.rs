// Public modules
pub mod types;
pub mod config;
pub mod registry;
pub mod parsing;
pub mod billing;
pub mod wecom;
pub mod collector;
pub mod report;
pub mod runner;

// Re-export commonly used items
pub use types::*;
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use registry::{default_rooms, RoomDescriptor};
pub use parsing::{first_number, interpret_status_message, match_balance, BALANCE_RULES};
pub use billing::{build_query_envelope, BalanceSource, BillingClient};
pub use wecom::{MessageSink, TextContent, WeComNotifier, WebhookAck, WebhookMessage};
pub use collector::RoomCollector;
pub use report::{ReportBranch, ReportSummary, RunReport};
pub use runner::{run, RunOutcome};
