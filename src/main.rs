use anyhow::Result;
use tracing::info;

mod types;
mod config;
mod registry;
mod parsing;
mod billing;
mod wecom;
mod collector;
mod report;
mod runner;

use config::load_config;
use billing::BillingClient;
use wecom::WeComNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    info!("Dorm electricity reporter starting");

    // Missing secrets end the process here with a non-zero exit code
    let cfg = load_config()?;
    info!("rooms = {}", cfg.rooms.len());

    let billing = BillingClient::new(&cfg)?;
    let notifier = WeComNotifier::new(&cfg);

    let outcome = runner::run(&cfg, &billing, &notifier).await;
    info!(
        "Run finished: {:?}, {} read, {} failed, {} urgent",
        outcome.branch, outcome.summary.total, outcome.failures, outcome.urgent
    );

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();
}
