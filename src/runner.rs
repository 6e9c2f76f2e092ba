use chrono::Local;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::billing::BalanceSource;
use crate::collector::RoomCollector;
use crate::report::markdown::{
    build_failure_report, build_self_test, build_summary_report, build_urgent_alert,
    build_urgent_broadcast,
};
use crate::report::{ReportBranch, ReportSummary};
use crate::types::Config;
use crate::wecom::{MessageSink, WebhookMessage, MENTION_ALL};

/// What a run did, for the final log line and for tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub branch: ReportBranch,
    pub summary: ReportSummary,
    pub failures: usize,
    pub urgent: usize,
}

fn now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

async fn deliver_logged<N: MessageSink>(sink: &N, message: WebhookMessage, what: &str) -> bool {
    let delivered = sink.deliver(&message).await.is_some_and(|ack| ack.is_ok());
    if !delivered {
        warn!("{} was not delivered", what);
    }
    delivered
}

/// One full pass: self-test, query all rooms, report, escalate.
/// Notification and query failures are logged, never returned.
pub async fn run<S, N>(cfg: &Config, source: &S, sink: &N) -> RunOutcome
where
    S: BalanceSource,
    N: MessageSink,
{
    info!("Sending self-test message");
    if deliver_logged(sink, WebhookMessage::markdown(build_self_test(&now())), "Self-test").await {
        info!("Self-test delivered, webhook is configured correctly");
    } else {
        warn!("Self-test failed, querying rooms anyway");
    }
    sleep(cfg.pacing.after_self_test).await;

    let report = RoomCollector::new(source, cfg).collect().await;
    let timestamp = now();
    let branch = report.branch();
    let summary = report.summary();
    let mut urgent = 0;

    match branch {
        ReportBranch::Summary => {
            info!(
                "Sending summary: {} rooms, {} urgent, {} low, {} failed",
                summary.total,
                summary.urgent,
                summary.low,
                report.failures.len()
            );
            let content = build_summary_report(&report, &timestamp);
            deliver_logged(sink, WebhookMessage::markdown(content), "Summary report").await;

            let urgent_rooms = report.urgent_rooms();
            urgent = urgent_rooms.len();
            if !urgent_rooms.is_empty() {
                info!("{} rooms critically low, escalating", urgent);
                sleep(cfg.pacing.before_urgent_alert).await;
                let alert = build_urgent_alert(&urgent_rooms, &timestamp);
                deliver_logged(sink, WebhookMessage::markdown(alert), "Urgent alert").await;

                sleep(cfg.pacing.before_broadcast).await;
                let broadcast = WebhookMessage::text(build_urgent_broadcast(urgent), &[MENTION_ALL], &[]);
                deliver_logged(sink, broadcast, "Urgent broadcast").await;
            }
        }
        ReportBranch::AllFailed => {
            warn!("All {} rooms failed, sending failure report", report.failures.len());
            let content = build_failure_report(&report.failures, &timestamp);
            deliver_logged(sink, WebhookMessage::markdown(content), "Failure report").await;
        }
        ReportBranch::Empty => {
            warn!("No rooms configured, nothing to report");
        }
    }

    RunOutcome {
        branch,
        summary,
        failures: report.failures.len(),
        urgent,
    }
}
