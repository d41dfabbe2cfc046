use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, interval, interval_at};
use tracing::{error, info};

use crate::use_cases::{quota::QuotaUseCases, reminders::ReminderUseCases};

/// Background loop combining the two periodic jobs: dispatching due posting
/// reminders and sending weekly usage summaries. The summary ticker starts
/// one full interval out so a restart does not re-send summaries.
pub async fn run_reminder_loop(
    reminders: Arc<ReminderUseCases>,
    quota: Arc<QuotaUseCases>,
    poll_seconds: u64,
    summary_interval_seconds: u64,
) {
    let mut reminder_ticker = interval(Duration::from_secs(poll_seconds));
    let summary_period = Duration::from_secs(summary_interval_seconds);
    let mut summary_ticker = interval_at(Instant::now() + summary_period, summary_period);

    info!(
        "Reminder worker started (dispatch every {}s, summaries every {}s)",
        poll_seconds, summary_interval_seconds
    );

    loop {
        tokio::select! {
            _ = reminder_ticker.tick() => {
                match reminders.dispatch_due_reminders().await {
                    Ok(0) => {}
                    Ok(sent) => info!(sent, "Posting reminders dispatched"),
                    Err(e) => error!(error = %e, "Reminder dispatch failed"),
                }
            }
            _ = summary_ticker.tick() => {
                match quota.send_weekly_summaries().await {
                    Ok(sent) => info!(sent, "Weekly summaries sent"),
                    Err(e) => error!(error = %e, "Weekly summary run failed"),
                }
            }
        }
    }
}
