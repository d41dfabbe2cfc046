use async_trait::async_trait;

use crate::app_error::AppResult;

/// Outbound notification channel (email today). Callers on the quota and
/// reminder paths treat delivery as best-effort: failures are logged at the
/// call site, never propagated into the business result.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> AppResult<()>;
}
