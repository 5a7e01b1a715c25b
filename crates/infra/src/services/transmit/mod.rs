mod stub;
mod webhook;

use remind_scheduler_domain::Reminder;
pub use stub::StubTransmit;
pub use webhook::WebhookTransmit;

/// Outbound boundary towards the chat collaborator that actually shows
/// the reminder to its owner.
#[async_trait::async_trait]
pub trait ITransmit: Send + Sync {
    /// Delivers one reminder payload to its owner. Failures are
    /// per-reminder; callers must not let one abort a batch.
    async fn send(&self, reminder: &Reminder) -> anyhow::Result<()>;
}
