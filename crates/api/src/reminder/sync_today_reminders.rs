use crate::shared::usecase::UseCase;
use remind_scheduler_infra::RemindContext;
use tracing::info;

/// Reconciles the in-memory today-set with durable storage. Runs once at
/// process start and once at every local midnight: reminders that were
/// due in the past are purged, then everything due today is loaded and
/// scheduled.
#[derive(Debug)]
pub struct SyncTodayRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SyncTodayRemindersUseCase {
    /// Number of reminders due today
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "SyncTodayReminders";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let local_now = ctx
            .sys
            .get_utc_datetime()
            .with_timezone(&ctx.config.timezone)
            .naive_local();
        let today = local_now.date();

        let purged = ctx.repos.reminders.purge_stale(local_now).await;
        if !purged.is_empty() {
            info!("Purged {} stale reminders", purged.len());
        }

        let due_today = ctx
            .repos
            .reminders
            .find_due_on(today)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let count = due_today.len();

        // Swap the whole day in under one lock so nothing observes a
        // cleared-but-unfilled set
        {
            let mut today_set = ctx.today.lock().unwrap();
            today_set.clear();
            today_set.push(due_today);
        }
        ctx.trigger.wake();

        Ok(count)
    }
}
