use crate::shared::usecase::UseCase;
use futures::future::join_all;
use remind_scheduler_domain::Reminder;
use remind_scheduler_infra::RemindContext;
use tracing::error;

/// Slack for timer jitter between the armed wake-up and the clock read
const DUE_SLACK_SECS: i64 = 1;

/// Fired by the trigger scheduler at the nearest due instant: drains the
/// batch sharing that instant, transmits every reminder independently and
/// erases the batch from storage and from today's schedule.
#[derive(Debug)]
pub struct DeliverDueRemindersUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

async fn send_reminder(reminder: &Reminder, ctx: &RemindContext) {
    if let Err(e) = ctx.transmit.send(reminder).await {
        error!(
            "Failed to deliver reminder: {} to owner: {}. Err: {:?}",
            reminder.id, reminder.owner_id, e
        );
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeliverDueRemindersUseCase {
    /// The delivered batch
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "DeliverDueReminders";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let local_now = ctx
            .sys
            .get_utc_datetime()
            .with_timezone(&ctx.config.timezone)
            .naive_local();
        let today = local_now.date();

        let batch = {
            let mut today_set = ctx.today.lock().unwrap();
            match today_set.near_datetime(today) {
                // The wake-up may have been armed for an instant that an
                // edit has since moved. Deliver nothing; the scheduler
                // re-arms for the corrected instant.
                Some(near) if near <= local_now + chrono::Duration::seconds(DUE_SLACK_SECS) => {
                    today_set.pop_near()
                }
                _ => Vec::new(),
            }
        };
        if batch.is_empty() {
            return Ok(batch);
        }

        // One reminder's transmit failure must not block the others.
        // Failed sends are still erased below: at-least-once, and a row
        // only survives for the next resync if the erase itself fails.
        let sends = batch.iter().map(|reminder| send_reminder(reminder, ctx));
        join_all(sends).await;

        let reminder_ids = batch.iter().map(|r| r.id.clone()).collect::<Vec<_>>();
        ctx.repos
            .reminders
            .delete_many(&reminder_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        {
            let mut today_set = ctx.today.lock().unwrap();
            for reminder_id in &reminder_ids {
                // Usually a no-op since pop_near already drained them;
                // covers an edit that re-inserted one mid-delivery
                today_set.delete(reminder_id);
            }
        }

        Ok(batch)
    }
}
