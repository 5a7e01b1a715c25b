mod inmemory;
mod postgres;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use remind_scheduler_domain::{Reminder, ID};

use crate::repos::shared::repo::DeleteResult;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Reminder>>;
    async fn find_by_owner_on(
        &self,
        owner_id: i64,
        due_date: NaiveDate,
    ) -> anyhow::Result<Vec<Reminder>>;
    /// Every reminder due on the given calendar day, ascending by due
    /// time. A failure here must reach the resynchronization job, which
    /// retries: an empty result would silently mean no reminders fire
    /// all day.
    async fn find_due_on(&self, due_date: NaiveDate) -> anyhow::Result<Vec<Reminder>>;
    async fn update_text(&self, reminder_id: &ID, text: &str) -> anyhow::Result<()>;
    async fn update_date(&self, reminder_id: &ID, due_date: NaiveDate) -> anyhow::Result<()>;
    async fn update_time(&self, reminder_id: &ID, due_time: NaiveTime) -> anyhow::Result<()>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn delete_many(&self, reminder_ids: &[ID]) -> anyhow::Result<DeleteResult>;
    /// Deletes and returns every reminder whose due instant is strictly
    /// before `now`
    async fn purge_stale(&self, now: NaiveDateTime) -> Vec<Reminder>;
}
