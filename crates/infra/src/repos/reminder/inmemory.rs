use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use remind_scheduler_domain::{Reminder, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Reminder>> {
        let mut res = find_by(&self.reminders, |r: &Reminder| r.owner_id == owner_id);
        res.sort_by_key(|r| (r.due_date, r.due_time));
        Ok(res)
    }

    async fn find_by_owner_on(
        &self,
        owner_id: i64,
        due_date: NaiveDate,
    ) -> anyhow::Result<Vec<Reminder>> {
        let mut res = find_by(&self.reminders, |r: &Reminder| {
            r.owner_id == owner_id && r.due_date == due_date
        });
        res.sort_by_key(|r| r.due_time);
        Ok(res)
    }

    async fn find_due_on(&self, due_date: NaiveDate) -> anyhow::Result<Vec<Reminder>> {
        let mut res = find_by(&self.reminders, |r: &Reminder| r.due_date == due_date);
        res.sort_by_key(|r| r.due_time);
        Ok(res)
    }

    async fn update_text(&self, reminder_id: &ID, text: &str) -> anyhow::Result<()> {
        let mut reminder = find(reminder_id, &self.reminders)
            .ok_or_else(|| anyhow::Error::msg("Reminder not found"))?;
        reminder.text = Some(text.to_string());
        save(&reminder, &self.reminders);
        Ok(())
    }

    async fn update_date(&self, reminder_id: &ID, due_date: NaiveDate) -> anyhow::Result<()> {
        let mut reminder = find(reminder_id, &self.reminders)
            .ok_or_else(|| anyhow::Error::msg("Reminder not found"))?;
        reminder.due_date = due_date;
        save(&reminder, &self.reminders);
        Ok(())
    }

    async fn update_time(&self, reminder_id: &ID, due_time: NaiveTime) -> anyhow::Result<()> {
        let mut reminder = find(reminder_id, &self.reminders)
            .ok_or_else(|| anyhow::Error::msg("Reminder not found"))?;
        reminder.due_time = due_time;
        save(&reminder, &self.reminders);
        Ok(())
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }

    async fn delete_many(&self, reminder_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        let deleted = find_and_delete_by(&self.reminders, |r: &Reminder| {
            reminder_ids.contains(&r.id)
        });
        Ok(DeleteResult {
            deleted_count: deleted.len() as i64,
        })
    }

    async fn purge_stale(&self, now: NaiveDateTime) -> Vec<Reminder> {
        find_and_delete_by(&self.reminders, |r: &Reminder| r.is_stale(now))
    }
}
