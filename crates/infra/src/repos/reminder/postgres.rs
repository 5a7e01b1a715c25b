use super::IReminderRepo;
use crate::repos::shared::repo::DeleteResult;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use remind_scheduler_domain::{PayloadKind, Reminder, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    owner_id: i64,
    due_date: NaiveDate,
    due_time: NaiveTime,
    payload_kind: String,
    payload_text: Option<String>,
    payload_ref: Option<String>,
}

impl Into<Reminder> for ReminderRaw {
    fn into(self) -> Reminder {
        Reminder {
            id: self.reminder_uid.into(),
            owner_id: self.owner_id,
            due_date: self.due_date,
            due_time: self.due_time,
            kind: self.payload_kind.parse().unwrap_or(PayloadKind::Text),
            text: self.payload_text,
            file_ref: self.payload_ref,
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, owner_id, due_date, due_time, payload_kind, payload_text, payload_ref)
            VALUES($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*reminder.id.inner_ref())
        .bind(reminder.owner_id)
        .bind(reminder.due_date)
        .bind(reminder.due_time)
        .bind(reminder.kind.as_str())
        .bind(reminder.text.clone())
        .bind(reminder.file_ref.clone())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE reminder_uid = $1
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
        .map(|reminder| reminder.into())
    }

    async fn find_by_owner(&self, owner_id: i64) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE owner_id = $1
            ORDER BY due_date ASC, due_time ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders
            .into_iter()
            .map(|reminder| reminder.into())
            .collect())
    }

    async fn find_by_owner_on(
        &self,
        owner_id: i64,
        due_date: NaiveDate,
    ) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE owner_id = $1 AND due_date = $2
            ORDER BY due_time ASC
            "#,
        )
        .bind(owner_id)
        .bind(due_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders
            .into_iter()
            .map(|reminder| reminder.into())
            .collect())
    }

    async fn find_due_on(&self, due_date: NaiveDate) -> anyhow::Result<Vec<Reminder>> {
        let reminders = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE due_date = $1
            ORDER BY due_time ASC
            "#,
        )
        .bind(due_date)
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders
            .into_iter()
            .map(|reminder| reminder.into())
            .collect())
    }

    async fn update_text(&self, reminder_id: &ID, text: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET payload_text = $2
            WHERE reminder_uid = $1
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .bind(text)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_date(&self, reminder_id: &ID, due_date: NaiveDate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET due_date = $2
            WHERE reminder_uid = $1
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .bind(due_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_time(&self, reminder_id: &ID, due_time: NaiveTime) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminders
            SET due_time = $2
            WHERE reminder_uid = $1
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .bind(due_time)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(*reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .unwrap_or(None)
        .map(|reminder| reminder.into())
    }

    async fn delete_many(&self, reminder_ids: &[ID]) -> anyhow::Result<DeleteResult> {
        let uids = reminder_ids
            .iter()
            .map(|id| *id.inner_ref())
            .collect::<Vec<_>>();
        let res = sqlx::query(
            r#"
            DELETE FROM reminders
            WHERE reminder_uid = ANY($1)
            "#,
        )
        .bind(uids)
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }

    async fn purge_stale(&self, now: NaiveDateTime) -> Vec<Reminder> {
        sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders
            WHERE due_date + due_time < $1
            RETURNING *
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| vec![])
        .into_iter()
        .map(|reminder| reminder.into())
        .collect()
    }
}
