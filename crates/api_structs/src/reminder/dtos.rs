use remind_scheduler_domain::{date, PayloadKind, Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub owner_id: i64,
    pub due_date: String,
    pub due_time: String,
    pub kind: PayloadKind,
    pub text: Option<String>,
    pub file_ref: Option<String>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id.clone(),
            owner_id: reminder.owner_id,
            due_date: date::format_date(&reminder.due_date),
            due_time: date::format_time(&reminder.due_time),
            kind: reminder.kind,
            text: reminder.text,
            file_ref: reminder.file_ref,
        }
    }
}
