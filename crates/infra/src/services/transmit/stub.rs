use super::ITransmit;
use remind_scheduler_domain::{Reminder, ID};
use std::sync::Mutex;

/// Transmit double for tests: records what was sent and fails for ids
/// it was told to reject.
#[derive(Default)]
pub struct StubTransmit {
    sent: Mutex<Vec<Reminder>>,
    reject: Mutex<Vec<ID>>,
}

impl StubTransmit {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn reject_id(&self, reminder_id: ID) {
        self.reject.lock().unwrap().push(reminder_id);
    }

    pub fn sent(&self) -> Vec<Reminder> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_ids(&self) -> Vec<ID> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.id.clone())
            .collect()
    }
}

#[async_trait::async_trait]
impl ITransmit for StubTransmit {
    async fn send(&self, reminder: &Reminder) -> anyhow::Result<()> {
        if self.reject.lock().unwrap().contains(&reminder.id) {
            return Err(anyhow::Error::msg("Transmit rejected by stub"));
        }
        self.sent.lock().unwrap().push(reminder.clone());
        Ok(())
    }
}
