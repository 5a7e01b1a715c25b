use super::ITransmit;
use remind_scheduler_domain::Reminder;
use serde::Serialize;

/// Posts due reminder payloads to the configured webhook endpoint,
/// signed with the webhook key header.
pub struct WebhookTransmit {
    client: reqwest::Client,
    url: String,
    key: String,
}

impl WebhookTransmit {
    pub fn new(url: String, key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            key,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderMessageBody<'a> {
    owner_id: i64,
    kind: &'static str,
    text: Option<&'a str>,
    file_ref: Option<&'a str>,
}

#[async_trait::async_trait]
impl ITransmit for WebhookTransmit {
    async fn send(&self, reminder: &Reminder) -> anyhow::Result<()> {
        // Voice messages and video notes cannot carry a caption
        let text = if reminder.kind.supports_caption() {
            reminder.text.as_deref()
        } else {
            None
        };
        let body = ReminderMessageBody {
            owner_id: reminder.owner_id,
            kind: reminder.kind.as_str(),
            text,
            file_ref: reminder.file_ref.as_deref(),
        };

        self.client
            .post(&self.url)
            .header("remind-scheduler-webhook-key", self.key.as_str())
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }
}
