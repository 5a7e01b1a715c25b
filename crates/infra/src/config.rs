use chrono_tz::Tz;
use remind_scheduler_utils::create_random_secret;
use tracing::{info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// Timezone the service schedules in. "Today" and midnight rollover
    /// are evaluated against this zone.
    pub timezone: Tz,
    /// Endpoint that receives due reminder payloads
    pub webhook_url: String,
    /// Signing key sent with every delivery so the receiver can verify
    /// the origin
    pub webhook_key: String,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or_else(|_| default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let timezone = match std::env::var("TIMEZONE") {
            Ok(tz) => match tz.parse::<Tz>() {
                Ok(tz) => tz,
                Err(_) => {
                    warn!(
                        "The given TIMEZONE: {} is not valid, falling back to UTC.",
                        tz
                    );
                    Tz::UTC
                }
            },
            Err(_) => {
                info!("Did not find TIMEZONE environment variable. Scheduling in UTC.");
                Tz::UTC
            }
        };

        let default_webhook_url = "http://localhost:3000/reminders/webhook";
        let webhook_url = match std::env::var("REMINDER_WEBHOOK_URL") {
            Ok(url) => match Url::parse(&url) {
                Ok(_) => url,
                Err(_) => {
                    warn!(
                        "The given REMINDER_WEBHOOK_URL: {} is not a valid url, falling back to: {}.",
                        url, default_webhook_url
                    );
                    default_webhook_url.into()
                }
            },
            Err(_) => {
                info!(
                    "Did not find REMINDER_WEBHOOK_URL environment variable. Deliveries will be posted to: {}.",
                    default_webhook_url
                );
                default_webhook_url.into()
            }
        };

        let webhook_key = match std::env::var("REMINDER_WEBHOOK_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find REMINDER_WEBHOOK_KEY environment variable. Going to create one.");
                let key = create_random_secret(16);
                info!("Webhook signing key was generated and set to: {}", key);
                key
            }
        };

        Self {
            port,
            timezone,
            webhook_url,
            webhook_key,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
