mod config;
mod repos;
mod services;
mod system;
mod trigger;

pub use config::Config;
pub use repos::{DeleteResult, IReminderRepo, Repos};
use remind_scheduler_domain::TodaySet;
pub use services::{ITransmit, StubTransmit, WebhookTransmit};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::{Arc, Mutex};
pub use system::{ISys, RealSys, StaticTimeSys};
pub use trigger::TriggerSignal;

/// Everything a usecase needs, constructed once at startup and passed by
/// clone into every handler and job. There is deliberately no ambient
/// global state: the today-set, its trigger signal, the repositories and
/// the clock all live here.
#[derive(Clone)]
pub struct RemindContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub transmit: Arc<dyn ITransmit>,
    /// Reminders due on the current calendar day. The blocking mutex is
    /// fine here: mutations are synchronous and the lock is never held
    /// across an await point.
    pub today: Arc<Mutex<TodaySet>>,
    /// Rung after every today-set mutation so the delivery job re-arms
    /// for the new nearest due instant.
    pub trigger: TriggerSignal,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl RemindContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let transmit = Arc::new(WebhookTransmit::new(
            config.webhook_url.clone(),
            config.webhook_key.clone(),
        ));
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            transmit,
            today: Arc::new(Mutex::new(TodaySet::new())),
            trigger: TriggerSignal::new(),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> RemindContext {
    RemindContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

/// Context over inmemory repositories and a recording transmit stub.
/// Tests swap in a `StaticTimeSys` on top of this.
pub fn setup_context_inmemory() -> RemindContext {
    RemindContext {
        repos: Repos::create_inmemory(),
        config: Config::new(),
        sys: Arc::new(RealSys {}),
        transmit: Arc::new(StubTransmit::new()),
        today: Arc::new(Mutex::new(TodaySet::new())),
        trigger: TriggerSignal::new(),
    }
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
