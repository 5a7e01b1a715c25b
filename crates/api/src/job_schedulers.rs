use crate::reminder::deliver_due_reminders::DeliverDueRemindersUseCase;
use crate::reminder::sync_today_reminders::SyncTodayRemindersUseCase;
use crate::shared::usecase::execute;
use chrono::{LocalResult, NaiveDateTime, TimeZone, Utc};
use remind_scheduler_infra::RemindContext;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, warn};

const RESYNC_MAX_ATTEMPTS: usize = 5;
const RESYNC_RETRY_DELAY_SECS: u64 = 60;

/// Seconds from `now` until the next local midnight. Never zero, so the
/// rollover loop cannot spin inside the final second of a day.
pub fn seconds_until_next_midnight(now: &NaiveDateTime) -> i64 {
    let next_midnight = (now.date() + chrono::Duration::days(1)).and_hms(0, 0, 0);
    next_midnight.signed_duration_since(*now).num_seconds().max(1)
}

/// The UTC millis instant the delivery job should next wake at, `None`
/// when nothing is scheduled today.
fn next_trigger_instant(ctx: &RemindContext) -> Option<i64> {
    let tz = ctx.config.timezone;
    let local_now = ctx.sys.get_utc_datetime().with_timezone(&tz);
    let today = local_now.naive_local().date();
    let near = ctx.today.lock().unwrap().near_datetime(today)?;

    let instant = match tz.from_local_datetime(&near) {
        LocalResult::Single(instant) => instant,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            // Spring-forward gap: the local time does not exist. Firing
            // immediately beats never firing.
            error!(
                "Due instant {} does not exist in timezone {}, firing now",
                near, tz
            );
            local_now
        }
    };
    Some(instant.with_timezone(&Utc).timestamp_millis())
}

/// The trigger scheduler. Keeps exactly one wake-up armed for the
/// today-set's nearest due instant; every push/edit/delete/resync rings
/// the trigger signal, which cancels the armed wake-up and re-derives
/// the instant. An instant already in the past fires immediately.
pub fn start_delivery_job(ctx: RemindContext) {
    actix_web::rt::spawn(async move {
        loop {
            match next_trigger_instant(&ctx) {
                None => ctx.trigger.wait().await,
                Some(at_millis) => {
                    let millis_to_fire = at_millis - ctx.sys.get_timestamp_millis();
                    let delay = Duration::from_millis(millis_to_fire.max(0) as u64);
                    tokio::select! {
                        // The nearest instant changed, re-arm
                        _ = ctx.trigger.wait() => {}
                        _ = sleep(delay) => {
                            let _ = execute(DeliverDueRemindersUseCase {}, &ctx).await;
                        }
                    }
                }
            }
        }
    });
}

/// Runs the resynchronization once at startup, then at every local
/// midnight.
pub fn start_resync_job(ctx: RemindContext) {
    actix_web::rt::spawn(async move {
        // Covers reminders already due today while the process was down
        run_resync(&ctx).await;
        loop {
            let local_now = ctx
                .sys
                .get_utc_datetime()
                .with_timezone(&ctx.config.timezone)
                .naive_local();
            let secs = seconds_until_next_midnight(&local_now);
            sleep(Duration::from_secs(secs as u64)).await;
            run_resync(&ctx).await;
        }
    });
}

async fn run_resync(ctx: &RemindContext) {
    for attempt in 1..=RESYNC_MAX_ATTEMPTS {
        match execute(SyncTodayRemindersUseCase {}, ctx).await {
            Ok(count) => {
                info!("Resynchronized today-set, {} reminders due today", count);
                return;
            }
            Err(e) => {
                warn!(
                    "Resynchronization attempt {}/{} failed: {:?}",
                    attempt, RESYNC_MAX_ATTEMPTS, e
                );
                sleep(Duration::from_secs(RESYNC_RETRY_DELAY_SECS)).await;
            }
        }
    }
    // An empty today-set silently means no reminders fire all day, so
    // this must be loud
    error!(
        "Resynchronization failed after {} attempts, reminders will not fire until the next resync",
        RESYNC_MAX_ATTEMPTS
    );
}
