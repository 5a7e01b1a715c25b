use crate::error::RemindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use remind_scheduler_api_structs::update_reminder::*;
use remind_scheduler_domain::{date, Reminder, ID};
use remind_scheduler_infra::RemindContext;

fn handle_error(e: UseCaseError) -> RemindError {
    match e {
        UseCaseError::NotFound(reminder_id) => RemindError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
        UseCaseError::PastDueInstant => {
            RemindError::BadClientData("The given due date and time have already passed".into())
        }
        UseCaseError::StorageError => RemindError::InternalError,
    }
}

pub async fn update_reminder_controller(
    ctx: web::Data<RemindContext>,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, RemindError> {
    let body = body.0;
    let due_date = match &body.due_date {
        Some(datestr) => Some(date::parse_date(datestr).map_err(|_| {
            RemindError::BadClientData(format!("Invalid due date: {}", datestr))
        })?),
        None => None,
    };
    let due_time = match &body.due_time {
        Some(timestr) => Some(date::parse_time(timestr).map_err(|_| {
            RemindError::BadClientData(format!("Invalid due time: {}", timestr))
        })?),
        None => None,
    };

    let usecase = UpdateReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
        text: body.text,
        due_date,
        due_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub text: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<NaiveTime>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    PastDueInstant,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        let due_date = self.due_date.unwrap_or(reminder.due_date);
        let due_time = self.due_time.unwrap_or(reminder.due_time);

        let local_now = ctx
            .sys
            .get_utc_datetime()
            .with_timezone(&ctx.config.timezone)
            .naive_local();
        if due_date.and_time(due_time) < local_now {
            return Err(UseCaseError::PastDueInstant);
        }

        if let Some(text) = &self.text {
            ctx.repos
                .reminders
                .update_text(&self.reminder_id, text)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }
        if let Some(due_date) = self.due_date {
            ctx.repos
                .reminders
                .update_date(&self.reminder_id, due_date)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }
        if let Some(due_time) = self.due_time {
            ctx.repos
                .reminders
                .update_time(&self.reminder_id, due_time)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        let updated = Reminder {
            id: reminder.id.clone(),
            owner_id: reminder.owner_id,
            due_date,
            due_time,
            kind: reminder.kind,
            text: self.text.clone().or(reminder.text),
            file_ref: reminder.file_ref,
        };

        // Keep today's schedule consistent with the new due instant. The
        // next trigger re-arm picks the change up before anything fires.
        {
            let mut today_set = ctx.today.lock().unwrap();
            if updated.is_due_on(local_now.date()) {
                let edited =
                    today_set.edit(&updated.id, self.text.as_deref(), self.due_time);
                if !edited {
                    // The due date just moved onto today
                    today_set.push(vec![updated.clone()]);
                }
            } else {
                // Moved off today; its pending trigger must never fire
                today_set.delete(&updated.id);
            }
        }
        ctx.trigger.wake();

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use remind_scheduler_domain::PayloadKind;
    use remind_scheduler_infra::{setup_context_inmemory, StaticTimeSys};
    use std::sync::Arc;

    fn setup() -> RemindContext {
        let mut ctx = setup_context_inmemory();
        // Sun Feb 21 2021 07:00:00 UTC
        ctx.sys = Arc::new(StaticTimeSys(Utc.ymd(2021, 2, 21).and_hms(7, 0, 0)));
        ctx.config.timezone = chrono_tz::Tz::UTC;
        ctx
    }

    async fn insert_today_reminder(ctx: &RemindContext, hour: u32) -> Reminder {
        let reminder = Reminder {
            id: Default::default(),
            owner_id: 42,
            due_date: NaiveDate::from_ymd(2021, 2, 21),
            due_time: NaiveTime::from_hms(hour, 0, 0),
            kind: PayloadKind::Text,
            text: Some("feed the cat".into()),
            file_ref: None,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();
        ctx.today.lock().unwrap().push(vec![reminder.clone()]);
        reminder
    }

    #[tokio::test]
    async fn edit_time_moves_the_scheduled_entry() {
        let ctx = setup();
        let reminder = insert_today_reminder(&ctx, 8).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            text: None,
            due_date: None,
            due_time: Some(NaiveTime::from_hms(12, 0, 0)),
        };
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.due_time, NaiveTime::from_hms(12, 0, 0));

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.due_time, NaiveTime::from_hms(12, 0, 0));

        let today_set = ctx.today.lock().unwrap();
        assert_eq!(today_set.len(), 1);
        assert_eq!(today_set.near_time(), Some(NaiveTime::from_hms(12, 0, 0)));
    }

    #[tokio::test]
    async fn edit_date_off_today_unschedules() {
        let ctx = setup();
        let reminder = insert_today_reminder(&ctx, 9).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            text: None,
            due_date: Some(NaiveDate::from_ymd(2021, 2, 25)),
            due_time: None,
        };
        execute(usecase, &ctx).await.unwrap();

        assert!(ctx.today.lock().unwrap().is_empty());
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.due_date, NaiveDate::from_ymd(2021, 2, 25));
    }

    #[tokio::test]
    async fn edit_date_onto_today_schedules() {
        let ctx = setup();
        let reminder = Reminder {
            id: Default::default(),
            owner_id: 42,
            due_date: NaiveDate::from_ymd(2021, 2, 25),
            due_time: NaiveTime::from_hms(9, 0, 0),
            kind: PayloadKind::Text,
            text: Some("water the plants".into()),
            file_ref: None,
        };
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            text: None,
            due_date: Some(NaiveDate::from_ymd(2021, 2, 21)),
            due_time: None,
        };
        execute(usecase, &ctx).await.unwrap();

        let today_set = ctx.today.lock().unwrap();
        assert_eq!(today_set.len(), 1);
        assert_eq!(today_set.near_time(), Some(NaiveTime::from_hms(9, 0, 0)));
    }

    #[tokio::test]
    async fn edit_text_keeps_the_schedule() {
        let ctx = setup();
        let reminder = insert_today_reminder(&ctx, 10).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            text: Some("feed the dog".into()),
            due_date: None,
            due_time: None,
        };
        let updated = execute(usecase, &ctx).await.unwrap();
        assert_eq!(updated.text.as_deref(), Some("feed the dog"));

        let today_set = ctx.today.lock().unwrap();
        assert_eq!(today_set.len(), 1);
        assert_eq!(today_set.near_time(), Some(NaiveTime::from_hms(10, 0, 0)));
    }

    #[tokio::test]
    async fn unknown_reminder_is_not_found() {
        let ctx = setup();
        let usecase = UpdateReminderUseCase {
            reminder_id: Default::default(),
            text: Some("nope".into()),
            due_date: None,
            due_time: None,
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn past_due_instant_is_rejected() {
        let ctx = setup();
        let reminder = insert_today_reminder(&ctx, 9).await;

        let usecase = UpdateReminderUseCase {
            reminder_id: reminder.id.clone(),
            text: None,
            due_date: None,
            due_time: Some(NaiveTime::from_hms(6, 0, 0)),
        };
        assert!(matches!(
            execute(usecase, &ctx).await,
            Err(UseCaseError::PastDueInstant)
        ));
        // Unchanged in both the store and today's schedule
        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.due_time, NaiveTime::from_hms(9, 0, 0));
        assert_eq!(
            ctx.today.lock().unwrap().near_time(),
            Some(NaiveTime::from_hms(9, 0, 0))
        );
    }
}
