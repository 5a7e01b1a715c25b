use crate::error::RemindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use remind_scheduler_api_structs::create_reminder::*;
use remind_scheduler_domain::{date, PayloadKind, Reminder, ID};
use remind_scheduler_infra::RemindContext;

fn handle_error(e: UseCaseError) -> RemindError {
    match e {
        UseCaseError::InvalidPayload(msg) => RemindError::BadClientData(msg),
        UseCaseError::PastDueInstant => {
            RemindError::BadClientData("The given due date and time have already passed".into())
        }
        UseCaseError::StorageError => RemindError::InternalError,
    }
}

pub async fn create_reminder_controller(
    ctx: web::Data<RemindContext>,
    body: web::Json<RequestBody>,
) -> Result<HttpResponse, RemindError> {
    let body = body.0;
    let due_date = date::parse_date(&body.due_date)
        .map_err(|_| RemindError::BadClientData(format!("Invalid due date: {}", body.due_date)))?;
    let due_time = date::parse_time(&body.due_time)
        .map_err(|_| RemindError::BadClientData(format!("Invalid due time: {}", body.due_time)))?;

    let usecase = CreateReminderUseCase {
        owner_id: body.owner_id,
        due_date,
        due_time,
        kind: body.kind,
        text: body.text,
        file_ref: body.file_ref,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub owner_id: i64,
    pub due_date: NaiveDate,
    pub due_time: NaiveTime,
    pub kind: PayloadKind,
    pub text: Option<String>,
    pub file_ref: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidPayload(String),
    PastDueInstant,
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        if self.kind.requires_file_ref() && self.file_ref.is_none() {
            return Err(UseCaseError::InvalidPayload(format!(
                "Payload kind: {} requires a file ref",
                self.kind.as_str()
            )));
        }
        if self.kind == PayloadKind::Text && self.text.is_none() {
            return Err(UseCaseError::InvalidPayload(
                "A text reminder requires a text".into(),
            ));
        }

        let local_now = ctx
            .sys
            .get_utc_datetime()
            .with_timezone(&ctx.config.timezone)
            .naive_local();
        if self.due_date.and_time(self.due_time) < local_now {
            return Err(UseCaseError::PastDueInstant);
        }

        let reminder = Reminder {
            id: ID::new(),
            owner_id: self.owner_id,
            due_date: self.due_date,
            due_time: self.due_time,
            kind: self.kind,
            text: self.text.take(),
            file_ref: self.file_ref.take(),
        };

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // Same-day reminders go straight onto today's schedule. Anything
        // later stays durable-store only until its day's resync.
        if reminder.is_due_on(local_now.date()) {
            ctx.today.lock().unwrap().push(vec![reminder.clone()]);
            ctx.trigger.wake();
        }

        Ok(reminder)
    }
}
