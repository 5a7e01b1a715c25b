use crate::error::RemindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remind_scheduler_api_structs::delete_reminder::*;
use remind_scheduler_domain::{Reminder, ID};
use remind_scheduler_infra::RemindContext;

fn handle_error(e: UseCaseError) -> RemindError {
    match e {
        UseCaseError::NotFound(reminder_id) => RemindError::NotFound(format!(
            "The reminder with id: {}, was not found.",
            reminder_id
        )),
    }
}

pub async fn delete_reminder_controller(
    ctx: web::Data<RemindContext>,
    path_params: web::Path<PathParams>,
) -> Result<HttpResponse, RemindError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let deleted = ctx
            .repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))?;

        // No-op when the reminder was not due today, or when delivery
        // removed it concurrently with this request
        ctx.today.lock().unwrap().delete(&self.reminder_id);
        ctx.trigger.wake();

        Ok(deleted)
    }
}
