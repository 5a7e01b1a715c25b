use crate::error::RemindError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use remind_scheduler_api_structs::get_reminders::*;
use remind_scheduler_domain::{date, Reminder};
use remind_scheduler_infra::RemindContext;

fn handle_error(e: UseCaseError) -> RemindError {
    match e {
        UseCaseError::StorageError => RemindError::InternalError,
    }
}

pub async fn get_reminders_controller(
    ctx: web::Data<RemindContext>,
    query_params: web::Query<QueryParams>,
) -> Result<HttpResponse, RemindError> {
    let query = query_params.0;
    let due_date = match &query.due_date {
        Some(datestr) => Some(date::parse_date(datestr).map_err(|_| {
            RemindError::BadClientData(format!("Invalid due date: {}", datestr))
        })?),
        None => None,
    };

    let usecase = GetRemindersUseCase {
        owner_id: query.owner_id,
        due_date,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(handle_error)
}

#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub owner_id: i64,
    /// When set, restricts the listing to one calendar day
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &RemindContext) -> Result<Self::Response, Self::Error> {
        let res = match self.due_date {
            Some(due_date) => {
                ctx.repos
                    .reminders
                    .find_by_owner_on(self.owner_id, due_date)
                    .await
            }
            None => ctx.repos.reminders.find_by_owner(self.owner_id).await,
        };
        res.map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use remind_scheduler_domain::{PayloadKind, Reminder};
    use remind_scheduler_infra::setup_context_inmemory;

    fn reminder_for(owner_id: i64, date: NaiveDate) -> Reminder {
        Reminder {
            id: Default::default(),
            owner_id,
            due_date: date,
            due_time: NaiveTime::from_hms(9, 0, 0),
            kind: PayloadKind::Text,
            text: Some("pay the rent".into()),
            file_ref: None,
        }
    }

    #[tokio::test]
    async fn lists_only_the_owners_reminders() {
        let ctx = setup_context_inmemory();
        let date = NaiveDate::from_ymd(2021, 2, 21);
        ctx.repos
            .reminders
            .insert(&reminder_for(1, date))
            .await
            .unwrap();
        ctx.repos
            .reminders
            .insert(&reminder_for(1, NaiveDate::from_ymd(2021, 2, 25)))
            .await
            .unwrap();
        ctx.repos
            .reminders
            .insert(&reminder_for(2, date))
            .await
            .unwrap();

        let all = execute(
            GetRemindersUseCase {
                owner_id: 1,
                due_date: None,
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(all.len(), 2);

        let on_date = execute(
            GetRemindersUseCase {
                owner_id: 1,
                due_date: Some(date),
            },
            &ctx,
        )
        .await
        .unwrap();
        assert_eq!(on_date.len(), 1);
        assert_eq!(on_date[0].due_date, date);
    }
}
