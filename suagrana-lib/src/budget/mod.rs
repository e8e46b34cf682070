use actix_web::{web, Scope};
use chrono::NaiveDate;
use serde::Deserialize;

mod handlers;

pub fn budget_service() -> Scope {
    web::scope("/budgets")
        .service(handlers::get_budget_status)
        .service(handlers::create_budget)
        .service(handlers::get_all_budgets)
        .service(handlers::update_budget)
        .service(handlers::delete_budget)
}

/// Any day of the month to report on, today when absent.
#[derive(Deserialize)]
pub struct StatusQuery {
    pub month: Option<NaiveDate>,
}
