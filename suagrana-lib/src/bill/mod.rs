use actix_web::{web, Scope};
use serde::Deserialize;

mod handlers;

pub fn bill_service() -> Scope {
    web::scope("/bills")
        .service(handlers::get_upcoming_bills)
        .service(handlers::create_bill)
        .service(handlers::get_all_bills)
        .service(handlers::update_bill)
        .service(handlers::delete_bill)
        .service(handlers::pay_bill)
}

#[derive(Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_days")]
    pub days: u64,
}

fn default_days() -> u64 {
    suagrana_repo::report::UPCOMING_BILL_DAYS
}
