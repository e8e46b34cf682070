use actix_web::{web, Scope};

mod handlers;

pub fn investment_service() -> Scope {
    web::scope("/investments")
        .service(handlers::get_portfolio)
        .service(handlers::get_all_dividends)
        .service(handlers::create_investment)
        .service(handlers::get_all_investments)
        .service(handlers::update_investment)
        .service(handlers::delete_investment)
        .service(handlers::add_dividend)
        .service(handlers::get_dividends)
}
