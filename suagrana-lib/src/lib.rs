use actix_web::error::JsonPayloadError;
use actix_web::web::{self, Data, ServiceConfig};
use actix_web::{HttpResponse, Scope};
use suagrana_repo::Repos;

use crate::auth::jwt::JWTAuth;
use crate::auth::JWTAuthentication;
use crate::cache::{InvalidateReports, ReportCache};

pub mod account;
pub mod auth;
pub mod bill;
pub mod budget;
pub mod cache;
pub mod category;
pub mod config;
pub mod error;
pub mod goal;
pub mod health;
pub mod investment;
pub mod report;
pub mod tracing;
pub mod transaction;
pub mod user;

/// Registers every repository and the report cache as app data.
pub fn app_data_config(repos: Repos, cache: Data<ReportCache>) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(Data::new(repos.user_repo))
            .app_data(Data::new(repos.account_repo))
            .app_data(Data::new(repos.category_repo))
            .app_data(Data::new(repos.transaction_repo))
            .app_data(Data::new(repos.budget_repo))
            .app_data(Data::new(repos.goal_repo))
            .app_data(Data::new(repos.investment_repo))
            .app_data(Data::new(repos.bill_repo))
            .app_data(Data::new(repos.health_check))
            .app_data(cache);
    }
}

/// The `/api` scope without authentication. Scopes that write data drop the tenant's cached
/// reports after every successful write.
pub fn api_scope() -> Scope {
    web::scope("/api")
        .service(account::account_service().wrap(InvalidateReports))
        .service(category::category_service().wrap(InvalidateReports))
        .service(transaction::transaction_service().wrap(InvalidateReports))
        .service(budget::budget_service().wrap(InvalidateReports))
        .service(goal::goal_service().wrap(InvalidateReports))
        .service(investment::investment_service().wrap(InvalidateReports))
        .service(bill::bill_service().wrap(InvalidateReports))
        .service(report::report_service())
        .service(user::user_service())
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        ::tracing::error!(req_path = req.path(), %err);
        match err {
            JsonPayloadError::Deserialize(deserialize_err) => {
                let error_body = serde_json::json!({
                    "error": "Unable to parse JSON payload",
                    "detail": format!("{}", deserialize_err),
                });
                actix_web::error::InternalError::from_response(
                    deserialize_err,
                    HttpResponse::BadRequest()
                        .content_type("application/json")
                        .body(error_body.to_string()),
                )
                .into()
            }
            _ => err.into(),
        }
    })
}

/// Everything the server mounts: app data, `/api` behind JWT authentication, `/auth` and
/// `/health`.
pub fn app_config_func(
    jwt_auth: JWTAuth,
    repos: Repos,
    cache: Data<ReportCache>,
    signups_enabled: bool,
) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(jwt_auth)
            .app_data(json_config())
            .configure(app_data_config(repos, cache))
            .service(health::health_check)
            .service(auth::auth_service(signups_enabled))
            .service(api_scope().wrap(JWTAuthentication));
    }
}
