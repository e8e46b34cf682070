use actix_web::{get, web, HttpResponse, Responder};
use std::sync::Arc;
use suagrana_repo::HealthCheck;
use tracing::warn;

#[get("/health")]
pub async fn health_check(health_check: web::Data<Arc<dyn HealthCheck>>) -> impl Responder {
    if health_check.check().await {
        HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
    } else {
        warn!("Health check failed");
        HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
    }
}
