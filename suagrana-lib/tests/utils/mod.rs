use std::time::Duration;

use actix_web::web::Data;
use rstest::*;
use suagrana_lib::cache::ReportCache;
use suagrana_lib::user::Principal;
use suagrana_repo::user_repo::{Tenant, User};
use suagrana_repo::Repos;
use tracing::info;
use tracing::Level;
use uuid::Uuid;

pub mod mock;

/// App with every `/api` scope, authenticating all requests as `$principal`.
macro_rules! build_app {
    ($repos:expr, $cache:expr, $principal:expr) => {{
        let app = actix_web::App::new()
            .app_data(suagrana_lib::json_config())
            .configure(suagrana_lib::app_data_config($repos, $cache))
            .wrap(suagrana_lib::tracing::create_middleware())
            .service(
                suagrana_lib::api_scope()
                    .wrap(crate::utils::mock::MockAuthentication { principal: $principal }),
            );
        tracing::info!("Built app");
        app
    }};
}

/// Sends `$request` and returns the response status with its JSON body.
macro_rules! call_json {
    (&$service:ident, $request:expr) => {{
        let response = actix_web::test::call_service(&$service, $request.to_request()).await;
        let status = response.status();
        let body = actix_web::test::read_body(response).await;
        let json: serde_json::Value = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }};
}

/// Sends `$request`, asserts it succeeded and deserializes the body.
macro_rules! call_ok {
    (&$service:ident, $request:expr) => {{
        let request = $request.to_request();
        let response = actix_web::test::call_service(&$service, request).await;
        assert!(
            response.status().is_success(),
            "Got {} response",
            response.status()
        );
        actix_web::test::read_body_json(response).await
    }};
}

/// A tenant with one member, created directly through the repository.
pub struct TestTenant {
    pub principal: Principal,
    repos: Repos,
}

#[allow(dead_code)]
impl TestTenant {
    pub async fn new(repos: &Repos) -> TestTenant {
        let tenant_id = "test-tenant-".to_owned() + &Uuid::new_v4().to_string();
        let user_id = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        repos
            .user_repo
            .create_tenant(Tenant::new(tenant_id.clone(), "Test family".to_owned()))
            .await
            .unwrap();
        repos
            .user_repo
            .create_user(User::new(
                user_id.clone(),
                suagrana_lib::auth::password::encode_password("pass".to_string()).unwrap(),
                tenant_id.clone(),
            ))
            .await
            .unwrap();
        info!(%tenant_id, %user_id, "Created tenant");
        TestTenant {
            principal: Principal::new(user_id, tenant_id),
            repos: repos.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.principal.tenant_id
    }

    pub async fn delete(&self) {
        self.repos
            .user_repo
            .delete_user(&self.principal.user_id)
            .await
            .unwrap()
    }
}

#[fixture]
#[once]
pub fn tracing_setup() -> () {
    tracing_subscriber::fmt()
        .pretty()
        .with_max_level(Level::DEBUG)
        .init();
    info!("tracing initialized");
}

#[fixture]
pub fn repos() -> Repos {
    suagrana_repo::mem_repo::create_repos()
}

#[fixture]
pub fn cache() -> Data<ReportCache> {
    Data::new(ReportCache::new(Duration::from_secs(60), 1000))
}
