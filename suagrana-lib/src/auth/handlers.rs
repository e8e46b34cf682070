use crate::auth::jwt::JWTAuth;
use crate::auth::{password, AUTH_COOKIE};
use crate::error::HandlerError;
use crate::user::{Principal, UserId};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{post, web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;
use serde::Serialize;
use std::sync::Arc;
use suagrana_repo::user_repo::{Tenant, User, UserRepo, UserRepoError};
use tracing::{error, info};
use uuid::Uuid;

#[derive(Serialize, Deserialize)]
pub struct UserCredentials {
    pub id: UserId,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct Signup {
    pub id: UserId,
    pub password: String,
    pub tenant_name: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Creates a new tenant and its first user.
#[post("/signup")]
pub async fn signup(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    signup: web::Json<Signup>,
) -> Result<impl Responder, HandlerError> {
    let signup = signup.into_inner();

    match user_repo.get_user(&signup.id).await {
        Ok(_) => return Err(UserRepoError::UserAlreadyExists(signup.id).into()),
        Err(UserRepoError::UserNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash = password::encode_password(signup.password)?;
    let tenant = Tenant::new(
        Uuid::new_v4().to_string(),
        signup.tenant_name.unwrap_or_else(|| signup.id.clone()),
    );
    user_repo.create_tenant(tenant.clone()).await?;
    let created = user_repo
        .create_user(User::new(signup.id.clone(), password_hash, tenant.id.clone()))
        .await;
    if let Err(e) = created {
        if let Err(delete_error) = user_repo.delete_tenant(&tenant.id).await {
            error!(
                tenant_id = %tenant.id,
                %delete_error,
                "Unable to remove tenant of failed signup"
            );
        }
        return Err(e.into());
    }
    info!(user_id = %signup.id, tenant_id = %tenant.id, "Signed up");

    Ok(HttpResponse::Ok().json(tenant))
}

#[post("/token")]
pub async fn get_token(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    credentials: web::Json<UserCredentials>,
    req: HttpRequest,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();

    let user = match user_repo.get_user(&credentials.id).await {
        Ok(user) => user,
        Err(UserRepoError::UserNotFound(_)) => return Err(HandlerError::Unauthorized),
        Err(e) => return Err(e.into()),
    };

    let matched = password::verify_password(credentials.password, user.password_hash)?;
    if !matched {
        return Err(HandlerError::Unauthorized);
    }

    let jwt_auth = req
        .app_data::<JWTAuth>()
        .ok_or_else(|| anyhow::anyhow!("JWTAuth missing from app data"))?;
    let token = jwt_auth.create_token(&Principal::new(user.id, user.tenant_id))?;

    let cookie = Cookie::build(AUTH_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(JWTAuth::EXPIRE_TIME))
        .finish();
    Ok(HttpResponse::Ok()
        .cookie(cookie)
        .json(TokenResponse { token }))
}

#[post("/logout")]
pub async fn logout() -> impl Responder {
    let mut cookie = Cookie::build(AUTH_COOKIE, "").path("/").finish();
    cookie.make_removal();
    HttpResponse::Ok().cookie(cookie).finish()
}
