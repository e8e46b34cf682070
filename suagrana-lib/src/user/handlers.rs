use crate::auth::handlers::UserCredentials;
use crate::auth::password;
use crate::error::HandlerError;
use crate::user::{Principal, TenantId, UserId};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use suagrana_repo::user_repo::{User, UserRepo, UserRepoError};
use tracing::info;

#[derive(Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub tenant_id: TenantId,
    pub tenant_name: String,
}

#[derive(Serialize, Deserialize)]
pub struct NewPassword {
    pub password: String,
}

#[get("")]
pub async fn get_profile(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let principal = principal.into_inner();
    let tenant = user_repo.get_tenant(&principal.tenant_id).await?;
    Ok(HttpResponse::Ok().json(Profile {
        id: principal.user_id,
        tenant_id: tenant.id,
        tenant_name: tenant.name,
    }))
}

#[put("/password")]
pub async fn update_password(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    principal: web::ReqData<Principal>,
    new_password: web::Json<NewPassword>,
) -> Result<impl Responder, HandlerError> {
    let password_hash = password::encode_password(new_password.into_inner().password)?;
    user_repo
        .update_password_hash(&principal.user_id, &password_hash)
        .await?;
    Ok(HttpResponse::Ok().finish())
}

#[delete("")]
pub async fn delete_user(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    user_repo.delete_user(&principal.user_id).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Adds another user to the caller's tenant.
#[post("/members")]
pub async fn add_member(
    user_repo: web::Data<Arc<dyn UserRepo>>,
    principal: web::ReqData<Principal>,
    credentials: web::Json<UserCredentials>,
) -> Result<impl Responder, HandlerError> {
    let credentials = credentials.into_inner();
    match user_repo.get_user(&credentials.id).await {
        Ok(_) => return Err(UserRepoError::UserAlreadyExists(credentials.id).into()),
        Err(UserRepoError::UserNotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let password_hash = password::encode_password(credentials.password)?;
    user_repo
        .create_user(User::new(
            credentials.id.clone(),
            password_hash,
            principal.tenant_id.clone(),
        ))
        .await?;
    info!(member_id = %credentials.id, tenant_id = %principal.tenant_id, "Added member");

    Ok(HttpResponse::Created().finish())
}
