use crate::error::HandlerError;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder, Scope};
use std::sync::Arc;
use suagrana_repo::account_repo::{AccountRepo, NewAccount};

pub fn account_service() -> Scope {
    web::scope("/accounts")
        .service(create_account)
        .service(get_all_accounts)
        .service(get_account)
        .service(update_account)
        .service(delete_account)
}

#[post("")]
async fn create_account(
    account_repo: web::Data<Arc<dyn AccountRepo>>,
    principal: web::ReqData<Principal>,
    new_account: web::Json<NewAccount>,
) -> Result<impl Responder, HandlerError> {
    let account = account_repo
        .create_account(&principal.tenant_id, new_account.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

#[get("")]
async fn get_all_accounts(
    account_repo: web::Data<Arc<dyn AccountRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let accounts = account_repo.get_all_accounts(&principal.tenant_id).await?;
    Ok(HttpResponse::Ok().json(accounts))
}

#[get("/{account_id}")]
async fn get_account(
    account_repo: web::Data<Arc<dyn AccountRepo>>,
    principal: web::ReqData<Principal>,
    account_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let account = account_repo
        .get_account(&principal.tenant_id, account_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

#[put("/{account_id}")]
async fn update_account(
    account_repo: web::Data<Arc<dyn AccountRepo>>,
    principal: web::ReqData<Principal>,
    account_id: web::Path<i32>,
    updated_account: web::Json<NewAccount>,
) -> Result<impl Responder, HandlerError> {
    let account = account_repo
        .update_account(
            &principal.tenant_id,
            account_id.into_inner(),
            updated_account.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(account))
}

/// Accounts that still have entries cannot be deleted.
#[delete("/{account_id}")]
async fn delete_account(
    account_repo: web::Data<Arc<dyn AccountRepo>>,
    principal: web::ReqData<Principal>,
    account_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let account = account_repo
        .delete_account(&principal.tenant_id, account_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(account))
}
