use crate::error::HandlerError;
use crate::transaction::TransactionQuery;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use std::sync::Arc;
use suagrana_repo::transaction_repo::{NewTransaction, TransactionRepo};

#[get("/{transaction_id}")]
pub async fn get_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    principal: web::ReqData<Principal>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .get_transaction(&principal.tenant_id, transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[get("")]
pub async fn get_all_transactions(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    principal: web::ReqData<Principal>,
    query: web::Query<TransactionQuery>,
) -> Result<impl Responder, HandlerError> {
    let transactions = transaction_repo
        .get_all_transactions(&principal.tenant_id, query.filter(), query.page_options())
        .await?;
    Ok(HttpResponse::Ok().json(transactions))
}

#[post("")]
pub async fn create_new_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    principal: web::ReqData<Principal>,
    new_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let new_transaction = new_transaction.into_inner();
    new_transaction.validate()?;

    let transaction = transaction_repo
        .create_new_transaction(&principal.tenant_id, new_transaction)
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[put("/{transaction_id}")]
pub async fn update_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    principal: web::ReqData<Principal>,
    transaction_id: web::Path<i32>,
    updated_transaction: web::Json<NewTransaction>,
) -> Result<impl Responder, HandlerError> {
    let updated_transaction = updated_transaction.into_inner();
    updated_transaction.validate()?;

    let transaction = transaction_repo
        .update_transaction(
            &principal.tenant_id,
            transaction_id.into_inner(),
            updated_transaction,
        )
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}

#[delete("/{transaction_id}")]
pub async fn delete_transaction(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    principal: web::ReqData<Principal>,
    transaction_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let transaction = transaction_repo
        .delete_transaction(&principal.tenant_id, transaction_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(transaction))
}
