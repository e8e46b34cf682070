use crate::bill::UpcomingQuery;
use crate::error::HandlerError;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Local;
use std::sync::Arc;
use suagrana_repo::bill_repo::{BillRepo, BillReminder, NewBillReminder};

#[post("")]
pub async fn create_bill(
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    principal: web::ReqData<Principal>,
    new_bill: web::Json<NewBillReminder>,
) -> Result<impl Responder, HandlerError> {
    let bill = bill_repo
        .create_bill(&principal.tenant_id, new_bill.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(bill))
}

#[get("")]
pub async fn get_all_bills(
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let bills = bill_repo.get_all_bills(&principal.tenant_id).await?;
    Ok(HttpResponse::Ok().json(bills))
}

/// Unpaid bills due within `days` of today, overdue ones included.
#[get("/upcoming")]
pub async fn get_upcoming_bills(
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    principal: web::ReqData<Principal>,
    query: web::Query<UpcomingQuery>,
) -> Result<impl Responder, HandlerError> {
    let today = Local::now().date_naive();
    let bills: Vec<BillReminder> = bill_repo
        .get_all_bills(&principal.tenant_id)
        .await?
        .into_iter()
        .filter(|bill| bill.is_due_within(today, query.days))
        .collect();
    Ok(HttpResponse::Ok().json(bills))
}

#[put("/{bill_id}")]
pub async fn update_bill(
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    principal: web::ReqData<Principal>,
    bill_id: web::Path<i32>,
    updated_bill: web::Json<NewBillReminder>,
) -> Result<impl Responder, HandlerError> {
    let bill = bill_repo
        .update_bill(
            &principal.tenant_id,
            bill_id.into_inner(),
            updated_bill.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(bill))
}

#[delete("/{bill_id}")]
pub async fn delete_bill(
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    principal: web::ReqData<Principal>,
    bill_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let bill = bill_repo
        .delete_bill(&principal.tenant_id, bill_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(bill))
}

#[post("/{bill_id}/pay")]
pub async fn pay_bill(
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    principal: web::ReqData<Principal>,
    bill_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let bill = bill_repo
        .pay_bill(&principal.tenant_id, bill_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(bill))
}
