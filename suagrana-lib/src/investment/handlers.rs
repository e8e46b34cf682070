use crate::error::HandlerError;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use std::sync::Arc;
use suagrana_repo::investment_repo::{InvestmentRepo, NewDividend, NewInvestment};
use suagrana_repo::report;

#[post("")]
pub async fn create_investment(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
    new_investment: web::Json<NewInvestment>,
) -> Result<impl Responder, HandlerError> {
    let investment = investment_repo
        .create_investment(&principal.tenant_id, new_investment.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(investment))
}

#[get("")]
pub async fn get_all_investments(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let investments = investment_repo
        .get_all_investments(&principal.tenant_id)
        .await?;
    Ok(HttpResponse::Ok().json(investments))
}

#[put("/{investment_id}")]
pub async fn update_investment(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
    investment_id: web::Path<i32>,
    updated_investment: web::Json<NewInvestment>,
) -> Result<impl Responder, HandlerError> {
    let investment = investment_repo
        .update_investment(
            &principal.tenant_id,
            investment_id.into_inner(),
            updated_investment.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(investment))
}

#[delete("/{investment_id}")]
pub async fn delete_investment(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
    investment_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let investment = investment_repo
        .delete_investment(&principal.tenant_id, investment_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(investment))
}

#[post("/{investment_id}/dividends")]
pub async fn add_dividend(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
    investment_id: web::Path<i32>,
    new_dividend: web::Json<NewDividend>,
) -> Result<impl Responder, HandlerError> {
    let dividend = investment_repo
        .add_dividend(
            &principal.tenant_id,
            investment_id.into_inner(),
            new_dividend.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(dividend))
}

#[get("/{investment_id}/dividends")]
pub async fn get_dividends(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
    investment_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let dividends = investment_repo
        .get_dividends(&principal.tenant_id, Some(investment_id.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(dividends))
}

#[get("/dividends")]
pub async fn get_all_dividends(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let dividends = investment_repo
        .get_dividends(&principal.tenant_id, None)
        .await?;
    Ok(HttpResponse::Ok().json(dividends))
}

#[get("/portfolio")]
pub async fn get_portfolio(
    investment_repo: web::Data<Arc<dyn InvestmentRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let investments = investment_repo
        .get_all_investments(&principal.tenant_id)
        .await?;
    let dividends = investment_repo
        .get_dividends(&principal.tenant_id, None)
        .await?;
    Ok(HttpResponse::Ok().json(report::portfolio_summary(&investments, &dividends)))
}
