use crate::budget::StatusQuery;
use crate::error::HandlerError;
use crate::user::Principal;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use chrono::Local;
use std::sync::Arc;
use suagrana_repo::budget_repo::{BudgetPeriod, BudgetRepo, NewBudget};
use suagrana_repo::report;
use suagrana_repo::transaction_repo::{Filter, TransactionKind, TransactionRepo};

#[post("")]
pub async fn create_budget(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    principal: web::ReqData<Principal>,
    new_budget: web::Json<NewBudget>,
) -> Result<impl Responder, HandlerError> {
    let budget = budget_repo
        .create_budget(&principal.tenant_id, new_budget.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(budget))
}

#[get("")]
pub async fn get_all_budgets(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    principal: web::ReqData<Principal>,
) -> Result<impl Responder, HandlerError> {
    let budgets = budget_repo.get_all_budgets(&principal.tenant_id).await?;
    Ok(HttpResponse::Ok().json(budgets))
}

#[put("/{budget_id}")]
pub async fn update_budget(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    principal: web::ReqData<Principal>,
    budget_id: web::Path<i32>,
    updated_budget: web::Json<NewBudget>,
) -> Result<impl Responder, HandlerError> {
    let budget = budget_repo
        .update_budget(
            &principal.tenant_id,
            budget_id.into_inner(),
            updated_budget.into_inner(),
        )
        .await?;
    Ok(HttpResponse::Ok().json(budget))
}

#[delete("/{budget_id}")]
pub async fn delete_budget(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    principal: web::ReqData<Principal>,
    budget_id: web::Path<i32>,
) -> Result<impl Responder, HandlerError> {
    let budget = budget_repo
        .delete_budget(&principal.tenant_id, budget_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(budget))
}

/// Spending against every budget in the period containing `month`.
#[get("/status")]
pub async fn get_budget_status(
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    principal: web::ReqData<Principal>,
    query: web::Query<StatusQuery>,
) -> Result<impl Responder, HandlerError> {
    let month = query.month.unwrap_or_else(|| Local::now().date_naive());
    let budgets = budget_repo.get_all_budgets(&principal.tenant_id).await?;

    // The year covers both monthly and yearly periods
    let (year_start, year_end) = BudgetPeriod::Yearly.bounds(month);
    let filter = Filter {
        kind: Some(TransactionKind::Expense),
        ..Filter::between(Some(year_start), Some(year_end))
    };
    let transactions = transaction_repo
        .get_all_transactions(&principal.tenant_id, filter, None)
        .await?;

    Ok(HttpResponse::Ok().json(report::budget_status(&budgets, &transactions, month)))
}
