use crate::cache::ReportCache;
use crate::error::HandlerError;
use crate::report::{
    cached_report, current_month, last_twelve_months, CategorySpendingQuery, DashboardQuery,
    RangeQuery,
};
use crate::user::Principal;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Local;
use std::sync::Arc;
use suagrana_repo::account_repo::AccountRepo;
use suagrana_repo::bill_repo::BillRepo;
use suagrana_repo::budget_repo::{BudgetPeriod, BudgetRepo};
use suagrana_repo::category_repo::{CategoryKind, CategoryRepo};
use suagrana_repo::goal_repo::GoalRepo;
use suagrana_repo::report::{self, DashboardInput};
use suagrana_repo::transaction_repo::{Filter, TransactionKind, TransactionRepo};

#[get("/cash-flow")]
pub async fn get_cash_flow(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    cache: web::Data<ReportCache>,
    principal: web::ReqData<Principal>,
    query: web::Query<RangeQuery>,
) -> Result<impl Responder, HandlerError> {
    let (from, until) = query.resolve(last_twelve_months)?;
    let tenant = &principal.tenant_id;

    let params = format!("{}:{}", from, until);
    let report = cached_report(&cache, tenant, "cash-flow", &params, || async move {
        let transactions = transaction_repo
            .get_all_transactions(tenant, Filter::between(Some(from), Some(until)), None)
            .await?;
        Ok::<_, HandlerError>(report::cash_flow(&transactions, from, until))
    })
    .await?;
    Ok(HttpResponse::Ok().json(report))
}

#[get("/category-spending")]
pub async fn get_category_spending(
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    cache: web::Data<ReportCache>,
    principal: web::ReqData<Principal>,
    query: web::Query<CategorySpendingQuery>,
) -> Result<impl Responder, HandlerError> {
    let (from, until) = query.range().resolve(current_month)?;
    let kind = query.kind;
    let tenant = &principal.tenant_id;

    let params = format!("{}:{}:{}", from, until, kind);
    let report = cached_report(&cache, tenant, "category-spending", &params, || async move {
        let transaction_kind = match kind {
            CategoryKind::Income => TransactionKind::Income,
            CategoryKind::Expense => TransactionKind::Expense,
        };
        let filter = Filter {
            kind: Some(transaction_kind),
            ..Filter::between(Some(from), Some(until))
        };
        let transactions = transaction_repo
            .get_all_transactions(tenant, filter, None)
            .await?;
        let categories = category_repo.get_all_categories(tenant).await?;
        Ok::<_, HandlerError>(report::category_spending(
            &transactions,
            &categories,
            kind,
        ))
    })
    .await?;
    Ok(HttpResponse::Ok().json(report))
}

#[allow(clippy::too_many_arguments)]
#[get("/dashboard")]
pub async fn get_dashboard(
    account_repo: web::Data<Arc<dyn AccountRepo>>,
    category_repo: web::Data<Arc<dyn CategoryRepo>>,
    transaction_repo: web::Data<Arc<dyn TransactionRepo>>,
    budget_repo: web::Data<Arc<dyn BudgetRepo>>,
    bill_repo: web::Data<Arc<dyn BillRepo>>,
    goal_repo: web::Data<Arc<dyn GoalRepo>>,
    cache: web::Data<ReportCache>,
    principal: web::ReqData<Principal>,
    query: web::Query<DashboardQuery>,
) -> Result<impl Responder, HandlerError> {
    let today = Local::now().date_naive();
    let month = query.month.unwrap_or(today);
    let tenant = &principal.tenant_id;

    // Upcoming bills depend on the current day
    let params = format!("{}:{}", current_month(month).0, today);
    let report = cached_report(&cache, tenant, "dashboard", &params, || async move {
        let (year_start, year_end) = BudgetPeriod::Yearly.bounds(month);
        let transactions = transaction_repo
            .get_all_transactions(
                tenant,
                Filter::between(Some(year_start), Some(year_end)),
                None,
            )
            .await?;
        let accounts = account_repo.get_all_accounts(tenant).await?;
        let categories = category_repo.get_all_categories(tenant).await?;
        let budgets = budget_repo.get_all_budgets(tenant).await?;
        let bills = bill_repo.get_all_bills(tenant).await?;
        let goals = goal_repo.get_all_goals(tenant).await?;

        let input = DashboardInput {
            accounts: &accounts,
            categories: &categories,
            transactions: &transactions,
            budgets: &budgets,
            bills: &bills,
            goals: &goals,
        };
        Ok::<_, HandlerError>(report::dashboard(input, month, today))
    })
    .await?;
    Ok(HttpResponse::Ok().json(report))
}
