extern crate rstest;
extern crate serde_json;

use actix_web::http::StatusCode;
use actix_web::test;
use actix_web::test::TestRequest;
use actix_web::web::Data;
use chrono::{Days, Local, NaiveDate};
use rstest::rstest;
use rust_decimal_macros::dec;
use suagrana_lib::cache::ReportCache;
use suagrana_lib::goal::GoalView;
use suagrana_repo::account_repo::{AccountType, NewAccount};
use suagrana_repo::bill_repo::{BillReminder, NewBillReminder, Recurrence};
use suagrana_repo::budget_repo::{Budget, BudgetPeriod, NewBudget};
use suagrana_repo::category_repo::{Category, CategoryKind, NewCategory};
use suagrana_repo::goal_repo::NewGoal;
use suagrana_repo::investment_repo::{
    Dividend, Investment, InvestmentType, NewDividend, NewInvestment,
};
use suagrana_repo::report::{BudgetStatus, PortfolioSummary};
use suagrana_repo::transaction_repo::{Entry, NewTransaction, Transaction, TransactionKind};
use suagrana_repo::Repos;
use tracing::instrument;
use utils::{cache, repos, tracing_setup, TestTenant};

#[macro_use]
mod utils;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[instrument(skip(repos, cache))]
#[rstest]
#[actix_rt::test]
async fn test_categories(_tracing_setup: &(), repos: Repos, cache: Data<ReportCache>) {
    let tenant = TestTenant::new(&repos).await;
    let app = build_app!(repos, cache, tenant.principal.clone());
    let service = test::init_service(app).await;

    let new_category = NewCategory::new(
        "Groceries".to_owned(),
        CategoryKind::Expense,
        Some("#2e7d32".to_owned()),
    );
    let category: Category = call_ok!(
        &service,
        TestRequest::post()
            .uri("/api/categories")
            .set_json(&new_category)
    );
    assert_eq!(new_category.name, category.name);

    let (status, _) = call_json!(
        &service,
        TestRequest::post()
            .uri("/api/categories")
            .set_json(&new_category)
    );
    assert_eq!(StatusCode::CONFLICT, status);

    let renamed: Category = call_ok!(
        &service,
        TestRequest::put()
            .uri(&format!("/api/categories/{}", category.id))
            .set_json(NewCategory::new(
                "Supermarket".to_owned(),
                CategoryKind::Expense,
                None
            ))
    );
    assert_eq!("Supermarket", renamed.name);
    assert_eq!(None, renamed.color);

    let categories: Vec<Category> = call_ok!(&service, TestRequest::get().uri("/api/categories"));
    assert_eq!(vec![renamed.clone()], categories);

    let deleted: Category = call_ok!(
        &service,
        TestRequest::delete().uri(&format!("/api/categories/{}", category.id))
    );
    assert_eq!(renamed, deleted);

    tenant.delete().await
}

#[instrument(skip(repos, cache))]
#[rstest]
#[actix_rt::test]
async fn test_budget_status(_tracing_setup: &(), repos: Repos, cache: Data<ReportCache>) {
    let tenant = TestTenant::new(&repos).await;
    let account = repos
        .account_repo
        .create_account(
            tenant.id(),
            NewAccount::new(
                "Checking".to_owned(),
                AccountType::Checking,
                dec!(0),
                "BRL".to_owned(),
            ),
        )
        .await
        .unwrap();
    let food = repos
        .category_repo
        .create_category(
            tenant.id(),
            NewCategory::new("Food".to_owned(), CategoryKind::Expense, None),
        )
        .await
        .unwrap();
    let app = build_app!(repos, cache, tenant.principal.clone());
    let service = test::init_service(app).await;

    let (status, _) = call_json!(
        &service,
        TestRequest::post().uri("/api/budgets").set_json(NewBudget::new(
            food.id + 1000,
            BudgetPeriod::Monthly,
            dec!(500),
            date(2024, 1, 1)
        ))
    );
    assert_eq!(StatusCode::BAD_REQUEST, status);

    let monthly: Budget = call_ok!(
        &service,
        TestRequest::post().uri("/api/budgets").set_json(NewBudget::new(
            food.id,
            BudgetPeriod::Monthly,
            dec!(500),
            date(2024, 1, 1)
        ))
    );
    let yearly: Budget = call_ok!(
        &service,
        TestRequest::post().uri("/api/budgets").set_json(NewBudget::new(
            food.id,
            BudgetPeriod::Yearly,
            dec!(1000),
            date(2024, 1, 1)
        ))
    );

    for (day, amount) in [(date(2024, 2, 10), dec!(300)), (date(2024, 3, 5), dec!(450))] {
        let _: Transaction = call_ok!(
            &service,
            TestRequest::post()
                .uri("/api/transactions")
                .set_json(NewTransaction::new(
                    "Restaurant".to_owned(),
                    day,
                    TransactionKind::Expense,
                    None,
                    vec![Entry::credit(account.id, Some(food.id), amount)],
                ))
        );
    }

    let statuses: Vec<BudgetStatus> = call_ok!(
        &service,
        TestRequest::get().uri("/api/budgets/status?month=2024-03-15")
    );
    assert_eq!(2, statuses.len());

    let march = statuses.iter().find(|s| s.budget == monthly).unwrap();
    assert_eq!(date(2024, 3, 1), march.period_start);
    assert_eq!(date(2024, 3, 31), march.period_end);
    assert_eq!(dec!(450), march.spent);
    assert_eq!(dec!(50), march.remaining);
    assert_eq!(dec!(90), march.percentage);
    assert!(!march.over_budget);

    let year = statuses.iter().find(|s| s.budget == yearly).unwrap();
    assert_eq!(dec!(750), year.spent);
    assert_eq!(dec!(75), year.percentage);

    let update = NewBudget::new(food.id, BudgetPeriod::Monthly, dec!(400), date(2024, 1, 1));
    let _: Budget = call_ok!(
        &service,
        TestRequest::put()
            .uri(&format!("/api/budgets/{}", monthly.id))
            .set_json(&update)
    );
    let _: Budget = call_ok!(
        &service,
        TestRequest::delete().uri(&format!("/api/budgets/{}", yearly.id))
    );

    let statuses: Vec<BudgetStatus> = call_ok!(
        &service,
        TestRequest::get().uri("/api/budgets/status?month=2024-03-01")
    );
    assert_eq!(1, statuses.len());
    assert!(statuses[0].over_budget);
    assert_eq!(dec!(-50), statuses[0].remaining);

    // Budgets starting later are left out
    let statuses: Vec<BudgetStatus> = call_ok!(
        &service,
        TestRequest::get().uri("/api/budgets/status?month=2023-12-01")
    );
    assert!(statuses.is_empty());

    tenant.delete().await
}

#[instrument(skip(repos, cache))]
#[rstest]
#[actix_rt::test]
async fn test_goal_contributions(_tracing_setup: &(), repos: Repos, cache: Data<ReportCache>) {
    let tenant = TestTenant::new(&repos).await;
    let app = build_app!(repos, cache, tenant.principal.clone());
    let service = test::init_service(app).await;

    let goal: GoalView = call_ok!(
        &service,
        TestRequest::post().uri("/api/goals").set_json(NewGoal::new(
            "Emergency fund".to_owned(),
            dec!(3000),
            dec!(0),
            Some(date(2025, 12, 31))
        ))
    );
    assert_eq!(dec!(0), goal.progress);
    assert!(!goal.achieved);

    let uri = format!("/api/goals/{}/contribute", goal.goal.id);
    let goal: GoalView = call_ok!(
        &service,
        TestRequest::post()
            .uri(&uri)
            .set_json(serde_json::json!({ "amount": "1000" }))
    );
    assert_eq!(dec!(1000), goal.goal.current_amount);
    assert_eq!(dec!(33.33), goal.progress);

    let goal: GoalView = call_ok!(
        &service,
        TestRequest::post()
            .uri(&uri)
            .set_json(serde_json::json!({ "amount": "2500" }))
    );
    assert_eq!(dec!(100), goal.progress);
    assert!(goal.achieved);

    // Withdrawals never go below zero
    let goal: GoalView = call_ok!(
        &service,
        TestRequest::post()
            .uri(&uri)
            .set_json(serde_json::json!({ "amount": "-5000" }))
    );
    assert_eq!(dec!(0), goal.goal.current_amount);

    let fetched: GoalView = call_ok!(
        &service,
        TestRequest::get().uri(&format!("/api/goals/{}", goal.goal.id))
    );
    assert_eq!(goal, fetched);

    let _: GoalView = call_ok!(
        &service,
        TestRequest::delete().uri(&format!("/api/goals/{}", goal.goal.id))
    );
    let (status, _) = call_json!(
        &service,
        TestRequest::post()
            .uri(&uri)
            .set_json(serde_json::json!({ "amount": "10" }))
    );
    assert_eq!(StatusCode::NOT_FOUND, status);

    tenant.delete().await
}

#[instrument(skip(repos, cache))]
#[rstest]
#[actix_rt::test]
async fn test_goal_tiny_target(_tracing_setup: &(), repos: Repos, cache: Data<ReportCache>) {
    let tenant = TestTenant::new(&repos).await;
    let app = build_app!(repos, cache, tenant.principal.clone());
    let service = test::init_service(app).await;

    let goal: GoalView = call_ok!(
        &service,
        TestRequest::post().uri("/api/goals").set_json(NewGoal::new(
            "Rounding".to_owned(),
            dec!(0.0000000000000000000001),
            dec!(10000000),
            None
        ))
    );
    assert_eq!(dec!(100), goal.progress);

    let goals: Vec<GoalView> = call_ok!(&service, TestRequest::get().uri("/api/goals"));
    assert_eq!(vec![goal], goals);

    let (status, body) = call_json!(&service, TestRequest::get().uri("/api/reports/dashboard"));
    assert_eq!(StatusCode::OK, status);
    assert_eq!("100", body["goals"]["progress"]);

    tenant.delete().await
}

#[instrument(skip(repos, cache))]
#[rstest]
#[actix_rt::test]
async fn test_bills(_tracing_setup: &(), repos: Repos, cache: Data<ReportCache>) {
    let tenant = TestTenant::new(&repos).await;
    let app = build_app!(repos, cache, tenant.principal.clone());
    let service = test::init_service(app).await;

    let today = Local::now().date_naive();
    let in_days = |days| today.checked_add_days(Days::new(days)).unwrap();

    let rent: BillReminder = call_ok!(
        &service,
        TestRequest::post().uri("/api/bills").set_json(NewBillReminder::new(
            "Rent".to_owned(),
            dec!(1500),
            in_days(3),
            Recurrence::Monthly,
            None
        ))
    );
    let insurance: BillReminder = call_ok!(
        &service,
        TestRequest::post().uri("/api/bills").set_json(NewBillReminder::new(
            "Insurance".to_owned(),
            dec!(900),
            in_days(20),
            Recurrence::Once,
            None
        ))
    );

    let upcoming: Vec<BillReminder> =
        call_ok!(&service, TestRequest::get().uri("/api/bills/upcoming"));
    assert_eq!(vec![rent.clone()], upcoming);

    let upcoming: Vec<BillReminder> = call_ok!(
        &service,
        TestRequest::get().uri("/api/bills/upcoming?days=30")
    );
    assert_eq!(2, upcoming.len());

    // Recurring bills move to the next due date
    let paid: BillReminder = call_ok!(
        &service,
        TestRequest::post().uri(&format!("/api/bills/{}/pay", rent.id))
    );
    assert!(!paid.paid);
    assert!(paid.due_date > rent.due_date);

    // One-off bills are settled
    let paid: BillReminder = call_ok!(
        &service,
        TestRequest::post().uri(&format!("/api/bills/{}/pay", insurance.id))
    );
    assert!(paid.paid);
    assert_eq!(insurance.due_date, paid.due_date);

    // Next month's rent falls outside the 30 day window
    let upcoming: Vec<BillReminder> = call_ok!(
        &service,
        TestRequest::get().uri("/api/bills/upcoming?days=30")
    );
    assert!(upcoming.is_empty());

    let upcoming: Vec<BillReminder> = call_ok!(
        &service,
        TestRequest::get().uri("/api/bills/upcoming?days=40")
    );
    assert_eq!(1, upcoming.len());
    assert_eq!(rent.id, upcoming[0].id);

    let (status, _) = call_json!(
        &service,
        TestRequest::post().uri(&format!("/api/bills/{}/pay", insurance.id + 1000))
    );
    assert_eq!(StatusCode::NOT_FOUND, status);

    tenant.delete().await
}

#[instrument(skip(repos, cache))]
#[rstest]
#[actix_rt::test]
async fn test_portfolio(_tracing_setup: &(), repos: Repos, cache: Data<ReportCache>) {
    let tenant = TestTenant::new(&repos).await;
    let app = build_app!(repos, cache, tenant.principal.clone());
    let service = test::init_service(app).await;

    let stock: Investment = call_ok!(
        &service,
        TestRequest::post()
            .uri("/api/investments")
            .set_json(NewInvestment::new(
                "Petrobras".to_owned(),
                Some("PETR4".to_owned()),
                InvestmentType::Stock,
                dec!(100),
                dec!(30),
                dec!(36),
            ))
    );
    let fund: Investment = call_ok!(
        &service,
        TestRequest::post()
            .uri("/api/investments")
            .set_json(NewInvestment::new(
                "Tesouro Selic".to_owned(),
                None,
                InvestmentType::Bond,
                dec!(1),
                dec!(1000),
                dec!(900),
            ))
    );

    let dividend: Dividend = call_ok!(
        &service,
        TestRequest::post()
            .uri(&format!("/api/investments/{}/dividends", stock.id))
            .set_json(NewDividend::new(dec!(45.50), date(2024, 4, 20)))
    );
    assert_eq!(stock.id, dividend.investment_id);

    let (status, _) = call_json!(
        &service,
        TestRequest::post()
            .uri(&format!("/api/investments/{}/dividends", fund.id + 1000))
            .set_json(NewDividend::new(dec!(1), date(2024, 4, 20)))
    );
    assert_eq!(StatusCode::NOT_FOUND, status);

    let dividends: Vec<Dividend> = call_ok!(
        &service,
        TestRequest::get().uri(&format!("/api/investments/{}/dividends", stock.id))
    );
    assert_eq!(vec![dividend.clone()], dividends);
    let dividends: Vec<Dividend> = call_ok!(
        &service,
        TestRequest::get().uri("/api/investments/dividends")
    );
    assert_eq!(vec![dividend], dividends);

    let portfolio: PortfolioSummary = call_ok!(
        &service,
        TestRequest::get().uri("/api/investments/portfolio")
    );
    assert_eq!(dec!(4000), portfolio.total_invested);
    assert_eq!(dec!(4500), portfolio.current_value);
    assert_eq!(dec!(500), portfolio.gain);
    assert_eq!(dec!(12.5), portfolio.gain_percentage);
    assert_eq!(dec!(45.50), portfolio.total_dividends);

    let petr = portfolio
        .investments
        .iter()
        .find(|p| p.investment == stock)
        .unwrap();
    assert_eq!(dec!(600), petr.gain);
    assert_eq!(dec!(20), petr.gain_percentage);
    let selic = portfolio
        .investments
        .iter()
        .find(|p| p.investment == fund)
        .unwrap();
    assert_eq!(dec!(-100), selic.gain);
    assert_eq!(dec!(-10), selic.gain_percentage);

    tenant.delete().await
}
