//! Aggregations behind the reporting endpoints.
//!
//! Everything here works on records already loaded from the repositories, so the same code serves
//! both backends.

use crate::account_repo::Account;
use crate::bill_repo::BillReminder;
use crate::budget_repo::{first_of_month, Budget};
use crate::category_repo::{Category, CategoryKind};
use crate::goal_repo::Goal;
use crate::investment_repo::{Dividend, Investment};
use crate::transaction_repo::{EntryType, Transaction, TransactionKind};
use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const UNCATEGORIZED: &str = "Uncategorized";
pub const TOP_CATEGORIES: usize = 5;
pub const BUDGET_ALERT_THRESHOLD: Decimal = Decimal::from_parts(80, 0, 0, false, 0);
pub const UPCOMING_BILL_DAYS: u64 = 7;

/// `part / whole` as a percentage with two decimal places, 0 when `whole` is 0.
///
/// Ratios too large for a `Decimal` saturate at `Decimal::MAX` (or `Decimal::MIN` when the signs
/// differ).
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    match part
        .checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    {
        Some(percentage) => percentage.round_dp(2),
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct MonthlyCashFlow {
    pub month: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// Change of `net` against the previous month, in percent. `None` when the previous net is
    /// zero or the change does not fit in a `Decimal`.
    pub trend: Option<Decimal>,
}

/// Buckets income and expense per calendar month between `from` and `until`.
///
/// Months without transactions are still reported. Transfers move money between the tenant's own
/// accounts and are left out.
pub fn cash_flow(
    transactions: &[Transaction],
    from: NaiveDate,
    until: NaiveDate,
) -> Vec<MonthlyCashFlow> {
    let mut buckets: Vec<MonthlyCashFlow> = Vec::new();
    let mut month = first_of_month(from);
    let last = first_of_month(until);
    while month <= last {
        buckets.push(MonthlyCashFlow {
            month,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
            net: Decimal::ZERO,
            trend: None,
        });
        match month.checked_add_months(Months::new(1)) {
            Some(next) => month = next,
            None => break,
        }
    }

    for transaction in transactions {
        if transaction.date < from || transaction.date > until {
            continue;
        }
        let month = first_of_month(transaction.date);
        let Some(bucket) = buckets.iter_mut().find(|b| b.month == month) else {
            continue;
        };
        match transaction.kind {
            TransactionKind::Income => bucket.income += transaction.total(EntryType::Debit),
            TransactionKind::Expense => bucket.expense += transaction.total(EntryType::Credit),
            TransactionKind::Transfer => {}
        }
    }

    let mut previous_net: Option<Decimal> = None;
    for bucket in buckets.iter_mut() {
        bucket.net = bucket.income - bucket.expense;
        bucket.trend = match previous_net {
            Some(previous) if !previous.is_zero() => bucket
                .net
                .checked_sub(previous)
                .and_then(|change| change.checked_div(previous.abs()))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|trend| trend.round_dp(2)),
            _ => None,
        };
        previous_net = Some(bucket.net);
    }
    buckets
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct CategorySpending {
    pub category_id: Option<i32>,
    pub name: String,
    pub total: Decimal,
    pub count: usize,
    pub percentage: Decimal,
}

/// Totals per category for transactions of the given kind, largest first.
///
/// Expense totals sum credit entries of expense transactions, income totals sum debit entries of
/// income transactions. Entries without a category share one "Uncategorized" row.
pub fn category_spending(
    transactions: &[Transaction],
    categories: &[Category],
    kind: CategoryKind,
) -> Vec<CategorySpending> {
    let (transaction_kind, entry_type) = match kind {
        CategoryKind::Income => (TransactionKind::Income, EntryType::Debit),
        CategoryKind::Expense => (TransactionKind::Expense, EntryType::Credit),
    };

    let mut totals: HashMap<Option<i32>, (Decimal, usize)> = HashMap::new();
    for transaction in transactions.iter().filter(|t| t.kind == transaction_kind) {
        for entry in transaction
            .entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
        {
            let total = totals.entry(entry.category_id).or_default();
            total.0 += entry.amount;
            total.1 += 1;
        }
    }

    let overall: Decimal = totals.values().map(|(total, _)| *total).sum();
    let mut spending: Vec<CategorySpending> = totals
        .into_iter()
        .map(|(category_id, (total, count))| {
            let name = category_id
                .and_then(|id| categories.iter().find(|c| c.id == id))
                .map_or_else(|| UNCATEGORIZED.to_owned(), |c| c.name.clone());
            CategorySpending {
                category_id,
                name,
                total,
                count,
                percentage: percentage(total, overall),
            }
        })
        .collect();
    spending.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    spending
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct BudgetStatus {
    #[serde(flatten)]
    pub budget: Budget,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
    pub over_budget: bool,
}

/// Spending against every budget for the period that contains `date`.
///
/// Budgets starting after that period are skipped. `transactions` must cover the whole period.
pub fn budget_status(
    budgets: &[Budget],
    transactions: &[Transaction],
    date: NaiveDate,
) -> Vec<BudgetStatus> {
    budgets
        .iter()
        .filter_map(|budget| {
            let (period_start, period_end) = budget.period.bounds(date);
            if budget.start_date > period_end {
                return None;
            }
            let spent: Decimal = transactions
                .iter()
                .filter(|t| t.kind == TransactionKind::Expense)
                .filter(|t| t.date >= period_start && t.date <= period_end)
                .flat_map(|t| t.entries.iter())
                .filter(|e| {
                    e.entry_type == EntryType::Credit && e.category_id == Some(budget.category_id)
                })
                .map(|e| e.amount)
                .sum();
            Some(BudgetStatus {
                budget: budget.clone(),
                period_start,
                period_end,
                spent,
                remaining: budget.amount - spent,
                percentage: percentage(spent, budget.amount),
                over_budget: spent > budget.amount,
            })
        })
        .collect()
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct InvestmentPerformance {
    #[serde(flatten)]
    pub investment: Investment,
    pub invested: Decimal,
    pub current_value: Decimal,
    pub gain: Decimal,
    pub gain_percentage: Decimal,
    pub dividends: Decimal,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub gain: Decimal,
    pub gain_percentage: Decimal,
    pub total_dividends: Decimal,
    pub investments: Vec<InvestmentPerformance>,
}

pub fn portfolio_summary(investments: &[Investment], dividends: &[Dividend]) -> PortfolioSummary {
    let performances: Vec<InvestmentPerformance> = investments
        .iter()
        .map(|investment| {
            let invested = investment.invested();
            let current_value = investment.current_value();
            let gain = current_value.saturating_sub(invested);
            InvestmentPerformance {
                investment: investment.clone(),
                invested,
                current_value,
                gain,
                gain_percentage: percentage(gain, invested),
                dividends: dividends
                    .iter()
                    .filter(|d| d.investment_id == investment.id)
                    .map(|d| d.amount)
                    .sum(),
            }
        })
        .collect();

    let total_invested = performances
        .iter()
        .fold(Decimal::ZERO, |total, p| total.saturating_add(p.invested));
    let current_value = performances
        .iter()
        .fold(Decimal::ZERO, |total, p| total.saturating_add(p.current_value));
    let gain = current_value.saturating_sub(total_invested);
    PortfolioSummary {
        total_invested,
        current_value,
        gain,
        gain_percentage: percentage(gain, total_invested),
        total_dividends: dividends.iter().map(|d| d.amount).sum(),
        investments: performances,
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct GoalSummary {
    pub count: usize,
    pub achieved: usize,
    pub total_target: Decimal,
    pub total_saved: Decimal,
    pub progress: Decimal,
}

pub fn goal_summary(goals: &[Goal]) -> GoalSummary {
    let total_target: Decimal = goals.iter().map(|g| g.target_amount).sum();
    let total_saved: Decimal = goals.iter().map(|g| g.current_amount).sum();
    GoalSummary {
        count: goals.len(),
        achieved: goals.iter().filter(|g| g.achieved()).count(),
        total_target,
        total_saved,
        progress: percentage(total_saved, total_target).min(Decimal::ONE_HUNDRED),
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Dashboard {
    pub month: NaiveDate,
    pub total_balance: Decimal,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub savings_rate: Decimal,
    pub top_expense_categories: Vec<CategorySpending>,
    pub budget_alerts: Vec<BudgetStatus>,
    pub upcoming_bills: usize,
    pub goals: GoalSummary,
}

/// Records a dashboard is computed from.
pub struct DashboardInput<'a> {
    pub accounts: &'a [Account],
    pub categories: &'a [Category],
    /// Transactions of the whole year containing the month, so yearly budgets can be evaluated.
    pub transactions: &'a [Transaction],
    pub budgets: &'a [Budget],
    pub bills: &'a [BillReminder],
    pub goals: &'a [Goal],
}

pub fn dashboard(input: DashboardInput, month: NaiveDate, today: NaiveDate) -> Dashboard {
    let month = first_of_month(month);
    let month_end = month
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX);
    let month_transactions: Vec<Transaction> = input
        .transactions
        .iter()
        .filter(|t| t.date >= month && t.date <= month_end)
        .cloned()
        .collect();

    let flow = cash_flow(&month_transactions, month, month_end);
    let (income, expense) = flow
        .first()
        .map_or((Decimal::ZERO, Decimal::ZERO), |m| (m.income, m.expense));
    let net = income - expense;

    let mut top_expense_categories =
        category_spending(&month_transactions, input.categories, CategoryKind::Expense);
    top_expense_categories.truncate(TOP_CATEGORIES);

    let budget_alerts = budget_status(input.budgets, input.transactions, month)
        .into_iter()
        .filter(|s| s.percentage > BUDGET_ALERT_THRESHOLD)
        .collect();

    Dashboard {
        month,
        total_balance: input
            .accounts
            .iter()
            .filter(|a| !a.archived)
            .map(|a| a.balance)
            .sum(),
        income,
        expense,
        net,
        savings_rate: percentage(net, income),
        top_expense_categories,
        budget_alerts,
        upcoming_bills: input
            .bills
            .iter()
            .filter(|b| b.is_due_within(today, UPCOMING_BILL_DAYS))
            .count(),
        goals: goal_summary(input.goals),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_repo::{AccountType, NewAccount};
    use crate::bill_repo::{NewBillReminder, Recurrence};
    use crate::budget_repo::{BudgetPeriod, NewBudget};
    use crate::category_repo::NewCategory;
    use crate::goal_repo::NewGoal;
    use crate::investment_repo::{InvestmentType, NewDividend, NewInvestment};
    use crate::transaction_repo::{Entry, NewTransaction};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn income(id: i32, date: NaiveDate, category_id: Option<i32>, amount: i64) -> Transaction {
        NewTransaction::new(
            "income".to_owned(),
            date,
            TransactionKind::Income,
            None,
            vec![Entry::debit(1, category_id, Decimal::from(amount))],
        )
        .to_transaction(id)
    }

    fn expense(id: i32, date: NaiveDate, category_id: Option<i32>, amount: i64) -> Transaction {
        NewTransaction::new(
            "expense".to_owned(),
            date,
            TransactionKind::Expense,
            None,
            vec![Entry::credit(1, category_id, Decimal::from(amount))],
        )
        .to_transaction(id)
    }

    fn transfer(id: i32, date: NaiveDate, amount: i64) -> Transaction {
        NewTransaction::new(
            "transfer".to_owned(),
            date,
            TransactionKind::Transfer,
            None,
            vec![
                Entry::credit(1, None, Decimal::from(amount)),
                Entry::debit(2, None, Decimal::from(amount)),
            ],
        )
        .to_transaction(id)
    }

    fn categories() -> Vec<Category> {
        vec![
            NewCategory::new("Food".to_owned(), CategoryKind::Expense, None).to_category(1),
            NewCategory::new("Rent".to_owned(), CategoryKind::Expense, None).to_category(2),
            NewCategory::new("Salary".to_owned(), CategoryKind::Income, None).to_category(3),
        ]
    }

    #[test]
    fn percentage_of_zero() {
        assert_eq!(Decimal::ZERO, percentage(Decimal::from(5), Decimal::ZERO));
        assert_eq!(
            Decimal::new(3333, 2),
            percentage(Decimal::ONE, Decimal::from(3))
        );
    }

    #[test]
    fn cash_flow_fills_empty_months() {
        let transactions = vec![
            income(1, date(2024, 1, 5), Some(3), 1000),
            expense(2, date(2024, 1, 20), Some(1), 400),
            transfer(3, date(2024, 1, 21), 250),
            income(4, date(2024, 3, 5), Some(3), 1000),
            expense(5, date(2024, 3, 9), Some(2), 100),
        ];

        let flow = cash_flow(&transactions, date(2024, 1, 1), date(2024, 3, 31));
        let months: Vec<NaiveDate> = flow.iter().map(|m| m.month).collect();
        assert_eq!(
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)],
            months
        );

        assert_eq!(Decimal::from(1000), flow[0].income);
        assert_eq!(Decimal::from(400), flow[0].expense);
        assert_eq!(Decimal::from(600), flow[0].net);
        assert_eq!(None, flow[0].trend);

        assert_eq!(Decimal::ZERO, flow[1].net);
        assert_eq!(Some(Decimal::from(-100)), flow[1].trend);

        // Previous month net was zero
        assert_eq!(Decimal::from(900), flow[2].net);
        assert_eq!(None, flow[2].trend);
    }

    #[test]
    fn cash_flow_trend_against_negative_month() {
        let transactions = vec![
            expense(1, date(2024, 5, 2), None, 200),
            income(2, date(2024, 6, 2), None, 100),
        ];

        let flow = cash_flow(&transactions, date(2024, 5, 1), date(2024, 6, 30));
        assert_eq!(Decimal::from(-200), flow[0].net);
        assert_eq!(Decimal::from(100), flow[1].net);
        assert_eq!(Some(Decimal::from(150)), flow[1].trend);
    }

    #[test]
    fn cash_flow_trend_too_large() {
        let transactions = vec![
            NewTransaction::new(
                "interest".to_owned(),
                date(2024, 5, 2),
                TransactionKind::Income,
                None,
                vec![Entry::debit(1, None, Decimal::new(1, 22))],
            )
            .to_transaction(1),
            income(2, date(2024, 6, 2), None, 10_000_000),
        ];

        let flow = cash_flow(&transactions, date(2024, 5, 1), date(2024, 6, 30));
        assert_eq!(Decimal::from(10_000_000), flow[1].net);
        assert_eq!(None, flow[1].trend);
    }

    #[test]
    fn category_spending_sorted_with_uncategorized() {
        let transactions = vec![
            expense(1, date(2024, 1, 2), Some(1), 300),
            expense(2, date(2024, 1, 3), Some(2), 500),
            expense(3, date(2024, 1, 4), Some(1), 100),
            expense(4, date(2024, 1, 5), None, 100),
            income(5, date(2024, 1, 6), Some(3), 5000),
        ];

        let spending = category_spending(&transactions, &categories(), CategoryKind::Expense);
        let names: Vec<&str> = spending.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(vec!["Rent", "Food", UNCATEGORIZED], names);

        assert_eq!(Decimal::from(400), spending[1].total);
        assert_eq!(2, spending[1].count);
        assert_eq!(Decimal::new(4000, 2), spending[1].percentage);
        assert_eq!(None, spending[2].category_id);
    }

    #[test]
    fn category_spending_income() {
        let transactions = vec![
            income(1, date(2024, 1, 6), Some(3), 5000),
            expense(2, date(2024, 1, 3), Some(2), 500),
        ];

        let spending = category_spending(&transactions, &categories(), CategoryKind::Income);
        assert_eq!(1, spending.len());
        assert_eq!("Salary", spending[0].name);
        assert_eq!(Decimal::ONE_HUNDRED, spending[0].percentage);
    }

    #[test]
    fn budget_status_per_period() {
        let budgets = vec![
            NewBudget::new(1, BudgetPeriod::Monthly, Decimal::from(500), date(2024, 1, 1))
                .to_budget(1),
            NewBudget::new(1, BudgetPeriod::Yearly, Decimal::from(1000), date(2024, 1, 1))
                .to_budget(2),
            NewBudget::new(2, BudgetPeriod::Monthly, Decimal::ZERO, date(2024, 1, 1))
                .to_budget(3),
            NewBudget::new(2, BudgetPeriod::Monthly, Decimal::from(10), date(2025, 1, 1))
                .to_budget(4),
        ];
        let transactions = vec![
            expense(1, date(2024, 1, 10), Some(1), 450),
            expense(2, date(2024, 2, 10), Some(1), 200),
            expense(3, date(2024, 2, 11), Some(1), 400),
            income(4, date(2024, 2, 12), None, 5000),
        ];

        let status = budget_status(&budgets, &transactions, date(2024, 2, 15));
        assert_eq!(3, status.len());

        let monthly = &status[0];
        assert_eq!(date(2024, 2, 1), monthly.period_start);
        assert_eq!(date(2024, 2, 29), monthly.period_end);
        assert_eq!(Decimal::from(600), monthly.spent);
        assert_eq!(Decimal::from(-100), monthly.remaining);
        assert_eq!(Decimal::from(120), monthly.percentage);
        assert!(monthly.over_budget);

        let yearly = &status[1];
        assert_eq!(Decimal::from(1050), yearly.spent);
        assert!(yearly.over_budget);

        let empty = &status[2];
        assert_eq!(Decimal::ZERO, empty.spent);
        assert_eq!(Decimal::ZERO, empty.percentage);
        assert!(!empty.over_budget);
    }

    #[test]
    fn budget_status_tiny_amount() {
        let budgets = vec![
            NewBudget::new(1, BudgetPeriod::Monthly, Decimal::new(1, 22), date(2024, 1, 1))
                .to_budget(1),
        ];
        let transactions = vec![expense(1, date(2024, 2, 10), Some(1), 10_000_000)];

        let status = budget_status(&budgets, &transactions, date(2024, 2, 15));
        assert_eq!(Decimal::MAX, status[0].percentage);
        assert!(status[0].over_budget);
    }

    #[test]
    fn percentage_saturates() {
        assert_eq!(Decimal::MAX, percentage(Decimal::MAX, Decimal::new(1, 2)));
        assert_eq!(Decimal::MIN, percentage(Decimal::MAX, Decimal::new(-1, 2)));
        assert_eq!(Decimal::ZERO, percentage(Decimal::MAX, Decimal::ZERO));
    }

    #[test]
    fn portfolio() {
        let investments = vec![
            NewInvestment::new(
                "A".to_owned(),
                None,
                InvestmentType::Stock,
                Decimal::from(10),
                Decimal::from(10),
                Decimal::from(15),
            )
            .to_investment(1),
            NewInvestment::new(
                "B".to_owned(),
                None,
                InvestmentType::Crypto,
                Decimal::from(2),
                Decimal::from(50),
                Decimal::from(25),
            )
            .to_investment(2),
        ];
        let dividends = vec![
            NewDividend::new(Decimal::from(3), date(2024, 1, 1)).to_dividend(1, 1),
            NewDividend::new(Decimal::from(2), date(2024, 2, 1)).to_dividend(2, 1),
        ];

        let summary = portfolio_summary(&investments, &dividends);
        assert_eq!(Decimal::from(200), summary.total_invested);
        assert_eq!(Decimal::from(200), summary.current_value);
        assert_eq!(Decimal::ZERO, summary.gain);
        assert_eq!(Decimal::ZERO, summary.gain_percentage);
        assert_eq!(Decimal::from(5), summary.total_dividends);

        assert_eq!(Decimal::from(50), summary.investments[0].gain_percentage);
        assert_eq!(Decimal::from(5), summary.investments[0].dividends);
        assert_eq!(Decimal::from(-50), summary.investments[1].gain_percentage);
    }

    #[test]
    fn portfolio_value_saturates() {
        let investments = vec![NewInvestment::new(
            "Whale".to_owned(),
            None,
            InvestmentType::Crypto,
            Decimal::MAX,
            Decimal::from(2),
            Decimal::from(3),
        )
        .to_investment(1)];

        let summary = portfolio_summary(&investments, &[]);
        assert_eq!(Decimal::MAX, summary.total_invested);
        assert_eq!(Decimal::MAX, summary.current_value);
        assert_eq!(Decimal::ZERO, summary.gain);
    }

    #[test]
    fn empty_portfolio() {
        let summary = portfolio_summary(&[], &[]);
        assert_eq!(Decimal::ZERO, summary.gain_percentage);
        assert!(summary.investments.is_empty());
    }

    #[test]
    fn dashboard_summary() {
        let mut archived = NewAccount::new(
            "Old".to_owned(),
            AccountType::Savings,
            Decimal::from(999),
            "BRL".to_owned(),
        );
        archived.archived = true;
        let accounts = vec![
            NewAccount::new(
                "Checking".to_owned(),
                AccountType::Checking,
                Decimal::ZERO,
                "BRL".to_owned(),
            )
            .to_account(1, Decimal::from(1500)),
            archived.to_account(2, Decimal::from(999)),
        ];
        let transactions = vec![
            income(1, date(2024, 4, 1), Some(3), 4000),
            expense(2, date(2024, 4, 3), Some(1), 900),
            expense(3, date(2024, 4, 4), Some(2), 2100),
            expense(4, date(2024, 3, 30), Some(1), 700),
        ];
        let budgets = vec![
            NewBudget::new(1, BudgetPeriod::Monthly, Decimal::from(1000), date(2024, 1, 1))
                .to_budget(1),
            NewBudget::new(2, BudgetPeriod::Monthly, Decimal::from(3000), date(2024, 1, 1))
                .to_budget(2),
        ];
        let bills = vec![
            NewBillReminder::new(
                "Power".to_owned(),
                Decimal::from(120),
                date(2024, 4, 12),
                Recurrence::Monthly,
                None,
            )
            .to_bill(1),
            NewBillReminder::new(
                "Insurance".to_owned(),
                Decimal::from(80),
                date(2024, 4, 30),
                Recurrence::Yearly,
                None,
            )
            .to_bill(2),
        ];
        let goals = vec![
            NewGoal::new("Trip".to_owned(), Decimal::from(1000), Decimal::from(1000), None)
                .to_goal(1),
            NewGoal::new("Car".to_owned(), Decimal::from(3000), Decimal::from(1000), None)
                .to_goal(2),
        ];
        let categories = categories();

        let dashboard = dashboard(
            DashboardInput {
                accounts: &accounts,
                categories: &categories,
                transactions: &transactions,
                budgets: &budgets,
                bills: &bills,
                goals: &goals,
            },
            date(2024, 4, 18),
            date(2024, 4, 10),
        );

        assert_eq!(date(2024, 4, 1), dashboard.month);
        assert_eq!(Decimal::from(1500), dashboard.total_balance);
        assert_eq!(Decimal::from(4000), dashboard.income);
        assert_eq!(Decimal::from(3000), dashboard.expense);
        assert_eq!(Decimal::from(1000), dashboard.net);
        assert_eq!(Decimal::from(25), dashboard.savings_rate);

        let top: Vec<&str> = dashboard
            .top_expense_categories
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(vec!["Rent", "Food"], top);

        assert_eq!(1, dashboard.budget_alerts.len());
        assert_eq!(1, dashboard.budget_alerts[0].budget.id);
        assert_eq!(1, dashboard.upcoming_bills);

        assert_eq!(2, dashboard.goals.count);
        assert_eq!(1, dashboard.goals.achieved);
        assert_eq!(Decimal::from(50), dashboard.goals.progress);
    }

    #[test]
    fn dashboard_without_income() {
        let dashboard = dashboard(
            DashboardInput {
                accounts: &[],
                categories: &[],
                transactions: &[expense(1, date(2024, 4, 3), None, 10)],
                budgets: &[],
                bills: &[],
                goals: &[],
            },
            date(2024, 4, 1),
            date(2024, 4, 1),
        );
        assert_eq!(Decimal::ZERO, dashboard.savings_rate);
        assert_eq!(Decimal::from(-10), dashboard.net);
        assert_eq!(Decimal::ZERO, dashboard.goals.progress);
    }
}
