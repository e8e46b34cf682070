use async_trait::async_trait;
use chrono::{Datelike, Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPeriod {
    Monthly,
    Yearly,
}

text_enum!(BudgetPeriod {
    Monthly => "monthly",
    Yearly => "yearly",
});

impl BudgetPeriod {
    /// First and last day of the period containing `date`.
    pub fn bounds(&self, date: NaiveDate) -> (NaiveDate, NaiveDate) {
        let (first, months) = match self {
            BudgetPeriod::Monthly => (first_of_month(date), 1),
            BudgetPeriod::Yearly => (date - Days::new(u64::from(date.ordinal0())), 12),
        };
        let last = first
            .checked_add_months(Months::new(months))
            .and_then(|next| next.pred_opt())
            .unwrap_or(NaiveDate::MAX);
        (first, last)
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Budget {
    pub id: i32,
    pub category_id: i32,
    pub period: BudgetPeriod,
    pub amount: Decimal,
    pub start_date: NaiveDate,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewBudget {
    pub category_id: i32,
    pub period: BudgetPeriod,
    pub amount: Decimal,
    pub start_date: NaiveDate,
}

impl NewBudget {
    pub fn new(
        category_id: i32,
        period: BudgetPeriod,
        amount: Decimal,
        start_date: NaiveDate,
    ) -> NewBudget {
        NewBudget {
            category_id,
            period,
            amount,
            start_date,
        }
    }

    pub fn to_budget(self, id: i32) -> Budget {
        Budget {
            id,
            category_id: self.category_id,
            period: self.period,
            amount: self.amount,
            start_date: self.start_date,
        }
    }
}

#[derive(Error, Debug)]
pub enum BudgetRepoError {
    #[error("Budget with id {0} not found")]
    BudgetNotFound(i32),
    #[error("Category with id {0} not found")]
    CategoryNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BudgetRepo: Sync + Send {
    async fn create_budget(
        &self,
        tenant: &str,
        new_budget: NewBudget,
    ) -> Result<Budget, BudgetRepoError>;

    async fn get_all_budgets(&self, tenant: &str) -> Result<Vec<Budget>, BudgetRepoError>;

    async fn update_budget(
        &self,
        tenant: &str,
        budget_id: i32,
        updated_budget: NewBudget,
    ) -> Result<Budget, BudgetRepoError>;

    async fn delete_budget(&self, tenant: &str, budget_id: i32)
        -> Result<Budget, BudgetRepoError>;
}
