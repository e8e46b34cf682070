use super::{parse_column, SQLxRepo};
use crate::budget_repo::BudgetRepoError::{BudgetNotFound, CategoryNotFound};
use crate::budget_repo::{Budget, BudgetRepo, BudgetRepoError, NewBudget};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query_as, query_scalar};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct BudgetRow {
    id: i32,
    category_id: i32,
    period: String,
    amount: Decimal,
    start_date: NaiveDate,
}

impl TryFrom<BudgetRow> for Budget {
    type Error = anyhow::Error;

    fn try_from(row: BudgetRow) -> Result<Self, Self::Error> {
        Ok(Budget {
            id: row.id,
            category_id: row.category_id,
            period: parse_column(&row.period)?,
            amount: row.amount,
            start_date: row.start_date,
        })
    }
}

#[async_trait]
impl BudgetRepo for SQLxRepo {
    #[instrument(skip(self, new_budget))]
    async fn create_budget(
        &self,
        tenant: &str,
        new_budget: NewBudget,
    ) -> Result<Budget, BudgetRepoError> {
        if !self.category_exists(tenant, new_budget.category_id).await? {
            return Err(CategoryNotFound(new_budget.category_id));
        }

        let id: i32 = query_scalar(
            "INSERT INTO budgets(tenant_id, category_id, period, amount, start_date) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(tenant)
        .bind(new_budget.category_id)
        .bind(new_budget.period.as_str())
        .bind(new_budget.amount)
        .bind(new_budget.start_date)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert budget")?;
        Ok(new_budget.to_budget(id))
    }

    #[instrument(skip(self))]
    async fn get_all_budgets(&self, tenant: &str) -> Result<Vec<Budget>, BudgetRepoError> {
        let rows: Vec<BudgetRow> = query_as(
            "SELECT id, category_id, period, amount, start_date FROM budgets WHERE tenant_id = $1 ORDER BY id",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get budgets for tenant {}", tenant))?;

        let budgets = rows
            .into_iter()
            .map(Budget::try_from)
            .collect::<Result<Vec<Budget>, anyhow::Error>>()?;
        Ok(budgets)
    }

    #[instrument(skip(self, updated_budget))]
    async fn update_budget(
        &self,
        tenant: &str,
        budget_id: i32,
        updated_budget: NewBudget,
    ) -> Result<Budget, BudgetRepoError> {
        if !self
            .category_exists(tenant, updated_budget.category_id)
            .await?
        {
            return Err(CategoryNotFound(updated_budget.category_id));
        }

        let id: Option<i32> = query_scalar(
            "UPDATE budgets SET category_id = $1, period = $2, amount = $3, start_date = $4 WHERE tenant_id = $5 AND id = $6 RETURNING id",
        )
        .bind(updated_budget.category_id)
        .bind(updated_budget.period.as_str())
        .bind(updated_budget.amount)
        .bind(updated_budget.start_date)
        .bind(tenant)
        .bind(budget_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update budget {}", budget_id))?;

        id.map(|id| updated_budget.to_budget(id))
            .ok_or(BudgetNotFound(budget_id))
    }

    #[instrument(skip(self))]
    async fn delete_budget(
        &self,
        tenant: &str,
        budget_id: i32,
    ) -> Result<Budget, BudgetRepoError> {
        let row: Option<BudgetRow> = query_as(
            "DELETE FROM budgets WHERE tenant_id = $1 AND id = $2 RETURNING id, category_id, period, amount, start_date",
        )
        .bind(tenant)
        .bind(budget_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete budget {}", budget_id))?;

        let row = row.ok_or(BudgetNotFound(budget_id))?;
        Ok(Budget::try_from(row)?)
    }
}
