use super::SQLxRepo;
use crate::goal_repo::GoalRepoError::GoalNotFound;
use crate::goal_repo::{Goal, GoalRepo, GoalRepoError, NewGoal};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query_as, query_scalar};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct GoalRow {
    id: i32,
    name: String,
    target_amount: Decimal,
    current_amount: Decimal,
    deadline: Option<NaiveDate>,
}

impl From<GoalRow> for Goal {
    fn from(row: GoalRow) -> Self {
        Goal {
            id: row.id,
            name: row.name,
            target_amount: row.target_amount,
            current_amount: row.current_amount,
            deadline: row.deadline,
        }
    }
}

const GOAL_COLUMNS: &str = "id, name, target_amount, current_amount, deadline";

#[async_trait]
impl GoalRepo for SQLxRepo {
    #[instrument(skip(self, new_goal))]
    async fn create_goal(&self, tenant: &str, new_goal: NewGoal) -> Result<Goal, GoalRepoError> {
        let id: i32 = query_scalar(
            "INSERT INTO goals(tenant_id, name, target_amount, current_amount, deadline) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(tenant)
        .bind(&new_goal.name)
        .bind(new_goal.target_amount)
        .bind(new_goal.current_amount)
        .bind(new_goal.deadline)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert goal")?;
        Ok(new_goal.to_goal(id))
    }

    #[instrument(skip(self))]
    async fn get_goal(&self, tenant: &str, goal_id: i32) -> Result<Goal, GoalRepoError> {
        let sql = format!(
            "SELECT {} FROM goals WHERE tenant_id = $1 AND id = $2",
            GOAL_COLUMNS
        );
        let row: Option<GoalRow> = query_as(&sql)
            .bind(tenant)
            .bind(goal_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get goal {}", goal_id))?;
        row.map(Goal::from).ok_or(GoalNotFound(goal_id))
    }

    #[instrument(skip(self))]
    async fn get_all_goals(&self, tenant: &str) -> Result<Vec<Goal>, GoalRepoError> {
        let sql = format!(
            "SELECT {} FROM goals WHERE tenant_id = $1 ORDER BY id",
            GOAL_COLUMNS
        );
        let rows: Vec<GoalRow> = query_as(&sql)
            .bind(tenant)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get goals for tenant {}", tenant))?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    #[instrument(skip(self, updated_goal))]
    async fn update_goal(
        &self,
        tenant: &str,
        goal_id: i32,
        updated_goal: NewGoal,
    ) -> Result<Goal, GoalRepoError> {
        let id: Option<i32> = query_scalar(
            "UPDATE goals SET name = $1, target_amount = $2, current_amount = $3, deadline = $4 WHERE tenant_id = $5 AND id = $6 RETURNING id",
        )
        .bind(&updated_goal.name)
        .bind(updated_goal.target_amount)
        .bind(updated_goal.current_amount)
        .bind(updated_goal.deadline)
        .bind(tenant)
        .bind(goal_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update goal {}", goal_id))?;
        id.map(|id| updated_goal.to_goal(id))
            .ok_or(GoalNotFound(goal_id))
    }

    #[instrument(skip(self))]
    async fn delete_goal(&self, tenant: &str, goal_id: i32) -> Result<Goal, GoalRepoError> {
        let sql = format!(
            "DELETE FROM goals WHERE tenant_id = $1 AND id = $2 RETURNING {}",
            GOAL_COLUMNS
        );
        let row: Option<GoalRow> = query_as(&sql)
            .bind(tenant)
            .bind(goal_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to delete goal {}", goal_id))?;
        row.map(Goal::from).ok_or(GoalNotFound(goal_id))
    }

    #[instrument(skip(self))]
    async fn contribute(
        &self,
        tenant: &str,
        goal_id: i32,
        amount: Decimal,
    ) -> Result<Goal, GoalRepoError> {
        let sql = format!(
            "UPDATE goals SET current_amount = GREATEST(current_amount + $1, 0) WHERE tenant_id = $2 AND id = $3 RETURNING {}",
            GOAL_COLUMNS
        );
        let row: Option<GoalRow> = query_as(&sql)
            .bind(amount)
            .bind(tenant)
            .bind(goal_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to contribute to goal {}", goal_id))?;
        row.map(Goal::from).ok_or(GoalNotFound(goal_id))
    }
}
