use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::percentage;

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Goal {
    pub id: i32,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    /// Percentage of the target reached, capped at 100 and rounded to two decimal places.
    pub fn progress(&self) -> Decimal {
        if self.target_amount <= Decimal::ZERO {
            return Decimal::ONE_HUNDRED;
        }
        percentage(self.current_amount, self.target_amount).min(Decimal::ONE_HUNDRED)
    }

    pub fn achieved(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Adds `amount` (negative for withdrawals) without letting the balance go below zero.
    pub fn contribute(&mut self, amount: Decimal) {
        self.current_amount = (self.current_amount + amount).max(Decimal::ZERO);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub deadline: Option<NaiveDate>,
}

impl NewGoal {
    pub fn new(
        name: String,
        target_amount: Decimal,
        current_amount: Decimal,
        deadline: Option<NaiveDate>,
    ) -> NewGoal {
        NewGoal {
            name,
            target_amount,
            current_amount,
            deadline,
        }
    }

    pub fn to_goal(self, id: i32) -> Goal {
        Goal {
            id,
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline: self.deadline,
        }
    }
}

#[derive(Error, Debug)]
pub enum GoalRepoError {
    #[error("Goal with id {0} not found")]
    GoalNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait GoalRepo: Sync + Send {
    async fn create_goal(&self, tenant: &str, new_goal: NewGoal) -> Result<Goal, GoalRepoError>;

    async fn get_goal(&self, tenant: &str, goal_id: i32) -> Result<Goal, GoalRepoError>;

    async fn get_all_goals(&self, tenant: &str) -> Result<Vec<Goal>, GoalRepoError>;

    async fn update_goal(
        &self,
        tenant: &str,
        goal_id: i32,
        updated_goal: NewGoal,
    ) -> Result<Goal, GoalRepoError>;

    async fn delete_goal(&self, tenant: &str, goal_id: i32) -> Result<Goal, GoalRepoError>;

    async fn contribute(
        &self,
        tenant: &str,
        goal_id: i32,
        amount: Decimal,
    ) -> Result<Goal, GoalRepoError>;
}
