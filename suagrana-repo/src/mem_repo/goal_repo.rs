use super::MemRepo;
use crate::goal_repo::GoalRepoError::GoalNotFound;
use crate::goal_repo::{Goal, GoalRepo, GoalRepoError, NewGoal};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
impl GoalRepo for MemRepo {
    async fn create_goal(&self, tenant: &str, new_goal: NewGoal) -> Result<Goal, GoalRepoError> {
        let mut write_guard = self.write_lock()?;

        Ok(write_guard
            .goals
            .insert_with(tenant, |id| new_goal.to_goal(id)))
    }

    async fn get_goal(&self, tenant: &str, goal_id: i32) -> Result<Goal, GoalRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .goals
            .get(tenant, goal_id)
            .cloned()
            .ok_or(GoalNotFound(goal_id))
    }

    async fn get_all_goals(&self, tenant: &str) -> Result<Vec<Goal>, GoalRepoError> {
        let read_guard = self.read_lock()?;

        Ok(read_guard.goals.all(tenant).cloned().collect())
    }

    async fn update_goal(
        &self,
        tenant: &str,
        goal_id: i32,
        updated_goal: NewGoal,
    ) -> Result<Goal, GoalRepoError> {
        let mut write_guard = self.write_lock()?;

        let goal = write_guard
            .goals
            .get_mut(tenant, goal_id)
            .ok_or(GoalNotFound(goal_id))?;
        *goal = updated_goal.to_goal(goal_id);
        Ok(goal.clone())
    }

    async fn delete_goal(&self, tenant: &str, goal_id: i32) -> Result<Goal, GoalRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .goals
            .remove(tenant, goal_id)
            .ok_or(GoalNotFound(goal_id))
    }

    async fn contribute(
        &self,
        tenant: &str,
        goal_id: i32,
        amount: Decimal,
    ) -> Result<Goal, GoalRepoError> {
        let mut write_guard = self.write_lock()?;

        let goal = write_guard
            .goals
            .get_mut(tenant, goal_id)
            .ok_or(GoalNotFound(goal_id))?;
        goal.contribute(amount);
        Ok(goal.clone())
    }
}
