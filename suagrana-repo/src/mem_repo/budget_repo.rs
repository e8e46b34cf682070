use super::MemRepo;
use crate::budget_repo::BudgetRepoError::{BudgetNotFound, CategoryNotFound};
use crate::budget_repo::{Budget, BudgetRepo, BudgetRepoError, NewBudget};
use async_trait::async_trait;

#[async_trait]
impl BudgetRepo for MemRepo {
    async fn create_budget(
        &self,
        tenant: &str,
        new_budget: NewBudget,
    ) -> Result<Budget, BudgetRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard
            .categories
            .contains(tenant, new_budget.category_id)
        {
            return Err(CategoryNotFound(new_budget.category_id));
        }
        let budget = write_guard
            .budgets
            .insert_with(tenant, |id| new_budget.to_budget(id));
        Ok(budget)
    }

    async fn get_all_budgets(&self, tenant: &str) -> Result<Vec<Budget>, BudgetRepoError> {
        let read_guard = self.read_lock()?;

        Ok(read_guard.budgets.all(tenant).cloned().collect())
    }

    async fn update_budget(
        &self,
        tenant: &str,
        budget_id: i32,
        updated_budget: NewBudget,
    ) -> Result<Budget, BudgetRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard
            .categories
            .contains(tenant, updated_budget.category_id)
        {
            return Err(CategoryNotFound(updated_budget.category_id));
        }
        let budget = write_guard
            .budgets
            .get_mut(tenant, budget_id)
            .ok_or(BudgetNotFound(budget_id))?;
        *budget = updated_budget.to_budget(budget_id);
        Ok(budget.clone())
    }

    async fn delete_budget(
        &self,
        tenant: &str,
        budget_id: i32,
    ) -> Result<Budget, BudgetRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .budgets
            .remove(tenant, budget_id)
            .ok_or(BudgetNotFound(budget_id))
    }
}
