use super::MemRepo;
use crate::category_repo::CategoryRepoError::{
    CategoryAlreadyExists, CategoryInUse, CategoryNotFound,
};
use crate::category_repo::{Category, CategoryRepo, CategoryRepoError, NewCategory};
use async_trait::async_trait;

#[async_trait]
impl CategoryRepo for MemRepo {
    async fn create_category(
        &self,
        tenant: &str,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard
            .categories
            .all(tenant)
            .any(|c| c.name == new_category.name)
        {
            return Err(CategoryAlreadyExists(new_category.name));
        }

        let category = write_guard
            .categories
            .insert_with(tenant, |id| new_category.to_category(id));
        Ok(category)
    }

    async fn get_all_categories(&self, tenant: &str) -> Result<Vec<Category>, CategoryRepoError> {
        let read_guard = self.read_lock()?;

        let mut categories: Vec<Category> = read_guard.categories.all(tenant).cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn update_category(
        &self,
        tenant: &str,
        category_id: i32,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.categories.contains(tenant, category_id) {
            return Err(CategoryNotFound(category_id));
        }
        if write_guard
            .categories
            .all(tenant)
            .any(|c| c.id != category_id && c.name == updated_category.name)
        {
            return Err(CategoryAlreadyExists(updated_category.name));
        }

        let category = write_guard
            .categories
            .get_mut(tenant, category_id)
            .ok_or(CategoryNotFound(category_id))?;
        *category = updated_category.to_category(category_id);
        Ok(category.clone())
    }

    async fn delete_category(
        &self,
        tenant: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.categories.contains(tenant, category_id) {
            return Err(CategoryNotFound(category_id));
        }
        if write_guard
            .transactions
            .all(tenant)
            .any(|t| t.touches_category(category_id))
        {
            return Err(CategoryInUse(category_id));
        }

        write_guard
            .budgets
            .retain(tenant, |b| b.category_id != category_id);
        for bill in write_guard.bills.rows.values_mut() {
            if bill.0 == tenant && bill.1.category_id == Some(category_id) {
                bill.1.category_id = None;
            }
        }

        let category = write_guard
            .categories
            .remove(tenant, category_id)
            .ok_or(CategoryNotFound(category_id))?;
        Ok(category)
    }
}
