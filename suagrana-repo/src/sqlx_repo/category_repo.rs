use super::{is_unique_violation, parse_column, SQLxRepo};
use crate::category_repo::CategoryRepoError::{
    CategoryAlreadyExists, CategoryInUse, CategoryNotFound,
};
use crate::category_repo::{Category, CategoryRepo, CategoryRepoError, NewCategory};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query_as, query_scalar};
use tracing::instrument;

#[derive(sqlx::FromRow)]
pub(super) struct CategoryRow {
    pub(super) id: i32,
    name: String,
    pub(super) kind: String,
    color: Option<String>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = anyhow::Error;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            id: row.id,
            name: row.name,
            kind: parse_column(&row.kind)?,
            color: row.color,
        })
    }
}

#[async_trait]
impl CategoryRepo for SQLxRepo {
    #[instrument(skip(self, new_category))]
    async fn create_category(
        &self,
        tenant: &str,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let id: Option<i32> = query_scalar(
            "INSERT INTO categories(tenant_id, name, kind, color) VALUES ($1, $2, $3, $4) ON CONFLICT (tenant_id, name) DO NOTHING RETURNING id",
        )
        .bind(tenant)
        .bind(&new_category.name)
        .bind(new_category.kind.as_str())
        .bind(&new_category.color)
        .fetch_optional(&self.pool)
        .await
        .context("Unable to insert category")?;

        match id {
            Some(id) => Ok(new_category.to_category(id)),
            None => Err(CategoryAlreadyExists(new_category.name)),
        }
    }

    #[instrument(skip(self))]
    async fn get_all_categories(&self, tenant: &str) -> Result<Vec<Category>, CategoryRepoError> {
        let rows: Vec<CategoryRow> = query_as(
            "SELECT id, name, kind, color FROM categories WHERE tenant_id = $1 ORDER BY name",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get categories for tenant {}", tenant))?;

        let categories = rows
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<Category>, anyhow::Error>>()?;
        Ok(categories)
    }

    #[instrument(skip(self, updated_category))]
    async fn update_category(
        &self,
        tenant: &str,
        category_id: i32,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError> {
        let result = query_scalar::<_, i32>(
            "UPDATE categories SET name = $1, kind = $2, color = $3 WHERE tenant_id = $4 AND id = $5 RETURNING id",
        )
        .bind(&updated_category.name)
        .bind(updated_category.kind.as_str())
        .bind(&updated_category.color)
        .bind(tenant)
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(_)) => Ok(updated_category.to_category(category_id)),
            Ok(None) => Err(CategoryNotFound(category_id)),
            Err(e) if is_unique_violation(&e) => Err(CategoryAlreadyExists(updated_category.name)),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("Unable to update category {}", category_id))
                .into()),
        }
    }

    #[instrument(skip(self))]
    async fn delete_category(
        &self,
        tenant: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError> {
        let mut tx = self.pool.begin().await.context("Unable to begin transaction")?;

        let in_use: bool =
            query_scalar("SELECT EXISTS(SELECT 1 FROM entries WHERE category_id = $1)")
                .bind(category_id)
                .fetch_one(&mut *tx)
                .await
                .with_context(|| format!("Unable to check entries of category {}", category_id))?;
        if in_use {
            return Err(CategoryInUse(category_id));
        }

        let row: Option<CategoryRow> = query_as(
            "DELETE FROM categories WHERE tenant_id = $1 AND id = $2 RETURNING id, name, kind, color",
        )
        .bind(tenant)
        .bind(category_id)
        .fetch_optional(&mut *tx)
        .await
        .with_context(|| format!("Unable to delete category {}", category_id))?;
        let row = row.ok_or(CategoryNotFound(category_id))?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(Category::try_from(row)?)
    }
}
