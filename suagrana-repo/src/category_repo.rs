use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

text_enum!(CategoryKind {
    Income => "income",
    Expense => "expense",
});

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub kind: CategoryKind,
    pub color: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
    pub color: Option<String>,
}

impl NewCategory {
    pub fn new(name: String, kind: CategoryKind, color: Option<String>) -> NewCategory {
        NewCategory { name, kind, color }
    }

    pub fn to_category(self, id: i32) -> Category {
        Category {
            id,
            name: self.name,
            kind: self.kind,
            color: self.color,
        }
    }
}

#[derive(Error, Debug)]
pub enum CategoryRepoError {
    #[error("Category with id {0} not found")]
    CategoryNotFound(i32),
    #[error("Category {0} already exists")]
    CategoryAlreadyExists(String),
    #[error("Category with id {0} is used by transactions")]
    CategoryInUse(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait CategoryRepo: Sync + Send {
    async fn create_category(
        &self,
        tenant: &str,
        new_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    async fn get_all_categories(&self, tenant: &str) -> Result<Vec<Category>, CategoryRepoError>;

    async fn update_category(
        &self,
        tenant: &str,
        category_id: i32,
        updated_category: NewCategory,
    ) -> Result<Category, CategoryRepoError>;

    /// Budgets of the category are removed with it and bill reminders lose their category.
    async fn delete_category(
        &self,
        tenant: &str,
        category_id: i32,
    ) -> Result<Category, CategoryRepoError>;
}
