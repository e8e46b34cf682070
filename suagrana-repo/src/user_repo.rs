use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[async_trait]
pub trait UserRepo: Sync + Send {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError>;
    async fn create_user(&self, user: User) -> Result<(), UserRepoError>;
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), UserRepoError>;
    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError>;

    async fn create_tenant(&self, tenant: Tenant) -> Result<(), UserRepoError>;
    async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant, UserRepoError>;
    /// Deletes a tenant with all of its records. Fails while users still belong to it.
    async fn delete_tenant(&self, tenant_id: &str) -> Result<(), UserRepoError>;
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub password_hash: String,
    pub tenant_id: String,
}

impl User {
    pub fn new(id: String, password_hash: String, tenant_id: String) -> User {
        User {
            id,
            password_hash,
            tenant_id,
        }
    }
}

/// A workspace whose members share accounts, transactions and everything else.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Tenant {
    pub id: String,
    pub name: String,
}

impl Tenant {
    pub fn new(id: String, name: String) -> Tenant {
        Tenant { id, name }
    }
}

#[derive(Error, Debug)]
pub enum UserRepoError {
    #[error("User {0} not found")]
    UserNotFound(String),
    #[error("User {0} already exists")]
    UserAlreadyExists(String),
    #[error("Tenant {0} not found")]
    TenantNotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
