use super::{is_foreign_key_violation, SQLxRepo};
use crate::user_repo::{Tenant, User, UserRepo, UserRepoError};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{query, query_as};
use tracing::instrument;

#[async_trait]
impl UserRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        let user: Option<User> =
            query_as("SELECT id, password_hash, tenant_id FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .with_context(|| format!("Unable to get user {}", user_id))?;
        user.ok_or_else(|| UserRepoError::UserNotFound(user_id.to_owned()))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        let result = query(
            "INSERT INTO users(id, password_hash, tenant_id) VALUES($1, $2, $3) ON CONFLICT DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.password_hash)
        .bind(&user.tenant_id)
        .execute(&self.pool)
        .await;
        let result = match result {
            Err(e) if is_foreign_key_violation(&e) => {
                return Err(UserRepoError::TenantNotFound(user.tenant_id))
            }
            r => r.with_context(|| format!("Unable to create user {}", user.id))?,
        };
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserAlreadyExists(user.id))
        }
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let result = query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to update password for {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_owned()))
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        let result = query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete user {}", user_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::UserNotFound(user_id.to_owned()))
        }
    }

    #[instrument(skip(self))]
    async fn create_tenant(&self, tenant: Tenant) -> Result<(), UserRepoError> {
        query("INSERT INTO tenants(id, name) VALUES($1, $2)")
            .bind(&tenant.id)
            .bind(&tenant.name)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to create tenant {}", tenant.id))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant, UserRepoError> {
        let tenant: Option<Tenant> = query_as("SELECT id, name FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get tenant {}", tenant_id))?;
        tenant.ok_or_else(|| UserRepoError::TenantNotFound(tenant_id.to_owned()))
    }

    #[instrument(skip(self))]
    async fn delete_tenant(&self, tenant_id: &str) -> Result<(), UserRepoError> {
        let result = query("DELETE FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete tenant {}", tenant_id))?;
        if result.rows_affected() == 1 {
            Ok(())
        } else {
            Err(UserRepoError::TenantNotFound(tenant_id.to_owned()))
        }
    }
}
