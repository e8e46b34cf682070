use super::MemRepo;
use crate::user_repo::UserRepoError::{TenantNotFound, UserAlreadyExists, UserNotFound};
use crate::user_repo::{Tenant, User, UserRepo, UserRepoError};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::hash_map::Entry;

#[async_trait]
impl UserRepo for MemRepo {
    async fn get_user(&self, user_id: &str) -> Result<User, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .users
            .get(user_id)
            .cloned()
            .ok_or_else(|| UserNotFound(user_id.to_owned()))
    }

    async fn create_user(&self, user: User) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.tenants.contains_key(&user.tenant_id) {
            return Err(TenantNotFound(user.tenant_id));
        }
        match write_guard.users.entry(user.id.clone()) {
            Entry::Occupied(_) => Err(UserAlreadyExists(user.id)),
            Entry::Vacant(e) => {
                e.insert(user);
                Ok(())
            }
        }
    }

    async fn update_password_hash(
        &self,
        user_id: &str,
        password_hash: &str,
    ) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        match write_guard.users.get_mut(user_id) {
            Some(user) => {
                user.password_hash = password_hash.to_owned();
                Ok(())
            }
            None => Err(UserNotFound(user_id.to_owned())),
        }
    }

    async fn delete_user(&self, user_id: &str) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if write_guard.users.remove(user_id).is_some() {
            Ok(())
        } else {
            Err(UserNotFound(user_id.to_owned()))
        }
    }

    async fn create_tenant(&self, tenant: Tenant) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard.tenants.insert(tenant.id.clone(), tenant);
        Ok(())
    }

    async fn get_tenant(&self, tenant_id: &str) -> Result<Tenant, UserRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .tenants
            .get(tenant_id)
            .cloned()
            .ok_or_else(|| TenantNotFound(tenant_id.to_owned()))
    }

    async fn delete_tenant(&self, tenant_id: &str) -> Result<(), UserRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.tenants.contains_key(tenant_id) {
            return Err(TenantNotFound(tenant_id.to_owned()));
        }
        if write_guard.users.values().any(|u| u.tenant_id == tenant_id) {
            return Err(anyhow!("Tenant {} still has users", tenant_id).into());
        }

        write_guard.accounts.retain(tenant_id, |_| false);
        write_guard.categories.retain(tenant_id, |_| false);
        write_guard.transactions.retain(tenant_id, |_| false);
        write_guard.budgets.retain(tenant_id, |_| false);
        write_guard.goals.retain(tenant_id, |_| false);
        write_guard.investments.retain(tenant_id, |_| false);
        write_guard.dividends.retain(tenant_id, |_| false);
        write_guard.bills.retain(tenant_id, |_| false);
        write_guard.tenants.remove(tenant_id);
        Ok(())
    }
}
