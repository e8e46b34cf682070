use super::{MemRepo, State};
use crate::account_repo::AccountRepoError::{AccountInUse, AccountNotFound};
use crate::account_repo::{Account, AccountRepo, AccountRepoError, NewAccount};
use async_trait::async_trait;
use rust_decimal::Decimal;

impl State {
    fn account_with_balance(&self, tenant: &str, account: &Account) -> Account {
        let movements: Decimal = self
            .transactions
            .all(tenant)
            .flat_map(|t| t.entries.iter())
            .filter(|e| e.account_id == account.id)
            .map(|e| e.signed_amount())
            .sum();
        let mut account = account.clone();
        account.balance = account.initial_balance + movements;
        account
    }
}

#[async_trait]
impl AccountRepo for MemRepo {
    async fn create_account(
        &self,
        tenant: &str,
        new_account: NewAccount,
    ) -> Result<Account, AccountRepoError> {
        let mut write_guard = self.write_lock()?;

        let balance = new_account.initial_balance;
        let account = write_guard
            .accounts
            .insert_with(tenant, |id| new_account.to_account(id, balance));
        Ok(account)
    }

    async fn get_account(
        &self,
        tenant: &str,
        account_id: i32,
    ) -> Result<Account, AccountRepoError> {
        let read_guard = self.read_lock()?;

        let account = read_guard
            .accounts
            .get(tenant, account_id)
            .ok_or(AccountNotFound(account_id))?;
        Ok(read_guard.account_with_balance(tenant, account))
    }

    async fn get_all_accounts(&self, tenant: &str) -> Result<Vec<Account>, AccountRepoError> {
        let read_guard = self.read_lock()?;

        let accounts = read_guard
            .accounts
            .all(tenant)
            .map(|a| read_guard.account_with_balance(tenant, a))
            .collect();
        Ok(accounts)
    }

    async fn update_account(
        &self,
        tenant: &str,
        account_id: i32,
        updated_account: NewAccount,
    ) -> Result<Account, AccountRepoError> {
        let mut write_guard = self.write_lock()?;

        let account = write_guard
            .accounts
            .get_mut(tenant, account_id)
            .ok_or(AccountNotFound(account_id))?;
        *account = updated_account.to_account(account_id, Decimal::ZERO);
        let account = account.clone();

        Ok(write_guard.account_with_balance(tenant, &account))
    }

    async fn delete_account(
        &self,
        tenant: &str,
        account_id: i32,
    ) -> Result<Account, AccountRepoError> {
        let mut write_guard = self.write_lock()?;

        let account = write_guard
            .accounts
            .get(tenant, account_id)
            .ok_or(AccountNotFound(account_id))?;
        let account = write_guard.account_with_balance(tenant, account);
        if write_guard
            .transactions
            .all(tenant)
            .any(|t| t.touches_account(account_id))
        {
            return Err(AccountInUse(account_id));
        }

        write_guard.accounts.remove(tenant, account_id);
        Ok(account)
    }
}
