use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
    CreditCard,
    Cash,
    Investment,
}

text_enum!(AccountType {
    Checking => "checking",
    Savings => "savings",
    CreditCard => "credit_card",
    Cash => "cash",
    Investment => "investment",
});

/// An account together with its current balance.
///
/// The balance is derived from the account's entries: debits add to it, credits subtract from it.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Account {
    pub id: i32,
    pub name: String,
    pub account_type: AccountType,
    pub initial_balance: Decimal,
    pub currency: String,
    pub archived: bool,
    pub balance: Decimal,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewAccount {
    pub name: String,
    pub account_type: AccountType,
    #[serde(default)]
    pub initial_balance: Decimal,
    pub currency: String,
    #[serde(default)]
    pub archived: bool,
}

impl NewAccount {
    pub fn new(
        name: String,
        account_type: AccountType,
        initial_balance: Decimal,
        currency: String,
    ) -> NewAccount {
        NewAccount {
            name,
            account_type,
            initial_balance,
            currency,
            archived: false,
        }
    }

    pub fn to_account(self, id: i32, balance: Decimal) -> Account {
        Account {
            id,
            name: self.name,
            account_type: self.account_type,
            initial_balance: self.initial_balance,
            currency: self.currency,
            archived: self.archived,
            balance,
        }
    }
}

#[derive(Error, Debug)]
pub enum AccountRepoError {
    #[error("Account with id {0} not found")]
    AccountNotFound(i32),
    #[error("Account with id {0} still has entries")]
    AccountInUse(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait AccountRepo: Sync + Send {
    async fn create_account(
        &self,
        tenant: &str,
        new_account: NewAccount,
    ) -> Result<Account, AccountRepoError>;

    async fn get_account(&self, tenant: &str, account_id: i32)
        -> Result<Account, AccountRepoError>;

    async fn get_all_accounts(&self, tenant: &str) -> Result<Vec<Account>, AccountRepoError>;

    async fn update_account(
        &self,
        tenant: &str,
        account_id: i32,
        updated_account: NewAccount,
    ) -> Result<Account, AccountRepoError>;

    /// Fails with [AccountRepoError::AccountInUse] while any transaction references the account.
    async fn delete_account(
        &self,
        tenant: &str,
        account_id: i32,
    ) -> Result<Account, AccountRepoError>;
}
