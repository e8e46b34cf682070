use super::{parse_column, SQLxRepo};
use crate::account_repo::AccountRepoError::{AccountInUse, AccountNotFound};
use crate::account_repo::{Account, AccountRepo, AccountRepoError, NewAccount};
use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{query, query_as, query_scalar};
use tracing::instrument;

const SELECT_ACCOUNTS: &str = r#"
    SELECT a.id, a.name, a.account_type, a.initial_balance, a.currency, a.archived,
           a.initial_balance + COALESCE(SUM(CASE WHEN e.entry_type = 'debit' THEN e.amount ELSE -e.amount END), 0) AS balance
    FROM accounts a
             LEFT JOIN entries e ON e.account_id = a.id
    WHERE a.tenant_id = $1
"#;

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i32,
    name: String,
    account_type: String,
    initial_balance: Decimal,
    currency: String,
    archived: bool,
    balance: Decimal,
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id,
            name: row.name,
            account_type: parse_column(&row.account_type)?,
            initial_balance: row.initial_balance,
            currency: row.currency,
            archived: row.archived,
            balance: row.balance,
        })
    }
}

#[async_trait]
impl AccountRepo for SQLxRepo {
    #[instrument(skip(self, new_account))]
    async fn create_account(
        &self,
        tenant: &str,
        new_account: NewAccount,
    ) -> Result<Account, AccountRepoError> {
        let id: i32 = query_scalar(
            "INSERT INTO accounts(tenant_id, name, account_type, initial_balance, currency, archived) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(tenant)
        .bind(&new_account.name)
        .bind(new_account.account_type.as_str())
        .bind(new_account.initial_balance)
        .bind(&new_account.currency)
        .bind(new_account.archived)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert account")?;

        let balance = new_account.initial_balance;
        Ok(new_account.to_account(id, balance))
    }

    #[instrument(skip(self))]
    async fn get_account(
        &self,
        tenant: &str,
        account_id: i32,
    ) -> Result<Account, AccountRepoError> {
        let sql = format!("{} AND a.id = $2 GROUP BY a.id", SELECT_ACCOUNTS);
        let row: Option<AccountRow> = query_as(&sql)
            .bind(tenant)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to get account {}", account_id))?;
        let row = row.ok_or(AccountNotFound(account_id))?;
        Ok(Account::try_from(row)?)
    }

    #[instrument(skip(self))]
    async fn get_all_accounts(&self, tenant: &str) -> Result<Vec<Account>, AccountRepoError> {
        let sql = format!("{} GROUP BY a.id ORDER BY a.id", SELECT_ACCOUNTS);
        let rows: Vec<AccountRow> = query_as(&sql)
            .bind(tenant)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get accounts for tenant {}", tenant))?;
        let accounts = rows
            .into_iter()
            .map(Account::try_from)
            .collect::<Result<Vec<Account>, anyhow::Error>>()?;
        Ok(accounts)
    }

    #[instrument(skip(self, updated_account))]
    async fn update_account(
        &self,
        tenant: &str,
        account_id: i32,
        updated_account: NewAccount,
    ) -> Result<Account, AccountRepoError> {
        let result = query(
            "UPDATE accounts SET name = $1, account_type = $2, initial_balance = $3, currency = $4, archived = $5 WHERE tenant_id = $6 AND id = $7",
        )
        .bind(&updated_account.name)
        .bind(updated_account.account_type.as_str())
        .bind(updated_account.initial_balance)
        .bind(&updated_account.currency)
        .bind(updated_account.archived)
        .bind(tenant)
        .bind(account_id)
        .execute(&self.pool)
        .await
        .with_context(|| format!("Unable to update account {}", account_id))?;
        if result.rows_affected() == 0 {
            return Err(AccountNotFound(account_id));
        }

        self.get_account(tenant, account_id).await
    }

    #[instrument(skip(self))]
    async fn delete_account(
        &self,
        tenant: &str,
        account_id: i32,
    ) -> Result<Account, AccountRepoError> {
        let account = self.get_account(tenant, account_id).await?;

        let in_use: bool =
            query_scalar("SELECT EXISTS(SELECT 1 FROM entries WHERE account_id = $1)")
                .bind(account_id)
                .fetch_one(&self.pool)
                .await
                .with_context(|| format!("Unable to check entries of account {}", account_id))?;
        if in_use {
            return Err(AccountInUse(account_id));
        }

        query("DELETE FROM accounts WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(account_id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Unable to delete account {}", account_id))?;
        Ok(account)
    }
}
