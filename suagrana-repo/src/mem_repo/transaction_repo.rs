use super::{MemRepo, State};
use crate::transaction_repo::TransactionRepoError::{InvalidReference, TransactionNotFound};
use crate::transaction_repo::{
    Filter, NewTransaction, PageOptions, Transaction, TransactionRepo, TransactionRepoError,
};
use async_trait::async_trait;

impl State {
    fn check_references(
        &self,
        tenant: &str,
        transaction: &NewTransaction,
    ) -> Result<(), TransactionRepoError> {
        let expected_kind = transaction.expected_category_kind();
        for entry in &transaction.entries {
            if !self.accounts.contains(tenant, entry.account_id) {
                return Err(InvalidReference(format!(
                    "account {} does not exist",
                    entry.account_id
                )));
            }
            if let Some(category_id) = entry.category_id {
                let Some(category) = self.categories.get(tenant, category_id) else {
                    return Err(InvalidReference(format!(
                        "category {} does not exist",
                        category_id
                    )));
                };
                if matches!(expected_kind, Some(kind) if kind != category.kind) {
                    return Err(InvalidReference(format!(
                        "category {} is not an {} category",
                        category_id, category.kind
                    )));
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionRepo for MemRepo {
    async fn get_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        read_guard
            .transactions
            .get(tenant, transaction_id)
            .cloned()
            .ok_or(TransactionNotFound(transaction_id))
    }

    async fn get_all_transactions(
        &self,
        tenant: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut transactions: Vec<Transaction> = read_guard
            .transactions
            .all(tenant)
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));

        let transactions = match page_options {
            Some(page_options) => transactions
                .into_iter()
                .skip(page_options.offset.max(0) as usize)
                .take(page_options.limit.max(0) as usize)
                .collect(),
            None => transactions,
        };

        Ok(transactions)
    }

    async fn create_new_transaction(
        &self,
        tenant: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard.check_references(tenant, &new_transaction)?;
        let transaction = write_guard
            .transactions
            .insert_with(tenant, |id| new_transaction.to_transaction(id));

        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.transactions.contains(tenant, transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }
        write_guard.check_references(tenant, &updated_transaction)?;

        let transaction = write_guard
            .transactions
            .get_mut(tenant, transaction_id)
            .ok_or(TransactionNotFound(transaction_id))?;
        *transaction = updated_transaction.to_transaction(transaction_id);
        Ok(transaction.clone())
    }

    async fn delete_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .transactions
            .remove(tenant, transaction_id)
            .ok_or(TransactionNotFound(transaction_id))
    }
}
