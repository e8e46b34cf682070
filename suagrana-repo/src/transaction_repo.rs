use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    Transfer,
}

text_enum!(TransactionKind {
    Income => "income",
    Expense => "expense",
    Transfer => "transfer",
});

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    Debit,
    Credit,
}

text_enum!(EntryType {
    Debit => "debit",
    Credit => "credit",
});

/// One debit or credit line of a transaction.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Entry {
    pub account_id: i32,
    pub category_id: Option<i32>,
    pub entry_type: EntryType,
    pub amount: Decimal,
}

impl Entry {
    pub fn debit(account_id: i32, category_id: Option<i32>, amount: Decimal) -> Entry {
        Entry {
            account_id,
            category_id,
            entry_type: EntryType::Debit,
            amount,
        }
    }

    pub fn credit(account_id: i32, category_id: Option<i32>, amount: Decimal) -> Entry {
        Entry {
            account_id,
            category_id,
            entry_type: EntryType::Credit,
            amount,
        }
    }

    /// Effect of the entry on its account's balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.entry_type {
            EntryType::Debit => self.amount,
            EntryType::Credit => -self.amount,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Transaction {
    pub id: i32,
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub note: Option<String>,
    pub entries: Vec<Entry>,
}

impl Transaction {
    pub fn total(&self, entry_type: EntryType) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .map(|e| e.amount)
            .sum()
    }

    pub fn touches_account(&self, account_id: i32) -> bool {
        self.entries.iter().any(|e| e.account_id == account_id)
    }

    pub fn touches_category(&self, category_id: i32) -> bool {
        self.entries
            .iter()
            .any(|e| e.category_id == Some(category_id))
    }
}

impl PartialOrd for Transaction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        let date_ordering = self.date.partial_cmp(&other.date);
        if let Some(Equal) = date_ordering {
            self.id.partial_cmp(&other.id)
        } else {
            date_ordering
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewTransaction {
    pub description: String,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub note: Option<String>,
    pub entries: Vec<Entry>,
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("A transaction needs at least one entry")]
    NoEntries,
    #[error("Entry amounts must be positive")]
    NonPositiveAmount,
    #[error("{0} transactions may only contain {1} entries")]
    WrongEntryType(TransactionKind, EntryType),
    #[error("A transfer needs at least two entries")]
    TransferTooShort,
    #[error("Transfer debits ({debits}) and credits ({credits}) do not balance")]
    Unbalanced { debits: Decimal, credits: Decimal },
    #[error("Transfers cannot have categories")]
    CategorizedTransfer,
}

impl NewTransaction {
    pub fn new(
        description: String,
        date: NaiveDate,
        kind: TransactionKind,
        note: Option<String>,
        entries: Vec<Entry>,
    ) -> NewTransaction {
        NewTransaction {
            description,
            date,
            kind,
            note,
            entries,
        }
    }

    pub fn to_transaction(self, id: i32) -> Transaction {
        Transaction {
            id,
            description: self.description,
            date: self.date,
            kind: self.kind,
            note: self.note,
            entries: self.entries,
        }
    }

    /// Checks the shape of the entries. Whether the referenced accounts and categories exist is
    /// left to the repository.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entries.is_empty() {
            return Err(ValidationError::NoEntries);
        }
        if self.entries.iter().any(|e| e.amount <= Decimal::ZERO) {
            return Err(ValidationError::NonPositiveAmount);
        }

        match self.kind {
            TransactionKind::Income => self.require_entry_type(EntryType::Debit),
            TransactionKind::Expense => self.require_entry_type(EntryType::Credit),
            TransactionKind::Transfer => {
                if self.entries.len() < 2 {
                    return Err(ValidationError::TransferTooShort);
                }
                if self.entries.iter().any(|e| e.category_id.is_some()) {
                    return Err(ValidationError::CategorizedTransfer);
                }
                let debits = self.total(EntryType::Debit);
                let credits = self.total(EntryType::Credit);
                if debits != credits {
                    return Err(ValidationError::Unbalanced { debits, credits });
                }
                Ok(())
            }
        }
    }

    /// The category kind that entries of this transaction must use, if any.
    pub fn expected_category_kind(&self) -> Option<crate::category_repo::CategoryKind> {
        use crate::category_repo::CategoryKind;
        match self.kind {
            TransactionKind::Income => Some(CategoryKind::Income),
            TransactionKind::Expense => Some(CategoryKind::Expense),
            TransactionKind::Transfer => None,
        }
    }

    fn require_entry_type(&self, entry_type: EntryType) -> Result<(), ValidationError> {
        if self.entries.iter().all(|e| e.entry_type == entry_type) {
            Ok(())
        } else {
            Err(ValidationError::WrongEntryType(self.kind, entry_type))
        }
    }

    fn total(&self, entry_type: EntryType) -> Decimal {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .map(|e| e.amount)
            .sum()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Filter {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub account_id: Option<i32>,
    pub category_id: Option<i32>,
    pub kind: Option<TransactionKind>,
}

impl Filter {
    pub const NONE: Filter = Filter {
        from: None,
        until: None,
        account_id: None,
        category_id: None,
        kind: None,
    };

    pub fn between(from: Option<NaiveDate>, until: Option<NaiveDate>) -> Filter {
        Filter {
            from,
            until,
            ..Filter::NONE
        }
    }

    pub fn matches(&self, transaction: &Transaction) -> bool {
        if matches!(self.from, Some(from) if transaction.date < from) {
            return false;
        }
        if matches!(self.until, Some(until) if transaction.date > until) {
            return false;
        }
        if matches!(self.kind, Some(kind) if transaction.kind != kind) {
            return false;
        }
        if matches!(self.account_id, Some(account_id) if !transaction.touches_account(account_id))
        {
            return false;
        }
        if matches!(self.category_id, Some(category_id) if !transaction.touches_category(category_id))
        {
            return false;
        }
        true
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct PageOptions {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Error, Debug)]
pub enum TransactionRepoError {
    #[error("Transaction with id {0} not found")]
    TransactionNotFound(i32),
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait TransactionRepo: Sync + Send {
    async fn get_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;

    /// Transactions matching `filter`, newest first (date, then id).
    async fn get_all_transactions(
        &self,
        tenant: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError>;

    async fn create_new_transaction(
        &self,
        tenant: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn update_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError>;

    async fn delete_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError>;
}
