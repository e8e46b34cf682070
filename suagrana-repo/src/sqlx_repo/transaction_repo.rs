use super::category_repo::CategoryRow;
use super::{parse_column, SQLxRepo};
use crate::category_repo::CategoryKind;
use crate::transaction_repo::TransactionRepoError::{InvalidReference, TransactionNotFound};
use crate::transaction_repo::{Entry, Filter, PageOptions};
use crate::transaction_repo::{NewTransaction, Transaction, TransactionRepo, TransactionRepoError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query, query_as, query_scalar, PgConnection, Postgres, QueryBuilder};
use std::collections::{HashMap, HashSet};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: i32,
    description: String,
    date: NaiveDate,
    kind: String,
    note: Option<String>,
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    transaction_id: i32,
    account_id: i32,
    category_id: Option<i32>,
    entry_type: String,
    amount: Decimal,
}

impl TryFrom<EntryRow> for Entry {
    type Error = anyhow::Error;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(Entry {
            account_id: row.account_id,
            category_id: row.category_id,
            entry_type: parse_column(&row.entry_type)?,
            amount: row.amount,
        })
    }
}

impl SQLxRepo {
    /// Attaches entries to transaction rows, keeping the order of `rows`.
    #[instrument(skip(conn, rows))]
    async fn load_entries(
        conn: &mut PgConnection,
        rows: Vec<TransactionRow>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let entry_rows: Vec<EntryRow> = query_as(
            "SELECT transaction_id, account_id, category_id, entry_type, amount FROM entries WHERE transaction_id = ANY($1) ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await
        .context("Unable to get entries")?;

        let mut entries: HashMap<i32, Vec<Entry>> = HashMap::new();
        for row in entry_rows {
            let transaction_id = row.transaction_id;
            entries
                .entry(transaction_id)
                .or_default()
                .push(Entry::try_from(row)?);
        }

        let transactions = rows
            .into_iter()
            .map(|row| {
                Ok(Transaction {
                    id: row.id,
                    description: row.description,
                    date: row.date,
                    kind: parse_column(&row.kind)?,
                    note: row.note,
                    entries: entries.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<Transaction>, anyhow::Error>>()?;
        Ok(transactions)
    }

    #[instrument(skip(conn, transaction))]
    async fn check_references(
        conn: &mut PgConnection,
        tenant: &str,
        transaction: &NewTransaction,
    ) -> Result<(), TransactionRepoError> {
        let account_ids: Vec<i32> = transaction
            .entries
            .iter()
            .map(|e| e.account_id)
            .collect::<HashSet<i32>>()
            .into_iter()
            .collect();
        let found: Vec<i32> =
            query_scalar("SELECT id FROM accounts WHERE tenant_id = $1 AND id = ANY($2)")
                .bind(tenant)
                .bind(&account_ids)
                .fetch_all(&mut *conn)
                .await
                .context("Unable to look up accounts")?;
        if let Some(missing) = account_ids.iter().find(|id| !found.contains(id)) {
            return Err(InvalidReference(format!(
                "account {} does not exist",
                missing
            )));
        }

        let category_ids: Vec<i32> = transaction
            .entries
            .iter()
            .filter_map(|e| e.category_id)
            .collect::<HashSet<i32>>()
            .into_iter()
            .collect();
        if category_ids.is_empty() {
            return Ok(());
        }
        let categories: Vec<CategoryRow> = query_as(
            "SELECT id, name, kind, color FROM categories WHERE tenant_id = $1 AND id = ANY($2)",
        )
        .bind(tenant)
        .bind(&category_ids)
        .fetch_all(&mut *conn)
        .await
        .context("Unable to look up categories")?;

        let expected_kind = transaction.expected_category_kind();
        for category_id in category_ids {
            let Some(category) = categories.iter().find(|c| c.id == category_id) else {
                return Err(InvalidReference(format!(
                    "category {} does not exist",
                    category_id
                )));
            };
            let kind: CategoryKind = parse_column(&category.kind)?;
            if matches!(expected_kind, Some(expected) if expected != kind) {
                return Err(InvalidReference(format!(
                    "category {} is not an {} category",
                    category_id, kind
                )));
            }
        }
        Ok(())
    }

    #[instrument(skip(conn, entries))]
    async fn insert_entries(
        conn: &mut PgConnection,
        transaction_id: i32,
        entries: &[Entry],
    ) -> Result<(), TransactionRepoError> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO entries(transaction_id, account_id, category_id, entry_type, amount) ",
        );
        query_builder.push_values(entries, |mut b, entry| {
            b.push_bind(transaction_id)
                .push_bind(entry.account_id)
                .push_bind(entry.category_id)
                .push_bind(entry.entry_type.as_str())
                .push_bind(entry.amount);
        });
        query_builder
            .build()
            .execute(&mut *conn)
            .await
            .with_context(|| format!("Unable to insert entries of transaction {}", transaction_id))?;
        Ok(())
    }
}

#[async_trait]
impl TransactionRepo for SQLxRepo {
    #[instrument(skip(self))]
    async fn get_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Unable to get connection from pool")?;

        let row: Option<TransactionRow> = query_as(
            "SELECT id, description, date, kind, note FROM transactions WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant)
        .bind(transaction_id)
        .fetch_optional(&mut *conn)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        let row = row.ok_or(TransactionNotFound(transaction_id))?;

        Self::load_entries(&mut conn, vec![row])
            .await?
            .pop()
            .ok_or(TransactionNotFound(transaction_id))
    }

    #[instrument(skip(self))]
    async fn get_all_transactions(
        &self,
        tenant: &str,
        filter: Filter,
        page_options: Option<PageOptions>,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, description, date, kind, note FROM transactions WHERE tenant_id = ",
        );
        query_builder.push_bind(tenant);
        if let Some(from) = filter.from {
            query_builder.push(" AND date >= ").push_bind(from);
        }
        if let Some(until) = filter.until {
            query_builder.push(" AND date <= ").push_bind(until);
        }
        if let Some(kind) = filter.kind {
            query_builder.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(account_id) = filter.account_id {
            query_builder
                .push(" AND EXISTS (SELECT 1 FROM entries e WHERE e.transaction_id = transactions.id AND e.account_id = ")
                .push_bind(account_id)
                .push(")");
        }
        if let Some(category_id) = filter.category_id {
            query_builder
                .push(" AND EXISTS (SELECT 1 FROM entries e WHERE e.transaction_id = transactions.id AND e.category_id = ")
                .push_bind(category_id)
                .push(")");
        }
        query_builder.push(" ORDER BY date DESC, id DESC");
        if let Some(po) = page_options {
            query_builder
                .push(" OFFSET ")
                .push_bind(po.offset)
                .push(" LIMIT ")
                .push_bind(po.limit);
        }

        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Unable to get connection from pool")?;
        let rows: Vec<TransactionRow> = query_builder
            .build_query_as()
            .fetch_all(&mut *conn)
            .await
            .with_context(|| format!("Unable to get transactions for tenant {}", tenant))?;

        Self::load_entries(&mut conn, rows).await
    }

    #[instrument(skip(self, new_transaction))]
    async fn create_new_transaction(
        &self,
        tenant: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut tx = self.pool.begin().await.context("Unable to begin transaction")?;

        Self::check_references(&mut tx, tenant, &new_transaction).await?;
        let id: i32 = query_scalar(
            "INSERT INTO transactions(tenant_id, description, date, kind, note) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(tenant)
        .bind(&new_transaction.description)
        .bind(new_transaction.date)
        .bind(new_transaction.kind.as_str())
        .bind(&new_transaction.note)
        .fetch_one(&mut *tx)
        .await
        .context("Unable to insert transaction")?;
        Self::insert_entries(&mut tx, id, &new_transaction.entries).await?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(new_transaction.to_transaction(id))
    }

    #[instrument(skip(self, updated_transaction))]
    async fn update_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut tx = self.pool.begin().await.context("Unable to begin transaction")?;

        let result = query(
            "UPDATE transactions SET description = $1, date = $2, kind = $3, note = $4 WHERE tenant_id = $5 AND id = $6",
        )
        .bind(&updated_transaction.description)
        .bind(updated_transaction.date)
        .bind(updated_transaction.kind.as_str())
        .bind(&updated_transaction.note)
        .bind(tenant)
        .bind(transaction_id)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Unable to update transaction {}", transaction_id))?;
        if result.rows_affected() == 0 {
            return Err(TransactionNotFound(transaction_id));
        }

        Self::check_references(&mut tx, tenant, &updated_transaction).await?;
        query("DELETE FROM entries WHERE transaction_id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to clear entries of transaction {}", transaction_id))?;
        Self::insert_entries(&mut tx, transaction_id, &updated_transaction.entries).await?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(updated_transaction.to_transaction(transaction_id))
    }

    #[instrument(skip(self))]
    async fn delete_transaction(
        &self,
        tenant: &str,
        transaction_id: i32,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut tx = self.pool.begin().await.context("Unable to begin transaction")?;

        let row: Option<TransactionRow> = query_as(
            "SELECT id, description, date, kind, note FROM transactions WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
        )
        .bind(tenant)
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await
        .with_context(|| format!("Unable to get transaction {}", transaction_id))?;
        let row = row.ok_or(TransactionNotFound(transaction_id))?;
        let transaction = Self::load_entries(&mut tx, vec![row])
            .await?
            .pop()
            .ok_or(TransactionNotFound(transaction_id))?;

        query("DELETE FROM transactions WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(transaction_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to delete transaction {}", transaction_id))?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(transaction)
    }
}
