use super::{parse_column, SQLxRepo};
use crate::bill_repo::BillRepoError::{BillNotFound, CategoryNotFound};
use crate::bill_repo::{BillReminder, BillRepo, BillRepoError, NewBillReminder};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query, query_as, query_scalar};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct BillRow {
    id: i32,
    name: String,
    amount: Decimal,
    due_date: NaiveDate,
    recurrence: String,
    category_id: Option<i32>,
    paid: bool,
}

impl TryFrom<BillRow> for BillReminder {
    type Error = anyhow::Error;

    fn try_from(row: BillRow) -> Result<Self, Self::Error> {
        Ok(BillReminder {
            id: row.id,
            name: row.name,
            amount: row.amount,
            due_date: row.due_date,
            recurrence: parse_column(&row.recurrence)?,
            category_id: row.category_id,
            paid: row.paid,
        })
    }
}

const BILL_COLUMNS: &str = "id, name, amount, due_date, recurrence, category_id, paid";

impl SQLxRepo {
    async fn check_bill_category(
        &self,
        tenant: &str,
        category_id: Option<i32>,
    ) -> Result<(), BillRepoError> {
        let Some(category_id) = category_id else {
            return Ok(());
        };
        if self.category_exists(tenant, category_id).await? {
            Ok(())
        } else {
            Err(CategoryNotFound(category_id))
        }
    }
}

#[async_trait]
impl BillRepo for SQLxRepo {
    #[instrument(skip(self, new_bill))]
    async fn create_bill(
        &self,
        tenant: &str,
        new_bill: NewBillReminder,
    ) -> Result<BillReminder, BillRepoError> {
        self.check_bill_category(tenant, new_bill.category_id)
            .await?;

        let id: i32 = query_scalar(
            "INSERT INTO bill_reminders(tenant_id, name, amount, due_date, recurrence, category_id, paid) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(tenant)
        .bind(&new_bill.name)
        .bind(new_bill.amount)
        .bind(new_bill.due_date)
        .bind(new_bill.recurrence.as_str())
        .bind(new_bill.category_id)
        .bind(new_bill.paid)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert bill reminder")?;
        Ok(new_bill.to_bill(id))
    }

    #[instrument(skip(self))]
    async fn get_all_bills(&self, tenant: &str) -> Result<Vec<BillReminder>, BillRepoError> {
        let sql = format!(
            "SELECT {} FROM bill_reminders WHERE tenant_id = $1 ORDER BY due_date, id",
            BILL_COLUMNS
        );
        let rows: Vec<BillRow> = query_as(&sql)
            .bind(tenant)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get bill reminders for tenant {}", tenant))?;

        let bills = rows
            .into_iter()
            .map(BillReminder::try_from)
            .collect::<Result<Vec<BillReminder>, anyhow::Error>>()?;
        Ok(bills)
    }

    #[instrument(skip(self, updated_bill))]
    async fn update_bill(
        &self,
        tenant: &str,
        bill_id: i32,
        updated_bill: NewBillReminder,
    ) -> Result<BillReminder, BillRepoError> {
        self.check_bill_category(tenant, updated_bill.category_id)
            .await?;

        let id: Option<i32> = query_scalar(
            "UPDATE bill_reminders SET name = $1, amount = $2, due_date = $3, recurrence = $4, category_id = $5, paid = $6 WHERE tenant_id = $7 AND id = $8 RETURNING id",
        )
        .bind(&updated_bill.name)
        .bind(updated_bill.amount)
        .bind(updated_bill.due_date)
        .bind(updated_bill.recurrence.as_str())
        .bind(updated_bill.category_id)
        .bind(updated_bill.paid)
        .bind(tenant)
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update bill reminder {}", bill_id))?;
        id.map(|id| updated_bill.to_bill(id))
            .ok_or(BillNotFound(bill_id))
    }

    #[instrument(skip(self))]
    async fn delete_bill(
        &self,
        tenant: &str,
        bill_id: i32,
    ) -> Result<BillReminder, BillRepoError> {
        let sql = format!(
            "DELETE FROM bill_reminders WHERE tenant_id = $1 AND id = $2 RETURNING {}",
            BILL_COLUMNS
        );
        let row: Option<BillRow> = query_as(&sql)
            .bind(tenant)
            .bind(bill_id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Unable to delete bill reminder {}", bill_id))?;

        let row = row.ok_or(BillNotFound(bill_id))?;
        Ok(BillReminder::try_from(row)?)
    }

    #[instrument(skip(self))]
    async fn pay_bill(&self, tenant: &str, bill_id: i32) -> Result<BillReminder, BillRepoError> {
        let mut tx = self.pool.begin().await.context("Unable to begin transaction")?;

        let sql = format!(
            "SELECT {} FROM bill_reminders WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
            BILL_COLUMNS
        );
        let row: Option<BillRow> = query_as(&sql)
            .bind(tenant)
            .bind(bill_id)
            .fetch_optional(&mut *tx)
            .await
            .with_context(|| format!("Unable to get bill reminder {}", bill_id))?;
        let mut bill = BillReminder::try_from(row.ok_or(BillNotFound(bill_id))?)?;

        bill.pay();
        query("UPDATE bill_reminders SET due_date = $1, paid = $2 WHERE id = $3")
            .bind(bill.due_date)
            .bind(bill.paid)
            .bind(bill_id)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to update bill reminder {}", bill_id))?;

        tx.commit().await.context("Unable to commit transaction")?;
        Ok(bill)
    }
}
