use super::{parse_column, SQLxRepo};
use crate::investment_repo::InvestmentRepoError::InvestmentNotFound;
use crate::investment_repo::{
    Dividend, Investment, InvestmentRepo, InvestmentRepoError, NewDividend, NewInvestment,
};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{query_as, query_scalar, Postgres, QueryBuilder};
use tracing::instrument;

#[derive(sqlx::FromRow)]
struct InvestmentRow {
    id: i32,
    name: String,
    ticker: Option<String>,
    investment_type: String,
    quantity: Decimal,
    average_price: Decimal,
    current_price: Decimal,
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = anyhow::Error;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        Ok(Investment {
            id: row.id,
            name: row.name,
            ticker: row.ticker,
            investment_type: parse_column(&row.investment_type)?,
            quantity: row.quantity,
            average_price: row.average_price,
            current_price: row.current_price,
        })
    }
}

#[derive(sqlx::FromRow)]
struct DividendRow {
    id: i32,
    investment_id: i32,
    amount: Decimal,
    date: NaiveDate,
}

impl From<DividendRow> for Dividend {
    fn from(row: DividendRow) -> Self {
        Dividend {
            id: row.id,
            investment_id: row.investment_id,
            amount: row.amount,
            date: row.date,
        }
    }
}

impl SQLxRepo {
    async fn investment_exists(
        &self,
        tenant: &str,
        investment_id: i32,
    ) -> Result<bool, anyhow::Error> {
        query_scalar("SELECT EXISTS(SELECT 1 FROM investments WHERE tenant_id = $1 AND id = $2)")
            .bind(tenant)
            .bind(investment_id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Unable to look up investment {}", investment_id))
    }
}

#[async_trait]
impl InvestmentRepo for SQLxRepo {
    #[instrument(skip(self, new_investment))]
    async fn create_investment(
        &self,
        tenant: &str,
        new_investment: NewInvestment,
    ) -> Result<Investment, InvestmentRepoError> {
        let id: i32 = query_scalar(
            "INSERT INTO investments(tenant_id, name, ticker, investment_type, quantity, average_price, current_price) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING id",
        )
        .bind(tenant)
        .bind(&new_investment.name)
        .bind(&new_investment.ticker)
        .bind(new_investment.investment_type.as_str())
        .bind(new_investment.quantity)
        .bind(new_investment.average_price)
        .bind(new_investment.current_price)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert investment")?;
        Ok(new_investment.to_investment(id))
    }

    #[instrument(skip(self))]
    async fn get_all_investments(
        &self,
        tenant: &str,
    ) -> Result<Vec<Investment>, InvestmentRepoError> {
        let rows: Vec<InvestmentRow> = query_as(
            "SELECT id, name, ticker, investment_type, quantity, average_price, current_price FROM investments WHERE tenant_id = $1 ORDER BY id",
        )
        .bind(tenant)
        .fetch_all(&self.pool)
        .await
        .with_context(|| format!("Unable to get investments for tenant {}", tenant))?;

        let investments = rows
            .into_iter()
            .map(Investment::try_from)
            .collect::<Result<Vec<Investment>, anyhow::Error>>()?;
        Ok(investments)
    }

    #[instrument(skip(self, updated_investment))]
    async fn update_investment(
        &self,
        tenant: &str,
        investment_id: i32,
        updated_investment: NewInvestment,
    ) -> Result<Investment, InvestmentRepoError> {
        let id: Option<i32> = query_scalar(
            "UPDATE investments SET name = $1, ticker = $2, investment_type = $3, quantity = $4, average_price = $5, current_price = $6 WHERE tenant_id = $7 AND id = $8 RETURNING id",
        )
        .bind(&updated_investment.name)
        .bind(&updated_investment.ticker)
        .bind(updated_investment.investment_type.as_str())
        .bind(updated_investment.quantity)
        .bind(updated_investment.average_price)
        .bind(updated_investment.current_price)
        .bind(tenant)
        .bind(investment_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to update investment {}", investment_id))?;
        id.map(|id| updated_investment.to_investment(id))
            .ok_or(InvestmentNotFound(investment_id))
    }

    #[instrument(skip(self))]
    async fn delete_investment(
        &self,
        tenant: &str,
        investment_id: i32,
    ) -> Result<Investment, InvestmentRepoError> {
        let row: Option<InvestmentRow> = query_as(
            "DELETE FROM investments WHERE tenant_id = $1 AND id = $2 RETURNING id, name, ticker, investment_type, quantity, average_price, current_price",
        )
        .bind(tenant)
        .bind(investment_id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("Unable to delete investment {}", investment_id))?;

        let row = row.ok_or(InvestmentNotFound(investment_id))?;
        Ok(Investment::try_from(row)?)
    }

    #[instrument(skip(self, new_dividend))]
    async fn add_dividend(
        &self,
        tenant: &str,
        investment_id: i32,
        new_dividend: NewDividend,
    ) -> Result<Dividend, InvestmentRepoError> {
        if !self.investment_exists(tenant, investment_id).await? {
            return Err(InvestmentNotFound(investment_id));
        }

        let id: i32 = query_scalar(
            "INSERT INTO dividends(tenant_id, investment_id, amount, date) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(tenant)
        .bind(investment_id)
        .bind(new_dividend.amount)
        .bind(new_dividend.date)
        .fetch_one(&self.pool)
        .await
        .context("Unable to insert dividend")?;
        Ok(new_dividend.to_dividend(id, investment_id))
    }

    #[instrument(skip(self))]
    async fn get_dividends(
        &self,
        tenant: &str,
        investment_id: Option<i32>,
    ) -> Result<Vec<Dividend>, InvestmentRepoError> {
        if let Some(investment_id) = investment_id {
            if !self.investment_exists(tenant, investment_id).await? {
                return Err(InvestmentNotFound(investment_id));
            }
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, investment_id, amount, date FROM dividends WHERE tenant_id = ",
        );
        query_builder.push_bind(tenant);
        if let Some(investment_id) = investment_id {
            query_builder
                .push(" AND investment_id = ")
                .push_bind(investment_id);
        }
        query_builder.push(" ORDER BY date DESC, id DESC");

        let rows: Vec<DividendRow> = query_builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("Unable to get dividends for tenant {}", tenant))?;
        Ok(rows.into_iter().map(Dividend::from).collect())
    }
}
