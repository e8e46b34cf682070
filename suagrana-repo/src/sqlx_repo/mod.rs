mod account_repo;
mod bill_repo;
mod budget_repo;
mod category_repo;
mod goal_repo;
mod investment_repo;
mod transaction_repo;
mod user_repo;

use crate::{HealthCheck, Repos, UnknownVariant};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{query_scalar, Pool, Postgres};
use std::str::FromStr;
use tracing::{error, info};

pub struct SQLxRepo {
    pool: Pool<Postgres>,
}

impl SQLxRepo {
    pub fn new(pool: Pool<Postgres>) -> SQLxRepo {
        SQLxRepo { pool }
    }

    async fn category_exists(&self, tenant: &str, category_id: i32) -> Result<bool, anyhow::Error> {
        query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE tenant_id = $1 AND id = $2)")
            .bind(tenant)
            .bind(category_id)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("Unable to look up category {}", category_id))
    }
}

/// Connects to the database, applies pending migrations and builds every repository on top of
/// the same pool.
pub async fn create_repos(database_url: &str, max_pool_size: u32) -> Result<Repos, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_pool_size)
        .connect(database_url)
        .await
        .context("Unable to connect to database")?;

    info!("Running migrations");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Unable to run migrations")?;

    Ok(Repos::from_backend(SQLxRepo::new(pool)))
}

#[async_trait]
impl HealthCheck for SQLxRepo {
    async fn check(&self) -> bool {
        match query_scalar::<_, i32>("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                error!(%e, "Health check failed");
                false
            }
        }
    }
}

fn parse_column<T>(value: &str) -> Result<T, anyhow::Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    value.parse().context("Unexpected value in database")
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation())
}
