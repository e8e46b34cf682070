//! Read-only reports. Results are cached per tenant and query until the tenant writes anything.

use std::future::Future;

use actix_web::{web, Scope};
use anyhow::Context;
use chrono::{Local, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use suagrana_repo::budget_repo::{first_of_month, BudgetPeriod};
use suagrana_repo::category_repo::CategoryKind;
use tracing::debug;

use crate::cache::{report_tag, ReportCache};
use crate::error::HandlerError;

mod handlers;

pub fn report_service() -> Scope {
    web::scope("/reports")
        .service(handlers::get_cash_flow)
        .service(handlers::get_category_spending)
        .service(handlers::get_dashboard)
}

/// Date range of a report. Missing bounds fall back to `default_range`.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
}

impl RangeQuery {
    pub fn resolve(
        &self,
        default_range: impl FnOnce(NaiveDate) -> (NaiveDate, NaiveDate),
    ) -> Result<(NaiveDate, NaiveDate), HandlerError> {
        let (default_from, default_until) = default_range(Local::now().date_naive());
        let until = self.until.unwrap_or(default_until);
        let from = self.from.unwrap_or(default_from);
        if from > until {
            return Err(HandlerError::BadRequest(format!(
                "Range start {} is after its end {}",
                from, until
            )));
        }
        Ok((from, until))
    }
}

/// The twelve months ending with the month of `today`.
pub fn last_twelve_months(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = first_of_month(today)
        .checked_sub_months(Months::new(11))
        .unwrap_or(NaiveDate::MIN);
    (from, today)
}

pub fn current_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    BudgetPeriod::Monthly.bounds(today)
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CategorySpendingQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    #[serde(default = "default_kind")]
    pub kind: CategoryKind,
}

impl CategorySpendingQuery {
    pub fn range(&self) -> RangeQuery {
        RangeQuery {
            from: self.from,
            until: self.until,
        }
    }
}

fn default_kind() -> CategoryKind {
    CategoryKind::Expense
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct DashboardQuery {
    pub month: Option<NaiveDate>,
}

pub fn report_key(tenant: &str, name: &str, params: &str) -> String {
    format!("{}:{}:{}", report_tag(tenant), name, params)
}

/// Returns the cached report, or computes, caches and returns it.
pub async fn cached_report<T, F, Fut>(
    cache: &ReportCache,
    tenant: &str,
    name: &str,
    params: &str,
    compute: F,
) -> Result<serde_json::Value, HandlerError>
where
    T: Serialize,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, HandlerError>>,
{
    let key = report_key(tenant, name, params);
    if let Some(report) = cache.get(&key) {
        debug!(%key, "Report cache hit");
        return Ok(report);
    }

    let report = serde_json::to_value(compute().await?).context("Unable to serialize report")?;
    cache.insert(key, report.clone(), vec![report_tag(tenant)]);
    Ok(report)
}
