use actix_web::{web, Scope};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use suagrana_repo::transaction_repo::{Filter, PageOptions, TransactionKind};

mod handlers;

pub const DEFAULT_PAGE_SIZE: i64 = 50;

pub fn transaction_service() -> Scope {
    web::scope("/transactions")
        .service(handlers::get_all_transactions)
        .service(handlers::get_transaction)
        .service(handlers::create_new_transaction)
        .service(handlers::update_transaction)
        .service(handlers::delete_transaction)
}

/// Query string of the transaction listing. Without `offset` or `limit` every match is returned.
#[derive(Serialize, Deserialize, Default, Debug)]
pub struct TransactionQuery {
    pub from: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    pub account_id: Option<i32>,
    pub category_id: Option<i32>,
    pub kind: Option<TransactionKind>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl TransactionQuery {
    pub fn filter(&self) -> Filter {
        Filter {
            from: self.from,
            until: self.until,
            account_id: self.account_id,
            category_id: self.category_id,
            kind: self.kind,
        }
    }

    pub fn page_options(&self) -> Option<PageOptions> {
        if self.offset.is_none() && self.limit.is_none() {
            return None;
        }
        Some(PageOptions {
            offset: self.offset.unwrap_or(0).max(0),
            limit: self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{TransactionQuery, DEFAULT_PAGE_SIZE};
    use actix_web::web;
    use suagrana_repo::transaction_repo::TransactionKind;

    #[test]
    fn no_paging_by_default() {
        let query = TransactionQuery::default();
        assert!(query.page_options().is_none());
    }

    #[test]
    fn limit_defaults_when_offset_given() {
        let query = TransactionQuery {
            offset: Some(20),
            ..TransactionQuery::default()
        };
        let page = query.page_options().unwrap();
        assert_eq!(20, page.offset);
        assert_eq!(DEFAULT_PAGE_SIZE, page.limit);
    }

    #[test]
    fn parse_query_string() {
        let query = web::Query::<TransactionQuery>::from_query(
            "from=2024-01-01&kind=expense&account_id=3&limit=10",
        )
        .unwrap()
        .into_inner();
        assert_eq!(Some(TransactionKind::Expense), query.kind);
        assert_eq!(Some(3), query.filter().account_id);
        assert_eq!(0, query.page_options().unwrap().offset);
    }
}
