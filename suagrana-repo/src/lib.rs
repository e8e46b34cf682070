use async_trait::async_trait;
use std::sync::Arc;

/// Implements `as_str`, `Display` and `FromStr` for enums stored as text columns.
macro_rules! text_enum {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_owned(),
                    }),
                }
            }
        }
    };
}

pub mod account_repo;
pub mod bill_repo;
pub mod budget_repo;
pub mod category_repo;
pub mod goal_repo;
pub mod investment_repo;
pub mod report;
pub mod transaction_repo;
pub mod user_repo;

// implementation modules
pub mod mem_repo;
pub mod sqlx_repo;

use account_repo::AccountRepo;
use bill_repo::BillRepo;
use budget_repo::BudgetRepo;
use category_repo::CategoryRepo;
use goal_repo::GoalRepo;
use investment_repo::InvestmentRepo;
use transaction_repo::TransactionRepo;
use user_repo::UserRepo;

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn check(&self) -> bool;
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("Unknown {kind} value: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Every repository of one backend, sharing the same storage.
#[derive(Clone)]
pub struct Repos {
    pub user_repo: Arc<dyn UserRepo>,
    pub account_repo: Arc<dyn AccountRepo>,
    pub category_repo: Arc<dyn CategoryRepo>,
    pub transaction_repo: Arc<dyn TransactionRepo>,
    pub budget_repo: Arc<dyn BudgetRepo>,
    pub goal_repo: Arc<dyn GoalRepo>,
    pub investment_repo: Arc<dyn InvestmentRepo>,
    pub bill_repo: Arc<dyn BillRepo>,
    pub health_check: Arc<dyn HealthCheck>,
}

impl Repos {
    pub(crate) fn from_backend<R>(backend: R) -> Repos
    where
        R: UserRepo
            + AccountRepo
            + CategoryRepo
            + TransactionRepo
            + BudgetRepo
            + GoalRepo
            + InvestmentRepo
            + BillRepo
            + HealthCheck
            + 'static,
    {
        let backend = Arc::new(backend);
        Repos {
            user_repo: backend.clone(),
            account_repo: backend.clone(),
            category_repo: backend.clone(),
            transaction_repo: backend.clone(),
            budget_repo: backend.clone(),
            goal_repo: backend.clone(),
            investment_repo: backend.clone(),
            bill_repo: backend.clone(),
            health_check: backend,
        }
    }
}
