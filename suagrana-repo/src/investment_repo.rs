use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentType {
    Stock,
    Fund,
    Bond,
    Crypto,
    Other,
}

text_enum!(InvestmentType {
    Stock => "stock",
    Fund => "fund",
    Bond => "bond",
    Crypto => "crypto",
    Other => "other",
});

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Investment {
    pub id: i32,
    pub name: String,
    pub ticker: Option<String>,
    pub investment_type: InvestmentType,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
}

impl Investment {
    pub fn invested(&self) -> Decimal {
        self.quantity.saturating_mul(self.average_price)
    }

    pub fn current_value(&self) -> Decimal {
        self.quantity.saturating_mul(self.current_price)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewInvestment {
    pub name: String,
    pub ticker: Option<String>,
    pub investment_type: InvestmentType,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub current_price: Decimal,
}

impl NewInvestment {
    pub fn new(
        name: String,
        ticker: Option<String>,
        investment_type: InvestmentType,
        quantity: Decimal,
        average_price: Decimal,
        current_price: Decimal,
    ) -> NewInvestment {
        NewInvestment {
            name,
            ticker,
            investment_type,
            quantity,
            average_price,
            current_price,
        }
    }

    pub fn to_investment(self, id: i32) -> Investment {
        Investment {
            id,
            name: self.name,
            ticker: self.ticker,
            investment_type: self.investment_type,
            quantity: self.quantity,
            average_price: self.average_price,
            current_price: self.current_price,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Dividend {
    pub id: i32,
    pub investment_id: i32,
    pub amount: Decimal,
    pub date: NaiveDate,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewDividend {
    pub amount: Decimal,
    pub date: NaiveDate,
}

impl NewDividend {
    pub fn new(amount: Decimal, date: NaiveDate) -> NewDividend {
        NewDividend { amount, date }
    }

    pub fn to_dividend(self, id: i32, investment_id: i32) -> Dividend {
        Dividend {
            id,
            investment_id,
            amount: self.amount,
            date: self.date,
        }
    }
}

#[derive(Error, Debug)]
pub enum InvestmentRepoError {
    #[error("Investment with id {0} not found")]
    InvestmentNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait InvestmentRepo: Sync + Send {
    async fn create_investment(
        &self,
        tenant: &str,
        new_investment: NewInvestment,
    ) -> Result<Investment, InvestmentRepoError>;

    async fn get_all_investments(
        &self,
        tenant: &str,
    ) -> Result<Vec<Investment>, InvestmentRepoError>;

    async fn update_investment(
        &self,
        tenant: &str,
        investment_id: i32,
        updated_investment: NewInvestment,
    ) -> Result<Investment, InvestmentRepoError>;

    /// Removes the investment together with its dividends.
    async fn delete_investment(
        &self,
        tenant: &str,
        investment_id: i32,
    ) -> Result<Investment, InvestmentRepoError>;

    async fn add_dividend(
        &self,
        tenant: &str,
        investment_id: i32,
        new_dividend: NewDividend,
    ) -> Result<Dividend, InvestmentRepoError>;

    /// Dividends of one investment, or of all when `investment_id` is `None`, newest first.
    async fn get_dividends(
        &self,
        tenant: &str,
        investment_id: Option<i32>,
    ) -> Result<Vec<Dividend>, InvestmentRepoError>;
}
