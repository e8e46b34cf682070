use async_trait::async_trait;
use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Recurrence {
    Once,
    Weekly,
    Monthly,
    Yearly,
}

text_enum!(Recurrence {
    Once => "once",
    Weekly => "weekly",
    Monthly => "monthly",
    Yearly => "yearly",
});

impl Recurrence {
    /// The due date following `date`, or `None` for one-off bills.
    ///
    /// Month based recurrences clamp to the last day of shorter months.
    pub fn next_due_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::Once => None,
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
            Recurrence::Yearly => date.checked_add_months(Months::new(12)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct BillReminder {
    pub id: i32,
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub recurrence: Recurrence,
    pub category_id: Option<i32>,
    pub paid: bool,
}

impl BillReminder {
    /// Records a payment: recurring bills move to their next due date, one-off bills are closed.
    pub fn pay(&mut self) {
        match self.recurrence.next_due_date(self.due_date) {
            Some(next) => {
                self.due_date = next;
                self.paid = false;
            }
            None => self.paid = true,
        }
    }

    /// Unpaid and due on or before `today + days`. Overdue bills are included.
    pub fn is_due_within(&self, today: NaiveDate, days: u64) -> bool {
        if self.paid {
            return false;
        }
        match today.checked_add_days(Days::new(days)) {
            Some(limit) => self.due_date <= limit,
            None => true,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NewBillReminder {
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub recurrence: Recurrence,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub paid: bool,
}

impl NewBillReminder {
    pub fn new(
        name: String,
        amount: Decimal,
        due_date: NaiveDate,
        recurrence: Recurrence,
        category_id: Option<i32>,
    ) -> NewBillReminder {
        NewBillReminder {
            name,
            amount,
            due_date,
            recurrence,
            category_id,
            paid: false,
        }
    }

    pub fn to_bill(self, id: i32) -> BillReminder {
        BillReminder {
            id,
            name: self.name,
            amount: self.amount,
            due_date: self.due_date,
            recurrence: self.recurrence,
            category_id: self.category_id,
            paid: self.paid,
        }
    }
}

#[derive(Error, Debug)]
pub enum BillRepoError {
    #[error("Bill reminder with id {0} not found")]
    BillNotFound(i32),
    #[error("Category with id {0} not found")]
    CategoryNotFound(i32),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait BillRepo: Sync + Send {
    async fn create_bill(
        &self,
        tenant: &str,
        new_bill: NewBillReminder,
    ) -> Result<BillReminder, BillRepoError>;

    /// All bills ordered by due date.
    async fn get_all_bills(&self, tenant: &str) -> Result<Vec<BillReminder>, BillRepoError>;

    async fn update_bill(
        &self,
        tenant: &str,
        bill_id: i32,
        updated_bill: NewBillReminder,
    ) -> Result<BillReminder, BillRepoError>;

    async fn delete_bill(&self, tenant: &str, bill_id: i32)
        -> Result<BillReminder, BillRepoError>;

    /// Applies [BillReminder::pay] and stores the result.
    async fn pay_bill(&self, tenant: &str, bill_id: i32) -> Result<BillReminder, BillRepoError>;
}
