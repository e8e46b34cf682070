use crate::account_repo::Account;
use crate::bill_repo::BillReminder;
use crate::budget_repo::Budget;
use crate::category_repo::Category;
use crate::goal_repo::Goal;
use crate::investment_repo::{Dividend, Investment};
use crate::transaction_repo::Transaction;
use crate::user_repo::{Tenant, User};
use crate::{HealthCheck, Repos};
use anyhow::anyhow;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

mod account_repo;
mod bill_repo;
mod budget_repo;
mod category_repo;
mod goal_repo;
mod investment_repo;
mod transaction_repo;
mod user_repo;

pub fn create_repos() -> Repos {
    Repos::from_backend(MemRepo::new())
}

/// Rows of one record type. Ids are unique across tenants, like a serial column.
struct TenantTable<T> {
    rows: BTreeMap<i32, (String, T)>,
    next_id: i32,
}

impl<T: Clone> TenantTable<T> {
    fn new() -> TenantTable<T> {
        TenantTable {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn insert_with<F>(&mut self, tenant: &str, f: F) -> T
    where
        F: FnOnce(i32) -> T,
    {
        let id = self.next_id;
        self.next_id += 1;
        let row = f(id);
        self.rows.insert(id, (tenant.to_owned(), row.clone()));
        row
    }

    fn get(&self, tenant: &str, id: i32) -> Option<&T> {
        self.rows
            .get(&id)
            .filter(|(owner, _)| owner == tenant)
            .map(|(_, row)| row)
    }

    fn get_mut(&mut self, tenant: &str, id: i32) -> Option<&mut T> {
        self.rows
            .get_mut(&id)
            .filter(|(owner, _)| owner == tenant)
            .map(|(_, row)| row)
    }

    fn contains(&self, tenant: &str, id: i32) -> bool {
        self.get(tenant, id).is_some()
    }

    fn remove(&mut self, tenant: &str, id: i32) -> Option<T> {
        if !self.contains(tenant, id) {
            return None;
        }
        self.rows.remove(&id).map(|(_, row)| row)
    }

    /// Rows of `tenant` in id order.
    fn all<'a>(&'a self, tenant: &'a str) -> impl Iterator<Item = &'a T> + 'a {
        self.rows
            .values()
            .filter(move |(owner, _)| owner == tenant)
            .map(|(_, row)| row)
    }

    fn retain<F>(&mut self, tenant: &str, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.rows
            .retain(|_, (owner, row)| owner.as_str() != tenant || keep(&*row));
    }
}

struct State {
    users: HashMap<String, User>,
    tenants: HashMap<String, Tenant>,
    accounts: TenantTable<Account>,
    categories: TenantTable<Category>,
    transactions: TenantTable<Transaction>,
    budgets: TenantTable<Budget>,
    goals: TenantTable<Goal>,
    investments: TenantTable<Investment>,
    dividends: TenantTable<Dividend>,
    bills: TenantTable<BillReminder>,
}

pub struct MemRepo {
    state: RwLock<State>,
}

impl MemRepo {
    pub fn new() -> MemRepo {
        let state = State {
            users: HashMap::new(),
            tenants: HashMap::new(),
            accounts: TenantTable::new(),
            categories: TenantTable::new(),
            transactions: TenantTable::new(),
            budgets: TenantTable::new(),
            goals: TenantTable::new(),
            investments: TenantTable::new(),
            dividends: TenantTable::new(),
            bills: TenantTable::new(),
        };
        MemRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

impl Default for MemRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthCheck for MemRepo {
    async fn check(&self) -> bool {
        self.read_lock().is_ok()
    }
}
