pub mod generator;

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs;
use suagrana_repo::account_repo::{Account, AccountType, NewAccount};
use suagrana_repo::category_repo::{Category, CategoryKind, NewCategory};
use suagrana_repo::user_repo::{Tenant, User};
use suagrana_repo::Repos;
use tracing::info;
use uuid::Uuid;

#[derive(Deserialize)]
struct TestConfig {
    database_url: String,
}

#[derive(Debug)]
pub enum RepoType {
    SQLx,
    Mem,
}

pub async fn build_repos(repo_type: RepoType) -> Repos {
    match repo_type {
        RepoType::SQLx => {
            let config = fs::read_to_string("config_test.toml").unwrap();
            let config: TestConfig = toml::from_str(config.as_str()).unwrap();
            suagrana_repo::sqlx_repo::create_repos(&config.database_url, 1)
                .await
                .unwrap()
        }
        RepoType::Mem => suagrana_repo::mem_repo::create_repos(),
    }
}

/// A freshly created tenant with a single member.
#[allow(dead_code)]
pub struct TestTenant {
    pub id: String,
    pub user_id: String,
    repos: Repos,
}

#[allow(dead_code)]
impl TestTenant {
    pub async fn new(repos: &Repos) -> TestTenant {
        let tenant_id = "test-tenant-".to_owned() + &Uuid::new_v4().to_string();
        let user_id = "test-user-".to_owned() + &Uuid::new_v4().to_string();
        repos
            .user_repo
            .create_tenant(Tenant::new(tenant_id.clone(), "Test family".to_owned()))
            .await
            .unwrap();
        repos
            .user_repo
            .create_user(User::new(
                user_id.clone(),
                "not a real hash".to_owned(),
                tenant_id.clone(),
            ))
            .await
            .unwrap();
        info!(%tenant_id, %user_id, "Created tenant");
        TestTenant {
            id: tenant_id,
            user_id,
            repos: repos.clone(),
        }
    }

    pub async fn account(&self, name: &str, initial_balance: Decimal) -> Account {
        self.repos
            .account_repo
            .create_account(
                &self.id,
                NewAccount::new(
                    name.to_owned(),
                    AccountType::Checking,
                    initial_balance,
                    "BRL".to_owned(),
                ),
            )
            .await
            .unwrap()
    }

    pub async fn category(&self, name: &str, kind: CategoryKind) -> Category {
        self.repos
            .category_repo
            .create_category(&self.id, NewCategory::new(name.to_owned(), kind, None))
            .await
            .unwrap()
    }

    pub async fn delete(&self) {
        self.repos.user_repo.delete_user(&self.user_id).await.unwrap()
    }
}
