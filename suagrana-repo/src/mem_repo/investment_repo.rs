use super::MemRepo;
use crate::investment_repo::InvestmentRepoError::InvestmentNotFound;
use crate::investment_repo::{
    Dividend, Investment, InvestmentRepo, InvestmentRepoError, NewDividend, NewInvestment,
};
use async_trait::async_trait;

#[async_trait]
impl InvestmentRepo for MemRepo {
    async fn create_investment(
        &self,
        tenant: &str,
        new_investment: NewInvestment,
    ) -> Result<Investment, InvestmentRepoError> {
        let mut write_guard = self.write_lock()?;

        Ok(write_guard
            .investments
            .insert_with(tenant, |id| new_investment.to_investment(id)))
    }

    async fn get_all_investments(
        &self,
        tenant: &str,
    ) -> Result<Vec<Investment>, InvestmentRepoError> {
        let read_guard = self.read_lock()?;

        Ok(read_guard.investments.all(tenant).cloned().collect())
    }

    async fn update_investment(
        &self,
        tenant: &str,
        investment_id: i32,
        updated_investment: NewInvestment,
    ) -> Result<Investment, InvestmentRepoError> {
        let mut write_guard = self.write_lock()?;

        let investment = write_guard
            .investments
            .get_mut(tenant, investment_id)
            .ok_or(InvestmentNotFound(investment_id))?;
        *investment = updated_investment.to_investment(investment_id);
        Ok(investment.clone())
    }

    async fn delete_investment(
        &self,
        tenant: &str,
        investment_id: i32,
    ) -> Result<Investment, InvestmentRepoError> {
        let mut write_guard = self.write_lock()?;

        let investment = write_guard
            .investments
            .remove(tenant, investment_id)
            .ok_or(InvestmentNotFound(investment_id))?;
        write_guard
            .dividends
            .retain(tenant, |d| d.investment_id != investment_id);
        Ok(investment)
    }

    async fn add_dividend(
        &self,
        tenant: &str,
        investment_id: i32,
        new_dividend: NewDividend,
    ) -> Result<Dividend, InvestmentRepoError> {
        let mut write_guard = self.write_lock()?;

        if !write_guard.investments.contains(tenant, investment_id) {
            return Err(InvestmentNotFound(investment_id));
        }
        Ok(write_guard
            .dividends
            .insert_with(tenant, |id| new_dividend.to_dividend(id, investment_id)))
    }

    async fn get_dividends(
        &self,
        tenant: &str,
        investment_id: Option<i32>,
    ) -> Result<Vec<Dividend>, InvestmentRepoError> {
        let read_guard = self.read_lock()?;

        if let Some(investment_id) = investment_id {
            if !read_guard.investments.contains(tenant, investment_id) {
                return Err(InvestmentNotFound(investment_id));
            }
        }

        let mut dividends: Vec<Dividend> = read_guard
            .dividends
            .all(tenant)
            .filter(|d| investment_id.map_or(true, |id| d.investment_id == id))
            .cloned()
            .collect();
        dividends.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(dividends)
    }
}
