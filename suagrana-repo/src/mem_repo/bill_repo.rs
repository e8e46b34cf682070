use super::MemRepo;
use crate::bill_repo::BillRepoError::{BillNotFound, CategoryNotFound};
use crate::bill_repo::{BillReminder, BillRepo, BillRepoError, NewBillReminder};
use async_trait::async_trait;

#[async_trait]
impl BillRepo for MemRepo {
    async fn create_bill(
        &self,
        tenant: &str,
        new_bill: NewBillReminder,
    ) -> Result<BillReminder, BillRepoError> {
        let mut write_guard = self.write_lock()?;

        if let Some(category_id) = new_bill.category_id {
            if !write_guard.categories.contains(tenant, category_id) {
                return Err(CategoryNotFound(category_id));
            }
        }
        Ok(write_guard
            .bills
            .insert_with(tenant, |id| new_bill.to_bill(id)))
    }

    async fn get_all_bills(&self, tenant: &str) -> Result<Vec<BillReminder>, BillRepoError> {
        let read_guard = self.read_lock()?;

        let mut bills: Vec<BillReminder> = read_guard.bills.all(tenant).cloned().collect();
        bills.sort_by(|a, b| a.due_date.cmp(&b.due_date).then(a.id.cmp(&b.id)));
        Ok(bills)
    }

    async fn update_bill(
        &self,
        tenant: &str,
        bill_id: i32,
        updated_bill: NewBillReminder,
    ) -> Result<BillReminder, BillRepoError> {
        let mut write_guard = self.write_lock()?;

        if let Some(category_id) = updated_bill.category_id {
            if !write_guard.categories.contains(tenant, category_id) {
                return Err(CategoryNotFound(category_id));
            }
        }
        let bill = write_guard
            .bills
            .get_mut(tenant, bill_id)
            .ok_or(BillNotFound(bill_id))?;
        *bill = updated_bill.to_bill(bill_id);
        Ok(bill.clone())
    }

    async fn delete_bill(
        &self,
        tenant: &str,
        bill_id: i32,
    ) -> Result<BillReminder, BillRepoError> {
        let mut write_guard = self.write_lock()?;

        write_guard
            .bills
            .remove(tenant, bill_id)
            .ok_or(BillNotFound(bill_id))
    }

    async fn pay_bill(&self, tenant: &str, bill_id: i32) -> Result<BillReminder, BillRepoError> {
        let mut write_guard = self.write_lock()?;

        let bill = write_guard
            .bills
            .get_mut(tenant, bill_id)
            .ok_or(BillNotFound(bill_id))?;
        bill.pay();
        Ok(bill.clone())
    }
}
