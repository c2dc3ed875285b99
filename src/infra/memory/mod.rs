//! In-memory account store.
//!
//! Used when no `DATABASE_URL` is configured and as the backing store for
//! test doubles. Reads are lock-free through `DashMap`; every mutation holds a
//! single write lock and re-reads the balance it changes under that lock.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rust_decimal::Decimal;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::{
    Account, AppError, BalanceAction, DatabaseClient, DatabaseError, TransactionRecord,
};

#[derive(Debug, Default)]
pub struct InMemoryClient {
    accounts: DashMap<Uuid, Account>,
    /// (sort code, account number) -> account id
    identifiers: DashMap<(String, String), Uuid>,
    transactions: Mutex<Vec<TransactionRecord>>,
    write_lock: Mutex<()>,
}

impl InMemoryClient {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// All transaction records in insertion order
    #[must_use]
    pub fn transactions(&self) -> Vec<TransactionRecord> {
        match self.transactions.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Account by id
    #[must_use]
    pub fn account(&self, id: Uuid) -> Option<Account> {
        self.accounts.get(&id).map(|entry| entry.value().clone())
    }

    /// Synchronous insert shared by the async trait method and test seeding
    #[instrument(skip(self, account), fields(sort_code = %account.sort_code, account_number = %account.account_number))]
    pub fn insert(&self, account: &Account) -> Result<(), AppError> {
        let _guard = self.write_guard()?;
        match self
            .identifiers
            .entry((account.sort_code.clone(), account.account_number.clone()))
        {
            Entry::Occupied(_) => Err(DatabaseError::Duplicate(format!(
                "{} {}",
                account.sort_code, account.account_number
            ))
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(account.id);
                self.accounts.insert(account.id, account.clone());
                debug!(count = self.accounts.len(), "Account stored");
                Ok(())
            }
        }
    }

    fn write_guard(&self) -> Result<MutexGuard<'_, ()>, AppError> {
        self.write_lock
            .lock()
            .map_err(|_| AppError::Internal("account store lock poisoned".to_string()))
    }

    fn log(&self) -> Result<MutexGuard<'_, Vec<TransactionRecord>>, AppError> {
        self.transactions
            .lock()
            .map_err(|_| AppError::Internal("transaction log lock poisoned".to_string()))
    }
}

#[async_trait]
impl DatabaseClient for InMemoryClient {
    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        let key = (sort_code.to_string(), account_number.to_string());
        Ok(self
            .identifiers
            .get(&key)
            .and_then(|id| self.account(*id.value())))
    }

    #[instrument(skip(self))]
    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        Ok(self
            .accounts
            .iter()
            .filter(|entry| entry.account_number == account_number)
            .min_by_key(|entry| entry.created_at)
            .map(|entry| entry.value().clone()))
    }

    async fn insert_account(&self, account: &Account) -> Result<(), AppError> {
        self.insert(account)
    }

    #[instrument(skip(self))]
    async fn apply_balance_change(
        &self,
        account_id: Uuid,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<Option<Account>, AppError> {
        let _guard = self.write_guard()?;
        let updated = {
            let mut entry = self
                .accounts
                .get_mut(&account_id)
                .ok_or_else(|| DatabaseError::NotFound(account_id.to_string()))?;
            let Some(next) = action.apply(entry.current_balance, amount) else {
                debug!(balance = %entry.current_balance, "Withdrawal exceeds balance");
                return Ok(None);
            };
            entry.current_balance = next;
            entry.updated_at = Utc::now();
            entry.value().clone()
        };

        let record = match action {
            BalanceAction::Withdraw => TransactionRecord::new(Some(&updated), None, amount),
            BalanceAction::Deposit => TransactionRecord::new(None, Some(&updated), amount),
        };
        self.log()?.push(record);
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    async fn transfer_funds(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        amount: Decimal,
    ) -> Result<bool, AppError> {
        let _guard = self.write_guard()?;
        let source = self
            .account(source_id)
            .ok_or_else(|| DatabaseError::NotFound(source_id.to_string()))?;
        let target = self
            .account(target_id)
            .ok_or_else(|| DatabaseError::NotFound(target_id.to_string()))?;

        if source.current_balance < amount {
            return Ok(false);
        }

        let now = Utc::now();
        if let Some(mut entry) = self.accounts.get_mut(&source_id) {
            entry.current_balance -= amount;
            entry.updated_at = now;
        }
        if let Some(mut entry) = self.accounts.get_mut(&target_id) {
            entry.current_balance += amount;
            entry.updated_at = now;
        }

        self.log()?
            .push(TransactionRecord::new(Some(&source), Some(&target), amount));
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn list_transactions(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        let limit = usize::try_from(limit.clamp(1, 100)).unwrap_or(100);
        let records = self.log()?;
        Ok(records
            .iter()
            .rev()
            .filter(|r| {
                r.source_account_id == Some(account_id) || r.target_account_id == Some(account_id)
            })
            .take(limit)
            .cloned()
            .collect())
    }
}
