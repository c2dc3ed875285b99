//! Mock implementations for testing.

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use crate::domain::{
    Account, AccountService, AppError, BalanceAction, DatabaseClient, DatabaseError,
    TransactionInput, TransactionRecord, TransactionService,
};
use crate::infra::InMemoryClient;

/// Configuration for mock behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub should_fail: bool,
    pub error_message: Option<String>,
}

impl MockConfig {
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }

    fn check(&self) -> Result<(), AppError> {
        if self.should_fail {
            let msg = self
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock error".to_string());
            return Err(AppError::Database(DatabaseError::Query(msg)));
        }
        Ok(())
    }
}

fn account(sort_code: &str, account_number: &str, balance: Decimal) -> Account {
    Account::new(
        sort_code.to_string(),
        account_number.to_string(),
        "Mock Bank".to_string(),
        "Mock Owner".to_string(),
    )
    .with_balance(balance)
}

/// Mock database client backed by the in-memory store, with failure injection
pub struct MockDatabaseClient {
    store: InMemoryClient,
    config: MockConfig,
    is_healthy: AtomicBool,
    reject_inserts: AtomicBool,
}

impl MockDatabaseClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            store: InMemoryClient::new(),
            config,
            is_healthy: AtomicBool::new(true),
            reject_inserts: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Every insert reports a sort code / account number collision
    pub fn reject_inserts_as_duplicate(&self, reject: bool) {
        self.reject_inserts.store(reject, Ordering::Relaxed);
    }

    /// Store an account directly, bypassing failure injection
    pub fn seed_account(&self, sort_code: &str, account_number: &str, balance: Decimal) -> Account {
        let account = account(sort_code, account_number, balance);
        self.store.insert(&account).unwrap();
        account
    }

    pub fn balance_of(&self, id: Uuid) -> Option<Decimal> {
        self.store.account(id).map(|a| a.current_balance)
    }

    /// Get all stored transaction records (for testing)
    pub fn get_all_transactions(&self) -> Vec<TransactionRecord> {
        self.store.transactions()
    }
}

impl Default for MockDatabaseClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn health_check(&self) -> Result<(), AppError> {
        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(AppError::Database(DatabaseError::Connection(
                "Unhealthy".to_string(),
            )));
        }
        self.config.check()
    }

    async fn find_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        self.config.check()?;
        self.store.find_account(sort_code, account_number).await
    }

    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        self.config.check()?;
        self.store.find_account_by_number(account_number).await
    }

    async fn insert_account(&self, account: &Account) -> Result<(), AppError> {
        self.config.check()?;
        if self.reject_inserts.load(Ordering::Relaxed) {
            return Err(DatabaseError::Duplicate(account.account_number.clone()).into());
        }
        self.store.insert_account(account).await
    }

    async fn apply_balance_change(
        &self,
        account_id: Uuid,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<Option<Account>, AppError> {
        self.config.check()?;
        self.store
            .apply_balance_change(account_id, amount, action)
            .await
    }

    async fn transfer_funds(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        amount: Decimal,
    ) -> Result<bool, AppError> {
        self.config.check()?;
        self.store.transfer_funds(source_id, target_id, amount).await
    }

    async fn list_transactions(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        self.config.check()?;
        self.store.list_transactions(account_id, limit).await
    }
}

/// Mock account service recording every call it receives
pub struct MockAccountService {
    accounts: Arc<Mutex<HashMap<(String, String), Account>>>,
    lookups: Mutex<Vec<(String, String)>>,
    number_lookups: Mutex<Vec<String>>,
    creations: Mutex<Vec<(String, String)>>,
    creation_enabled: bool,
    config: MockConfig,
}

impl MockAccountService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(HashMap::new())),
            lookups: Mutex::new(Vec::new()),
            number_lookups: Mutex::new(Vec::new()),
            creations: Mutex::new(Vec::new()),
            creation_enabled: true,
            config,
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// `create_account` answers `None` for every request
    #[must_use]
    pub fn with_creation_disabled(mut self) -> Self {
        self.creation_enabled = false;
        self
    }

    pub fn seed(&self, sort_code: &str, account_number: &str, balance: Decimal) -> Account {
        let account = account(sort_code, account_number, balance);
        self.accounts.lock().unwrap().insert(
            (sort_code.to_string(), account_number.to_string()),
            account.clone(),
        );
        account
    }

    pub fn lookups(&self) -> Vec<(String, String)> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn number_lookups(&self) -> Vec<String> {
        self.number_lookups.lock().unwrap().clone()
    }

    pub fn creations(&self) -> Vec<(String, String)> {
        self.creations.lock().unwrap().clone()
    }
}

impl Default for MockAccountService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountService for MockAccountService {
    async fn get_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        self.lookups
            .lock()
            .unwrap()
            .push((sort_code.to_string(), account_number.to_string()));
        self.config.check()?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .get(&(sort_code.to_string(), account_number.to_string()))
            .cloned())
    }

    async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        self.number_lookups
            .lock()
            .unwrap()
            .push(account_number.to_string());
        self.config.check()?;
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts
            .values()
            .find(|a| a.account_number == account_number)
            .cloned())
    }

    async fn create_account(
        &self,
        bank_name: &str,
        owner_name: &str,
    ) -> Result<Option<Account>, AppError> {
        self.creations
            .lock()
            .unwrap()
            .push((bank_name.to_string(), owner_name.to_string()));
        self.config.check()?;
        if !self.creation_enabled {
            return Ok(None);
        }
        let account = Account::new(
            "00-00-01".to_string(),
            format!("{:08}", self.creations.lock().unwrap().len()),
            bank_name.to_string(),
            owner_name.to_string(),
        );
        self.accounts.lock().unwrap().insert(
            (account.sort_code.clone(), account.account_number.clone()),
            account.clone(),
        );
        Ok(Some(account))
    }
}

/// Mock transaction service recording balance updates and transfers
pub struct MockTransactionService {
    transfer_result: bool,
    update_result: bool,
    transfers: AtomicUsize,
    updates: Mutex<Vec<(Uuid, Decimal, BalanceAction)>>,
    config: MockConfig,
}

impl MockTransactionService {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            transfer_result: true,
            update_result: true,
            transfers: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
            config,
        }
    }

    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    #[must_use]
    pub fn with_transfer_result(mut self, completed: bool) -> Self {
        self.transfer_result = completed;
        self
    }

    /// `update_account_balance` reports whether the store applied the change
    #[must_use]
    pub fn with_update_result(mut self, applied: bool) -> Self {
        self.update_result = applied;
        self
    }

    pub fn transfer_count(&self) -> usize {
        self.transfers.load(Ordering::Relaxed)
    }

    pub fn updates(&self) -> Vec<(Uuid, Decimal, BalanceAction)> {
        self.updates.lock().unwrap().clone()
    }
}

impl Default for MockTransactionService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionService for MockTransactionService {
    fn is_amount_available(&self, amount: Decimal, balance: Decimal) -> bool {
        balance >= amount
    }

    async fn update_account_balance(
        &self,
        account: &Account,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<bool, AppError> {
        self.config.check()?;
        self.updates
            .lock()
            .unwrap()
            .push((account.id, amount, action));
        Ok(self.update_result)
    }

    async fn make_transfer(&self, _input: &TransactionInput) -> Result<bool, AppError> {
        self.config.check()?;
        self.transfers.fetch_add(1, Ordering::Relaxed);
        Ok(self.transfer_result)
    }
}
