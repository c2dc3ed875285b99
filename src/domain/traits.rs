//! Domain traits defining contracts for collaborators and storage.

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::AppError;
use super::types::{Account, BalanceAction, TransactionInput, TransactionRecord};

/// Account store used by the ledger services
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Check store connectivity
    async fn health_check(&self) -> Result<(), AppError>;

    /// Find an account by sort code and account number
    async fn find_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError>;

    /// Find an account by account number alone
    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError>;

    /// Persist a new account. Fails with `DatabaseError::Duplicate` when the
    /// sort code / account number pair is taken.
    async fn insert_account(&self, account: &Account) -> Result<(), AppError>;

    /// Atomically apply a balance change and append a transaction record.
    /// The balance is re-read under the same lock as the update; a withdrawal
    /// it no longer covers returns `None` without mutating anything.
    async fn apply_balance_change(
        &self,
        account_id: Uuid,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<Option<Account>, AppError>;

    /// Atomically move `amount` from source to target if the source balance
    /// covers it. Returns `false` without mutating anything otherwise.
    async fn transfer_funds(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        amount: Decimal,
    ) -> Result<bool, AppError>;

    /// Transactions touching an account, newest first
    async fn list_transactions(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, AppError>;
}

/// Account lookup and creation
#[async_trait]
pub trait AccountService: Send + Sync {
    /// `None` when no account matches; never an error for a well-formed miss
    async fn get_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError>;

    async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError>;

    /// `None` signals that the account could not be created
    async fn create_account(
        &self,
        bank_name: &str,
        owner_name: &str,
    ) -> Result<Option<Account>, AppError>;
}

/// Balance checks and mutations
#[async_trait]
pub trait TransactionService: Send + Sync {
    /// Pure predicate: can `balance` cover `amount`
    fn is_amount_available(&self, amount: Decimal, balance: Decimal) -> bool;

    /// Returns `false` when the stored balance no longer covers a withdrawal
    async fn update_account_balance(
        &self,
        account: &Account,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<bool, AppError>;

    /// Returns whether the transfer completed
    async fn make_transfer(&self, input: &TransactionInput) -> Result<bool, AppError>;
}
