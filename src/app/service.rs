//! Ledger-backed account and transaction services.

use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

use crate::domain::{
    Account, AccountService, AppError, BalanceAction, DatabaseClient, DatabaseError,
    TransactionInput, TransactionService,
};

/// Attempts at finding a free sort code / account number pair
const MAX_CREATE_ATTEMPTS: usize = 5;

fn generate_identifiers() -> (String, String) {
    let mut rng = rand::thread_rng();
    let sort_code = format!(
        "{:02}-{:02}-{:02}",
        rng.gen_range(0..100),
        rng.gen_range(0..100),
        rng.gen_range(0..100)
    );
    let account_number = format!("{:08}", rng.gen_range(0..100_000_000u32));
    (sort_code, account_number)
}

/// Account lookup and creation backed by a [`DatabaseClient`]
pub struct LedgerAccountService {
    db_client: Arc<dyn DatabaseClient>,
}

impl LedgerAccountService {
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl AccountService for LedgerAccountService {
    #[instrument(skip(self))]
    async fn get_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        self.db_client.find_account(sort_code, account_number).await
    }

    #[instrument(skip(self))]
    async fn get_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        self.db_client.find_account_by_number(account_number).await
    }

    #[instrument(skip(self))]
    async fn create_account(
        &self,
        bank_name: &str,
        owner_name: &str,
    ) -> Result<Option<Account>, AppError> {
        for attempt in 1..=MAX_CREATE_ATTEMPTS {
            let (sort_code, account_number) = generate_identifiers();
            let account = Account::new(
                sort_code,
                account_number,
                bank_name.to_string(),
                owner_name.to_string(),
            );

            match self.db_client.insert_account(&account).await {
                Ok(()) => {
                    info!(
                        id = %account.id,
                        sort_code = %account.sort_code,
                        account_number = %account.account_number,
                        "Account created"
                    );
                    return Ok(Some(account));
                }
                Err(AppError::Database(DatabaseError::Duplicate(reason))) => {
                    warn!(attempt, reason = %reason, "Generated identifiers already taken");
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            attempts = MAX_CREATE_ATTEMPTS,
            "Giving up on account creation: no free identifiers"
        );
        Ok(None)
    }
}

/// Balance checks and mutations backed by a [`DatabaseClient`]
pub struct LedgerTransactionService {
    db_client: Arc<dyn DatabaseClient>,
}

impl LedgerTransactionService {
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>) -> Self {
        Self { db_client }
    }
}

#[async_trait]
impl TransactionService for LedgerTransactionService {
    fn is_amount_available(&self, amount: Decimal, balance: Decimal) -> bool {
        balance - amount >= Decimal::ZERO
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn update_account_balance(
        &self,
        account: &Account,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<bool, AppError> {
        let Some(updated) = self
            .db_client
            .apply_balance_change(account.id, amount, action)
            .await?
        else {
            warn!(action = %action, amount = %amount, "Balance update rejected by store: balance changed");
            return Ok(false);
        };
        info!(
            action = %action,
            amount = %amount,
            balance = %updated.current_balance,
            "Account balance updated"
        );
        Ok(true)
    }

    #[instrument(skip(self, input), fields(amount = %input.amount))]
    async fn make_transfer(&self, input: &TransactionInput) -> Result<bool, AppError> {
        let source = self
            .db_client
            .find_account(
                &input.source_account.sort_code,
                &input.source_account.account_number,
            )
            .await?;
        let target = self
            .db_client
            .find_account(
                &input.target_account.sort_code,
                &input.target_account.account_number,
            )
            .await?;

        let (Some(source), Some(target)) = (source, target) else {
            warn!("Transfer rejected: source or target account not found");
            return Ok(false);
        };

        if !self.is_amount_available(input.amount, source.current_balance) {
            warn!(source_id = %source.id, "Transfer rejected: insufficient balance");
            return Ok(false);
        }

        let completed = self
            .db_client
            .transfer_funds(source.id, target.id, input.amount)
            .await?;
        if completed {
            info!(source_id = %source.id, target_id = %target.id, "Transfer completed");
        } else {
            warn!(source_id = %source.id, "Transfer rejected by store: balance changed");
        }
        Ok(completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountInput, validation};
    use crate::test_utils::MockDatabaseClient;
    use rust_decimal_macros::dec;

    fn seeded() -> (Arc<MockDatabaseClient>, Account, Account) {
        let db = Arc::new(MockDatabaseClient::new());
        let source = db.seed_account("11-11-11", "11111111", dec!(100));
        let target = db.seed_account("22-22-22", "22222222", dec!(5));
        (db, source, target)
    }

    fn transfer(amount: Decimal) -> TransactionInput {
        TransactionInput {
            source_account: AccountInput::new("11-11-11", "11111111"),
            target_account: AccountInput::new("22-22-22", "22222222"),
            amount,
        }
    }

    #[test]
    fn test_generated_identifiers_are_well_formed() {
        for _ in 0..50 {
            let (sort_code, account_number) = generate_identifiers();
            assert!(validation::is_sort_code_valid(&sort_code), "{sort_code}");
            assert!(validation::is_account_no_valid(&account_number), "{account_number}");
        }
    }

    #[test]
    fn test_is_amount_available() {
        let service = LedgerTransactionService::new(Arc::new(MockDatabaseClient::new()));
        assert!(service.is_amount_available(dec!(50), dec!(100)));
        assert!(service.is_amount_available(dec!(100), dec!(100)));
        assert!(!service.is_amount_available(dec!(150), dec!(100)));
    }

    #[tokio::test]
    async fn test_create_account_persists_zero_balance() {
        let db = Arc::new(MockDatabaseClient::new());
        let service = LedgerAccountService::new(Arc::clone(&db) as _);

        let account = service
            .create_account("Bank", "Owner")
            .await
            .unwrap()
            .expect("account created");

        assert_eq!(account.current_balance, Decimal::ZERO);
        let stored = db
            .find_account(&account.sort_code, &account.account_number)
            .await
            .unwrap();
        assert_eq!(stored, Some(account));
    }

    #[tokio::test]
    async fn test_create_account_returns_none_when_identifiers_exhausted() {
        let db = Arc::new(MockDatabaseClient::new());
        db.reject_inserts_as_duplicate(true);
        let service = LedgerAccountService::new(Arc::clone(&db) as _);

        let result = service.create_account("Bank", "Owner").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_account_propagates_store_errors() {
        let db = Arc::new(MockDatabaseClient::failing("down"));
        let service = LedgerAccountService::new(db as _);

        let result = service.create_account("Bank", "Owner").await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_make_transfer_moves_funds() {
        let (db, source, target) = seeded();
        let service = LedgerTransactionService::new(Arc::clone(&db) as _);

        assert!(service.make_transfer(&transfer(dec!(40))).await.unwrap());

        assert_eq!(db.balance_of(source.id), Some(dec!(60)));
        assert_eq!(db.balance_of(target.id), Some(dec!(45)));
        assert_eq!(db.get_all_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_make_transfer_rejects_insufficient_balance() {
        let (db, source, target) = seeded();
        let service = LedgerTransactionService::new(Arc::clone(&db) as _);

        assert!(!service.make_transfer(&transfer(dec!(150))).await.unwrap());

        assert_eq!(db.balance_of(source.id), Some(dec!(100)));
        assert_eq!(db.balance_of(target.id), Some(dec!(5)));
        assert!(db.get_all_transactions().is_empty());
    }

    #[tokio::test]
    async fn test_make_transfer_rejects_unknown_target() {
        let (db, _, _) = seeded();
        let service = LedgerTransactionService::new(Arc::clone(&db) as _);
        let mut input = transfer(dec!(10));
        input.target_account = AccountInput::new("99-99-99", "99999999");

        assert!(!service.make_transfer(&input).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_account_balance_withdraw_and_deposit() {
        let (db, source, _) = seeded();
        let service = LedgerTransactionService::new(Arc::clone(&db) as _);

        assert!(
            service
                .update_account_balance(&source, dec!(30), BalanceAction::Withdraw)
                .await
                .unwrap()
        );
        assert!(
            service
                .update_account_balance(&source, dec!(5), BalanceAction::Deposit)
                .await
                .unwrap()
        );

        assert_eq!(db.balance_of(source.id), Some(dec!(75)));
        assert_eq!(db.get_all_transactions().len(), 2);
    }

    #[tokio::test]
    async fn test_withdrawal_rejected_when_balance_dropped_since_lookup() {
        let (db, source, _) = seeded();
        let service = LedgerTransactionService::new(Arc::clone(&db) as _);

        // `source` still shows 100 after another withdrawal took 60
        assert!(
            service
                .update_account_balance(&source, dec!(60), BalanceAction::Withdraw)
                .await
                .unwrap()
        );
        assert!(service.is_amount_available(dec!(60), source.current_balance));
        assert!(
            !service
                .update_account_balance(&source, dec!(60), BalanceAction::Withdraw)
                .await
                .unwrap()
        );

        assert_eq!(db.balance_of(source.id), Some(dec!(40)));
        assert_eq!(db.get_all_transactions().len(), 1);
    }
}
