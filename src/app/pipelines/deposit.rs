//! Deposit into an account identified by account number alone.
//!
//! Only the target account number is validated here, unlike withdrawal which
//! checks the full search criteria.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::domain::messages::{INVALID_SEARCH_CRITERIA, NO_ACCOUNT_FOUND, SUCCESS};
use crate::domain::validation::is_account_no_valid;
use crate::domain::{
    AccountService, AppError, BalanceAction, DepositInput, Outcome, OutcomeBuilder,
    TransactionService,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepositStep {
    PreValidation,
    ValidationFailedGeneric,
    AccountLookup,
    ResultEmpty,
    BalanceUpdate,
    ResultSuccess,
}

#[instrument(skip_all, fields(amount = %input.amount))]
pub async fn evaluate_deposit(
    accounts: &dyn AccountService,
    transactions: &dyn TransactionService,
    input: &DepositInput,
) -> Result<Outcome<String, DepositStep>, AppError> {
    let mut builder = OutcomeBuilder::begin();
    builder.record(DepositStep::PreValidation);

    if !is_account_no_valid(&input.target_account_no) {
        builder.record(DepositStep::ValidationFailedGeneric);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_SEARCH_CRITERIA)));
    }

    builder.record(DepositStep::AccountLookup);
    let Some(account) = accounts
        .get_account_by_number(&input.target_account_no)
        .await?
    else {
        builder.record(DepositStep::ResultEmpty);
        return Ok(builder.empty(StatusCode::OK, Some(NO_ACCOUNT_FOUND)));
    };

    builder.record(DepositStep::BalanceUpdate);
    transactions
        .update_account_balance(&account, input.amount, BalanceAction::Deposit)
        .await?;

    builder.record(DepositStep::ResultSuccess);
    Ok(builder.success(SUCCESS.to_string(), StatusCode::OK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutcomeKind;
    use crate::test_utils::{MockAccountService, MockTransactionService};
    use rust_decimal_macros::dec;

    fn deposit(target: &str) -> DepositInput {
        DepositInput {
            target_account_no: target.to_string(),
            amount: dec!(50),
        }
    }

    #[tokio::test]
    async fn test_invalid_account_number_skips_lookup() {
        let accounts = MockAccountService::new();
        let transactions = MockTransactionService::new();

        let outcome = evaluate_deposit(&accounts, &transactions, &deposit("12-34"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::InvalidInput);
        assert_eq!(outcome.status(), StatusCode::BAD_REQUEST);
        assert_eq!(outcome.message(), Some(INVALID_SEARCH_CRITERIA));
        assert!(accounts.number_lookups().is_empty());
        assert!(transactions.updates().is_empty());
        assert_eq!(
            outcome.decision_trail(),
            &[DepositStep::PreValidation, DepositStep::ValidationFailedGeneric]
        );
    }

    #[tokio::test]
    async fn test_deposit_updates_balance() {
        let accounts = MockAccountService::new();
        let account = accounts.seed("12-34-56", "12345678", dec!(0));
        let transactions = MockTransactionService::new();

        let outcome = evaluate_deposit(&accounts, &transactions, &deposit("12345678"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::Success);
        assert_eq!(accounts.number_lookups(), vec!["12345678".to_string()]);
        assert_eq!(
            transactions.updates(),
            vec![(account.id, dec!(50), BalanceAction::Deposit)]
        );
        assert_eq!(
            outcome.decision_trail(),
            &[
                DepositStep::PreValidation,
                DepositStep::AccountLookup,
                DepositStep::BalanceUpdate,
                DepositStep::ResultSuccess,
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_account_is_empty_result() {
        let accounts = MockAccountService::new();
        let transactions = MockTransactionService::new();

        let outcome = evaluate_deposit(&accounts, &transactions, &deposit("87654321"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::EmptyResult);
        assert_eq!(outcome.status(), StatusCode::OK);
        assert!(transactions.updates().is_empty());
    }
}
