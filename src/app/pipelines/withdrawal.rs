//! Withdrawal from an account identified by sort code and account number.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::domain::messages::{
    INSUFFICIENT_ACCOUNT_BALANCE, INVALID_SEARCH_CRITERIA, NO_ACCOUNT_FOUND, SUCCESS,
};
use crate::domain::validation::is_search_criteria_valid;
use crate::domain::{
    AccountService, AppError, BalanceAction, Outcome, OutcomeBuilder, TransactionService,
    WithdrawInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WithdrawalStep {
    PreValidation,
    ValidationFailedGeneric,
    AccountLookup,
    ResultEmpty,
    BalanceCheck,
    InsufficientFunds,
    BalanceUpdate,
    ResultSuccess,
}

#[instrument(skip_all, fields(amount = %input.amount))]
pub async fn evaluate_withdrawal(
    accounts: &dyn AccountService,
    transactions: &dyn TransactionService,
    input: &WithdrawInput,
) -> Result<Outcome<String, WithdrawalStep>, AppError> {
    let mut builder = OutcomeBuilder::begin();
    builder.record(WithdrawalStep::PreValidation);

    if !is_search_criteria_valid(&input.account()) {
        builder.record(WithdrawalStep::ValidationFailedGeneric);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_SEARCH_CRITERIA)));
    }

    builder.record(WithdrawalStep::AccountLookup);
    let Some(account) = accounts
        .get_account(&input.sort_code, &input.account_number)
        .await?
    else {
        builder.record(WithdrawalStep::ResultEmpty);
        return Ok(builder.empty(StatusCode::OK, Some(NO_ACCOUNT_FOUND)));
    };

    builder.record(WithdrawalStep::BalanceCheck);
    if !transactions.is_amount_available(input.amount, account.current_balance) {
        builder.record(WithdrawalStep::InsufficientFunds);
        return Ok(builder.failure(StatusCode::OK, Some(INSUFFICIENT_ACCOUNT_BALANCE)));
    }

    builder.record(WithdrawalStep::BalanceUpdate);
    let applied = transactions
        .update_account_balance(&account, input.amount, BalanceAction::Withdraw)
        .await?;
    if !applied {
        builder.record(WithdrawalStep::InsufficientFunds);
        return Ok(builder.failure(StatusCode::OK, Some(INSUFFICIENT_ACCOUNT_BALANCE)));
    }

    builder.record(WithdrawalStep::ResultSuccess);
    Ok(builder.success(SUCCESS.to_string(), StatusCode::OK))
}
