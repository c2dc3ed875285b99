//! Funds transfer between two accounts.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use crate::domain::messages::INVALID_TRANSACTION;
use crate::domain::validation::is_search_transaction_valid;
use crate::domain::{AppError, Outcome, OutcomeBuilder, TransactionInput, TransactionService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferStep {
    PreValidation,
    ValidationFailedGeneric,
    TransferAttempt,
    TransferFailed,
    ResultSuccess,
}

/// Payload is whether the transfer completed; a failed transfer still
/// reports `false` rather than an absent payload.
#[instrument(skip_all, fields(amount = %input.amount))]
pub async fn evaluate_transfer(
    transactions: &dyn TransactionService,
    input: &TransactionInput,
) -> Result<Outcome<bool, TransferStep>, AppError> {
    let mut builder = OutcomeBuilder::begin();
    builder.record(TransferStep::PreValidation);

    if !is_search_transaction_valid(input) {
        builder.record(TransferStep::ValidationFailedGeneric);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_TRANSACTION)));
    }

    builder.record(TransferStep::TransferAttempt);
    if !transactions.make_transfer(input).await? {
        builder.record(TransferStep::TransferFailed);
        return Ok(builder.failure_with(false, StatusCode::OK, Some(INVALID_TRANSACTION)));
    }

    builder.record(TransferStep::ResultSuccess);
    Ok(builder.success(true, StatusCode::OK))
}
