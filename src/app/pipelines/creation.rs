//! Account creation.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use super::sanitize_and_record;
use crate::domain::messages::{CREATE_ACCOUNT_FAILED, INVALID_SEARCH_CRITERIA};
use crate::domain::validation::is_create_account_criteria_valid;
use crate::domain::{
    Account, AccountService, AppError, CreateAccountInput, Outcome, OutcomeBuilder,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CreationStep {
    PreValidation,
    BankNameSanitized,
    OwnerNameSanitized,
    ValidationFailedMissingFields,
    ValidationFailedGeneric,
    CreationAttempt,
    CreationFailure,
    CreationSuccess,
}

#[instrument(skip_all)]
pub async fn evaluate_account_creation(
    accounts: &dyn AccountService,
    input: &CreateAccountInput,
) -> Result<Outcome<Account, CreationStep>, AppError> {
    let mut builder = OutcomeBuilder::begin();
    builder.record(CreationStep::PreValidation);

    let bank_name =
        sanitize_and_record(&input.bank_name, CreationStep::BankNameSanitized, &mut builder);
    let owner_name =
        sanitize_and_record(&input.owner_name, CreationStep::OwnerNameSanitized, &mut builder);

    if bank_name.is_empty() || owner_name.is_empty() {
        builder.record(CreationStep::ValidationFailedMissingFields);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_SEARCH_CRITERIA)));
    }

    let sanitized = CreateAccountInput::new(bank_name, owner_name);
    if !is_create_account_criteria_valid(&sanitized) {
        builder.record(CreationStep::ValidationFailedGeneric);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_SEARCH_CRITERIA)));
    }

    builder.record(CreationStep::CreationAttempt);
    match accounts
        .create_account(&sanitized.bank_name, &sanitized.owner_name)
        .await?
    {
        None => {
            builder.record(CreationStep::CreationFailure);
            Ok(builder.empty(StatusCode::OK, Some(CREATE_ACCOUNT_FAILED)))
        }
        Some(account) => {
            builder.record(CreationStep::CreationSuccess);
            Ok(builder.success(account, StatusCode::OK))
        }
    }
}
