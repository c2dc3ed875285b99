//! Account lookup by sort code and account number.

use axum::http::StatusCode;
use serde::Serialize;
use tracing::instrument;

use super::sanitize_and_record;
use crate::domain::messages::{INVALID_SEARCH_CRITERIA, NO_ACCOUNT_FOUND};
use crate::domain::validation::is_search_criteria_valid;
use crate::domain::{Account, AccountInput, AccountService, AppError, Outcome, OutcomeBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LookupStep {
    PreValidation,
    SortCodeSanitized,
    AccountNumberSanitized,
    ValidationFailedMissingFields,
    ValidationFailedGeneric,
    ServiceInvocation,
    ResultEmpty,
    ResultSuccess,
}

#[instrument(skip_all)]
pub async fn evaluate_account_lookup(
    accounts: &dyn AccountService,
    input: &AccountInput,
) -> Result<Outcome<Account, LookupStep>, AppError> {
    let mut builder = OutcomeBuilder::begin();
    builder.record(LookupStep::PreValidation);

    let sort_code =
        sanitize_and_record(&input.sort_code, LookupStep::SortCodeSanitized, &mut builder);
    let account_number = sanitize_and_record(
        &input.account_number,
        LookupStep::AccountNumberSanitized,
        &mut builder,
    );

    if sort_code.is_empty() || account_number.is_empty() {
        builder.record(LookupStep::ValidationFailedMissingFields);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_SEARCH_CRITERIA)));
    }

    let sanitized = AccountInput::new(sort_code, account_number);
    if !is_search_criteria_valid(&sanitized) {
        builder.record(LookupStep::ValidationFailedGeneric);
        return Ok(builder.invalid(StatusCode::BAD_REQUEST, Some(INVALID_SEARCH_CRITERIA)));
    }

    builder.record(LookupStep::ServiceInvocation);
    match accounts
        .get_account(&sanitized.sort_code, &sanitized.account_number)
        .await?
    {
        None => {
            builder.record(LookupStep::ResultEmpty);
            Ok(builder.empty(StatusCode::OK, Some(NO_ACCOUNT_FOUND)))
        }
        Some(account) => {
            builder.record(LookupStep::ResultSuccess);
            Ok(builder.success(account, StatusCode::OK))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutcomeKind;
    use crate::test_utils::MockAccountService;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_padded_sort_code_is_trimmed_before_lookup() {
        let accounts = MockAccountService::new();

        let outcome = evaluate_account_lookup(&accounts, &AccountInput::new(" 12-34-56 ", "12345678"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::EmptyResult);
        assert_eq!(outcome.status(), StatusCode::OK);
        assert_eq!(outcome.message(), Some(NO_ACCOUNT_FOUND));
        assert_eq!(
            accounts.lookups(),
            vec![("12-34-56".to_string(), "12345678".to_string())]
        );
        assert_eq!(
            outcome.decision_trail(),
            &[
                LookupStep::PreValidation,
                LookupStep::SortCodeSanitized,
                LookupStep::ServiceInvocation,
                LookupStep::ResultEmpty,
            ]
        );
    }

    #[tokio::test]
    async fn test_both_fields_padded_record_two_sanitize_steps() {
        let accounts = MockAccountService::new();
        let outcome =
            evaluate_account_lookup(&accounts, &AccountInput::new(" 12-34-56", "12345678 "))
                .await
                .unwrap();

        let sanitized: Vec<_> = outcome
            .decision_trail()
            .iter()
            .filter(|s| {
                matches!(
                    s,
                    LookupStep::SortCodeSanitized | LookupStep::AccountNumberSanitized
                )
            })
            .collect();
        assert_eq!(sanitized.len(), 2);
        assert_eq!(
            accounts.lookups(),
            vec![("12-34-56".to_string(), "12345678".to_string())]
        );
    }

    #[tokio::test]
    async fn test_both_padded_fields_find_the_trimmed_account() {
        let accounts = MockAccountService::new();
        let account = accounts.seed("12-34-56", "12345678", dec!(10));

        let outcome =
            evaluate_account_lookup(&accounts, &AccountInput::new("  12-34-56 ", "\t12345678 "))
                .await
                .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::Success);
        assert_eq!(outcome.payload(), Some(&account));
    }

    #[tokio::test]
    async fn test_found_account_is_payload() {
        let accounts = MockAccountService::new();
        let account = accounts.seed("12-34-56", "12345678", dec!(42));

        let outcome = evaluate_account_lookup(&accounts, &AccountInput::new("12-34-56", "12345678"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::Success);
        assert_eq!(outcome.payload(), Some(&account));
        assert_eq!(outcome.decision_trail().last(), Some(&LookupStep::ResultSuccess));
    }

    #[tokio::test]
    async fn test_blank_field_short_circuits() {
        let accounts = MockAccountService::new();

        let outcome = evaluate_account_lookup(&accounts, &AccountInput::new("   ", "12345678"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::InvalidInput);
        assert_eq!(outcome.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            outcome.decision_trail(),
            &[
                LookupStep::PreValidation,
                LookupStep::SortCodeSanitized,
                LookupStep::ValidationFailedMissingFields,
            ]
        );
        assert!(accounts.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_criteria_rejected() {
        let accounts = MockAccountService::new();

        let outcome = evaluate_account_lookup(&accounts, &AccountInput::new("123456", "12345678"))
            .await
            .unwrap();

        assert_eq!(outcome.kind(), OutcomeKind::InvalidInput);
        assert_eq!(outcome.message(), Some(INVALID_SEARCH_CRITERIA));
        assert_eq!(
            outcome.decision_trail(),
            &[LookupStep::PreValidation, LookupStep::ValidationFailedGeneric]
        );
        assert!(accounts.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_same_input_same_trail() {
        let accounts = MockAccountService::new();
        let input = AccountInput::new(" 12-34-56", "12345678");

        let first = evaluate_account_lookup(&accounts, &input).await.unwrap();
        let second = evaluate_account_lookup(&accounts, &input).await.unwrap();

        assert_eq!(first.decision_trail(), second.decision_trail());
    }

    #[tokio::test]
    async fn test_service_error_propagates() {
        let accounts = MockAccountService::failing("store offline");

        let result =
            evaluate_account_lookup(&accounts, &AccountInput::new("12-34-56", "12345678")).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
