//! Structural predicates over request inputs.
//!
//! These are pure functions: no I/O, no logging. Pipelines call them after
//! sanitization and before any service call.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{AccountInput, CreateAccountInput, TransactionInput};

/// UK-style sort code, e.g. `53-68-92`
pub static SORT_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{2}$").expect("valid sort code regex"));

/// Eight-digit account number
pub static ACCOUNT_NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{8}$").expect("valid account number regex"));

#[must_use]
pub fn is_sort_code_valid(sort_code: &str) -> bool {
    SORT_CODE_REGEX.is_match(sort_code)
}

#[must_use]
pub fn is_account_no_valid(account_number: &str) -> bool {
    ACCOUNT_NUMBER_REGEX.is_match(account_number)
}

/// Both identifiers are well-formed
#[must_use]
pub fn is_search_criteria_valid(input: &AccountInput) -> bool {
    is_sort_code_valid(&input.sort_code) && is_account_no_valid(&input.account_number)
}

#[must_use]
pub fn is_create_account_criteria_valid(input: &CreateAccountInput) -> bool {
    !input.bank_name.trim().is_empty() && !input.owner_name.trim().is_empty()
}

/// Both sides are well-formed and refer to different accounts
#[must_use]
pub fn is_search_transaction_valid(input: &TransactionInput) -> bool {
    is_search_criteria_valid(&input.source_account)
        && is_search_criteria_valid(&input.target_account)
        && input.source_account != input.target_account
}
