//! Request evaluation pipelines.
//!
//! Each pipeline runs validation, then lookup, then mutation, recording a
//! decision step at every stage transition, and always resolves to an
//! [`Outcome`](crate::domain::Outcome). Only collaborator failures escape as
//! `AppError`.

pub mod creation;
pub mod deposit;
pub mod lookup;
pub mod transfer;
pub mod withdrawal;

pub use creation::{CreationStep, evaluate_account_creation};
pub use deposit::{DepositStep, evaluate_deposit};
pub use lookup::{LookupStep, evaluate_account_lookup};
pub use transfer::{TransferStep, evaluate_transfer};
pub use withdrawal::{WithdrawalStep, evaluate_withdrawal};

use crate::domain::OutcomeBuilder;

/// Trim `value`, recording `step` only if trimming changed it
pub(crate) fn sanitize_and_record<T, S>(
    value: &str,
    step: S,
    builder: &mut OutcomeBuilder<T, S>,
) -> String {
    let sanitized = value.trim();
    if sanitized != value {
        builder.record(step);
    }
    sanitized.to_string()
}
