//! Domain layer containing core business types, traits, and error definitions.

pub mod error;
pub mod messages;
pub mod outcome;
pub mod traits;
pub mod types;
pub mod validation;

pub use error::{AppError, ConfigError, DatabaseError, ValidationError};
pub use outcome::{Outcome, OutcomeBuilder, OutcomeKind, Resolution};
pub use traits::{AccountService, DatabaseClient, TransactionService};
pub use types::{
    Account, AccountInput, BalanceAction, CreateAccountInput, DepositInput, ErrorDetail,
    ErrorResponse, HealthResponse, HealthStatus, TransactionInput, TransactionRecord,
    WithdrawInput,
};
