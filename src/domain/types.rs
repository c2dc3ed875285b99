//! Domain types with validation support.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Direction of a single-account balance change
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceAction {
    Withdraw,
    Deposit,
}

impl BalanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Withdraw => "WITHDRAW",
            Self::Deposit => "DEPOSIT",
        }
    }

    /// Apply this action to `balance`; `None` when a withdrawal would
    /// overdraw it
    #[must_use]
    pub fn apply(&self, balance: Decimal, amount: Decimal) -> Option<Decimal> {
        match self {
            Self::Withdraw if balance < amount => None,
            Self::Withdraw => Some(balance - amount),
            Self::Deposit => Some(balance + amount),
        }
    }
}

impl std::fmt::Display for BalanceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Bank account entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    #[schema(example = "53-68-92")]
    pub sort_code: String,
    #[schema(example = "73084635")]
    pub account_number: String,
    #[schema(example = "Example Bank")]
    pub bank_name: String,
    #[schema(example = "Jane Doe")]
    pub owner_name: String,
    #[schema(value_type = String, example = "1071.78")]
    pub current_balance: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    #[must_use]
    pub fn new(
        sort_code: String,
        account_number: String,
        bank_name: String,
        owner_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            sort_code,
            account_number,
            bank_name,
            owner_name,
            current_balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.current_balance = balance;
        self
    }
}

/// Ledger entry written for every balance change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: Uuid,
    pub source_account_id: Option<Uuid>,
    pub target_account_id: Option<Uuid>,
    pub target_owner_name: Option<String>,
    #[schema(value_type = String, example = "25.00")]
    pub amount: Decimal,
    pub initiation_date: DateTime<Utc>,
}

impl TransactionRecord {
    #[must_use]
    pub fn new(
        source: Option<&Account>,
        target: Option<&Account>,
        amount: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_account_id: source.map(|a| a.id),
            target_account_id: target.map(|a| a.id),
            target_owner_name: target.map(|a| a.owner_name.clone()),
            amount,
            initiation_date: Utc::now(),
        }
    }
}

/// Decimal places an amount may carry
pub const MAX_AMOUNT_SCALE: u32 = 2;

fn validate_positive(amount: &Decimal) -> Result<(), ValidationError> {
    if !amount.is_sign_positive() || amount.is_zero() {
        return Err(
            ValidationError::new("positive").with_message("Amount must be greater than 0".into())
        );
    }
    if amount.normalize().scale() > MAX_AMOUNT_SCALE {
        return Err(ValidationError::new("scale")
            .with_message("Amount must have at most 2 decimal places".into()));
    }
    Ok(())
}

/// Account identification by sort code and account number
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInput {
    #[validate(length(min = 1, message = "Sort code is mandatory"))]
    #[schema(example = "53-68-92")]
    pub sort_code: String,
    #[validate(length(min = 1, message = "Account number is mandatory"))]
    #[schema(example = "73084635")]
    pub account_number: String,
}

impl AccountInput {
    #[must_use]
    pub fn new(sort_code: impl Into<String>, account_number: impl Into<String>) -> Self {
        Self {
            sort_code: sort_code.into(),
            account_number: account_number.into(),
        }
    }
}

/// Request to open a new account
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateAccountInput {
    #[validate(length(min = 1, message = "Bank name is mandatory"))]
    #[schema(example = "Example Bank")]
    pub bank_name: String,
    #[validate(length(min = 1, message = "Owner name is mandatory"))]
    #[schema(example = "Jane Doe")]
    pub owner_name: String,
}

impl CreateAccountInput {
    #[must_use]
    pub fn new(bank_name: impl Into<String>, owner_name: impl Into<String>) -> Self {
        Self {
            bank_name: bank_name.into(),
            owner_name: owner_name.into(),
        }
    }
}

/// Request to move funds between two accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionInput {
    #[validate(nested)]
    pub source_account: AccountInput,
    #[validate(nested)]
    pub target_account: AccountInput,
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "27.50")]
    pub amount: Decimal,
}

/// Request to withdraw funds from an account
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct WithdrawInput {
    #[validate(length(min = 1, message = "Sort code is mandatory"))]
    #[schema(example = "53-68-92")]
    pub sort_code: String,
    #[validate(length(min = 1, message = "Account number is mandatory"))]
    #[schema(example = "73084635")]
    pub account_number: String,
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "20.00")]
    pub amount: Decimal,
}

impl WithdrawInput {
    /// View as search criteria for validation and lookup
    #[must_use]
    pub fn account(&self) -> AccountInput {
        AccountInput::new(self.sort_code.clone(), self.account_number.clone())
    }
}

/// Request to deposit funds into an account identified by number alone
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DepositInput {
    #[validate(length(min = 1, message = "Target account number is mandatory"))]
    #[schema(example = "73084635")]
    pub target_account_no: String,
    #[validate(custom(function = "validate_positive"))]
    #[schema(value_type = String, example = "50.00")]
    pub amount: Decimal,
}

/// Health status enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational
    Healthy,
    /// Critical systems unavailable
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Overall system status
    pub status: HealthStatus,
    /// Account store health status
    pub database: HealthStatus,
    /// Current server timestamp
    pub timestamp: DateTime<Utc>,
    /// Application version
    #[schema(example = "0.1.0")]
    pub version: String,
}

impl HealthResponse {
    #[must_use]
    pub fn new(database: HealthStatus) -> Self {
        Self {
            status: database,
            database,
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Error type identifier
    #[schema(example = "database_error")]
    pub r#type: String,
    /// Human-readable error message
    #[schema(example = "Database error: Connection failed: pool timed out")]
    pub message: String,
    /// Per-field messages for request validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}
