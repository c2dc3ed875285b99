//! HTTP request handlers with OpenAPI documentation.

use std::fmt::Debug;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{debug, error};
use utoipa::{IntoParams, OpenApi};
use uuid::Uuid;
use validator::Validate;

use super::translate::{Fallbacks, OutcomeResponse, translate, translate_preferring_payload};
use crate::app::AppState;
use crate::app::pipelines::{
    evaluate_account_creation, evaluate_account_lookup, evaluate_deposit, evaluate_transfer,
    evaluate_withdrawal,
};
use crate::domain::{
    Account, AccountInput, AppError, CreateAccountInput, DatabaseError, DepositInput, ErrorDetail,
    ErrorResponse, HealthResponse, HealthStatus, Outcome, TransactionInput, TransactionRecord,
    ValidationError, WithdrawInput,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Banking Outcome API",
        version = "0.1.0",
        description = "Account lookup, creation, transfers, withdrawals and deposits",
        license(
            name = "MIT"
        )
    ),
    paths(
        lookup_account_handler,
        create_account_handler,
        transfer_handler,
        withdraw_handler,
        deposit_handler,
        list_transactions_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            Account,
            AccountInput,
            CreateAccountInput,
            TransactionInput,
            WithdrawInput,
            DepositInput,
            TransactionRecord,
            HealthResponse,
            HealthStatus,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "accounts", description = "Account lookup and creation"),
        (name = "transactions", description = "Transfers, withdrawals and deposits"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// History query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// Maximum number of records to return (1-100, default: 20)
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    20
}

fn validated<T: Validate>(input: &T) -> Result<(), AppError> {
    input.validate().map_err(ValidationError::from)?;
    Ok(())
}

fn log_outcome<T, S: Debug>(operation: &'static str, outcome: &Outcome<T, S>) {
    debug!(
        operation,
        kind = %outcome.kind(),
        status = %outcome.status(),
        trail = ?outcome.decision_trail(),
        "Pipeline resolved"
    );
}

/// Look up an account by sort code and account number
#[utoipa::path(
    post,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = AccountInput,
    responses(
        (status = 200, description = "Account found; a plain-text message when none matches", body = Account),
        (status = 400, description = "Malformed search criteria", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = ErrorResponse),
        (status = 503, description = "Account store unavailable", body = ErrorResponse)
    )
)]
pub async fn lookup_account_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AccountInput>,
) -> Result<OutcomeResponse<Account>, AppError> {
    validated(&payload)?;
    let outcome = evaluate_account_lookup(state.accounts.as_ref(), &payload).await?;
    log_outcome("account_lookup", &outcome);
    Ok(translate(outcome, &Fallbacks::LOOKUP))
}

/// Open a new account with generated identifiers and a zero balance
#[utoipa::path(
    put,
    path = "/api/v1/accounts",
    tag = "accounts",
    request_body = CreateAccountInput,
    responses(
        (status = 200, description = "Account created; a plain-text message when creation failed", body = Account),
        (status = 400, description = "Missing bank or owner name", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn create_account_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateAccountInput>,
) -> Result<OutcomeResponse<Account>, AppError> {
    validated(&payload)?;
    let outcome = evaluate_account_creation(state.accounts.as_ref(), &payload).await?;
    log_outcome("account_creation", &outcome);
    Ok(translate(outcome, &Fallbacks::CREATE))
}

/// Transfer funds between two accounts
///
/// The body is `true` when the transfer completed and `false` when it was
/// denied, for instance because the source balance does not cover it.
#[utoipa::path(
    post,
    path = "/api/v1/transactions",
    tag = "transactions",
    request_body = TransactionInput,
    responses(
        (status = 200, description = "Whether the transfer completed", body = bool),
        (status = 400, description = "Invalid account information", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn transfer_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TransactionInput>,
) -> Result<OutcomeResponse<bool>, AppError> {
    validated(&payload)?;
    let outcome = evaluate_transfer(state.transactions.as_ref(), &payload).await?;
    log_outcome("transfer", &outcome);
    Ok(translate_preferring_payload(outcome, &Fallbacks::TRANSFER))
}

/// Withdraw funds from an account
#[utoipa::path(
    post,
    path = "/api/v1/withdraw",
    tag = "transactions",
    request_body = WithdrawInput,
    responses(
        (status = 200, description = "Withdrawal applied; a plain-text message for an unknown account or insufficient balance", body = String),
        (status = 400, description = "Malformed search criteria", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn withdraw_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WithdrawInput>,
) -> Result<OutcomeResponse<String>, AppError> {
    validated(&payload)?;
    let outcome = evaluate_withdrawal(
        state.accounts.as_ref(),
        state.transactions.as_ref(),
        &payload,
    )
    .await?;
    log_outcome("withdrawal", &outcome);
    Ok(translate(outcome, &Fallbacks::WITHDRAW))
}

/// Deposit funds into an account identified by its number
#[utoipa::path(
    post,
    path = "/api/v1/deposit",
    tag = "transactions",
    request_body = DepositInput,
    responses(
        (status = 200, description = "Deposit applied; a plain-text message for an unknown account", body = String),
        (status = 400, description = "Malformed account number", body = String, content_type = "text/plain"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn deposit_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DepositInput>,
) -> Result<OutcomeResponse<String>, AppError> {
    validated(&payload)?;
    let outcome = evaluate_deposit(
        state.accounts.as_ref(),
        state.transactions.as_ref(),
        &payload,
    )
    .await?;
    log_outcome("deposit", &outcome);
    Ok(translate(outcome, &Fallbacks::DEPOSIT))
}

/// Transaction history for an account, newest first
#[utoipa::path(
    get,
    path = "/api/v1/accounts/{id}/transactions",
    tag = "transactions",
    params(
        ("id" = Uuid, Path, description = "Account ID"),
        HistoryParams
    ),
    responses(
        (status = 200, description = "Transaction records", body = Vec<TransactionRecord>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_transactions_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<TransactionRecord>>, AppError> {
    let limit = params.limit.clamp(1, 100);
    let records = state.db_client.list_transactions(id, limit).await?;
    Ok(Json(records))
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.health_check().await;
    Json(health)
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Application is not ready")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.health_check().await;
    match health.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type, message) = match &self {
            AppError::Database(db_err) => match db_err {
                DatabaseError::Connection(_) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "database_error",
                    self.to_string(),
                ),
                DatabaseError::NotFound(_) => {
                    (StatusCode::NOT_FOUND, "not_found", self.to_string())
                }
                DatabaseError::Duplicate(_) => {
                    (StatusCode::CONFLICT, "duplicate", self.to_string())
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    self.to_string(),
                ),
            },
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                self.to_string(),
            ),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                self.to_string(),
            ),
        };

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        let fields = match self {
            AppError::Validation(ValidationError::Fields(fields)) => Some(fields),
            _ => None,
        };

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
                fields,
            },
        });

        (status, body).into_response()
    }
}
