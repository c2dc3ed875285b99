//! Application state management.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{
    AccountService, DatabaseClient, HealthResponse, HealthStatus, TransactionService,
};

use super::service::{LedgerAccountService, LedgerTransactionService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_client: Arc<dyn DatabaseClient>,
    pub accounts: Arc<dyn AccountService>,
    pub transactions: Arc<dyn TransactionService>,
}

impl AppState {
    /// Create state with ledger services over the given store
    #[must_use]
    pub fn new(db_client: Arc<dyn DatabaseClient>) -> Self {
        let accounts = Arc::new(LedgerAccountService::new(Arc::clone(&db_client)));
        let transactions = Arc::new(LedgerTransactionService::new(Arc::clone(&db_client)));
        Self::with_services(db_client, accounts, transactions)
    }

    /// Create state with explicit collaborators
    #[must_use]
    pub fn with_services(
        db_client: Arc<dyn DatabaseClient>,
        accounts: Arc<dyn AccountService>,
        transactions: Arc<dyn TransactionService>,
    ) -> Self {
        Self {
            db_client,
            accounts,
            transactions,
        }
    }

    /// Check the account store
    pub async fn health_check(&self) -> HealthResponse {
        let database = match self.db_client.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!(error = %e, "Account store health check failed");
                HealthStatus::Unhealthy
            }
        };
        HealthResponse::new(database)
    }
}
