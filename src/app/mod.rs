//! Application layer containing business logic and shared state.

pub mod pipelines;
pub mod service;
pub mod state;

pub use service::{LedgerAccountService, LedgerTransactionService};
pub use state::AppState;
