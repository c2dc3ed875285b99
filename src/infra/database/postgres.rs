//! PostgreSQL database client implementation.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::{
    Account, AppError, BalanceAction, DatabaseClient, DatabaseError, TransactionRecord,
};

const ACCOUNT_COLUMNS: &str = "id, sort_code, account_number, bank_name, owner_name, \
                               current_balance, created_at, updated_at";

/// PostgreSQL connection pool configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// PostgreSQL database client with connection pooling
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new PostgreSQL client with custom configuration
    pub async fn new(database_url: &str, config: PostgresConfig) -> Result<Self, AppError> {
        info!("Connecting to PostgreSQL...");
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.acquire_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Run database migrations using sqlx migrate
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Migration(e.to_string())))?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    fn row_to_account(row: &sqlx::postgres::PgRow) -> Account {
        Account {
            id: row.get("id"),
            sort_code: row.get("sort_code"),
            account_number: row.get("account_number"),
            bank_name: row.get("bank_name"),
            owner_name: row.get("owner_name"),
            current_balance: row.get("current_balance"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_transaction(row: &sqlx::postgres::PgRow) -> TransactionRecord {
        TransactionRecord {
            id: row.get("id"),
            source_account_id: row.get("source_account_id"),
            target_account_id: row.get("target_account_id"),
            target_owner_name: row.get("target_owner_name"),
            amount: row.get("amount"),
            initiation_date: row.get("initiation_date"),
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))
    }

    async fn insert_record(
        tx: &mut Transaction<'static, Postgres>,
        record: &TransactionRecord,
    ) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, source_account_id, target_account_id, target_owner_name,
                amount, initiation_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(record.id)
        .bind(record.source_account_id)
        .bind(record.target_account_id)
        .bind(&record.target_owner_name)
        .bind(record.amount)
        .bind(record.initiation_date)
        .execute(&mut **tx)
        .await
        .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
        Ok(())
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Connection(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_account(
        &self,
        sort_code: &str,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE sort_code = $1 AND account_number = $2"
        ))
        .bind(sort_code)
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    #[instrument(skip(self))]
    async fn find_account_by_number(
        &self,
        account_number: &str,
    ) -> Result<Option<Account>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_number = $1 \
             ORDER BY created_at ASC LIMIT 1"
        ))
        .bind(account_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    #[instrument(skip(self, account), fields(sort_code = %account.sort_code, account_number = %account.account_number))]
    async fn insert_account(&self, account: &Account) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, sort_code, account_number, bank_name, owner_name,
                current_balance, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.id)
        .bind(&account.sort_code)
        .bind(&account.account_number)
        .bind(&account.bank_name)
        .bind(&account.owner_name)
        .bind(account.current_balance)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::from(e)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn apply_balance_change(
        &self,
        account_id: Uuid,
        amount: Decimal,
        action: BalanceAction,
    ) -> Result<Option<Account>, AppError> {
        let mut tx = self.begin().await?;

        let current: Decimal =
            sqlx::query("SELECT current_balance FROM accounts WHERE id = $1 FOR UPDATE")
                .bind(account_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?
                .map(|row| row.get("current_balance"))
                .ok_or_else(|| DatabaseError::NotFound(account_id.to_string()))?;

        let Some(next) = action.apply(current, amount) else {
            tx.rollback()
                .await
                .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
            return Ok(None);
        };

        let row = sqlx::query(&format!(
            "UPDATE accounts SET current_balance = $1, updated_at = $2 WHERE id = $3 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(next)
        .bind(Utc::now())
        .bind(account_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;
        let updated = Self::row_to_account(&row);

        let record = match action {
            BalanceAction::Withdraw => TransactionRecord::new(Some(&updated), None, amount),
            BalanceAction::Deposit => TransactionRecord::new(None, Some(&updated), amount),
        };
        Self::insert_record(&mut tx, &record).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
        Ok(Some(updated))
    }

    #[instrument(skip(self))]
    async fn transfer_funds(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        amount: Decimal,
    ) -> Result<bool, AppError> {
        let mut tx = self.begin().await?;

        // Lock in id order so concurrent opposite transfers cannot deadlock
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ANY($1) ORDER BY id FOR UPDATE"
        ))
        .bind(vec![source_id, target_id])
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;
        let accounts: Vec<Account> = rows.iter().map(Self::row_to_account).collect();

        let source = accounts
            .iter()
            .find(|a| a.id == source_id)
            .ok_or_else(|| DatabaseError::NotFound(source_id.to_string()))?;
        let target = accounts
            .iter()
            .find(|a| a.id == target_id)
            .ok_or_else(|| DatabaseError::NotFound(target_id.to_string()))?;

        if source.current_balance < amount {
            tx.rollback()
                .await
                .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
            return Ok(false);
        }

        let now = Utc::now();
        for (id, delta) in [(source_id, -amount), (target_id, amount)] {
            sqlx::query(
                "UPDATE accounts SET current_balance = current_balance + $1, updated_at = $2 \
                 WHERE id = $3",
            )
            .bind(delta)
            .bind(now)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;
        }

        Self::insert_record(&mut tx, &TransactionRecord::new(Some(source), Some(target), amount))
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(DatabaseError::from(e)))?;
        Ok(true)
    }

    #[instrument(skip(self))]
    async fn list_transactions(
        &self,
        account_id: Uuid,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>, AppError> {
        let rows = sqlx::query(
            r#"
            SELECT id, source_account_id, target_account_id, target_owner_name,
                   amount, initiation_date
            FROM transactions
            WHERE source_account_id = $1 OR target_account_id = $1
            ORDER BY initiation_date DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(account_id)
        .bind(limit.clamp(1, 100))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(DatabaseError::Query(e.to_string())))?;

        Ok(rows.iter().map(Self::row_to_transaction).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(3));
        assert_eq!(config.idle_timeout, Duration::from_secs(600));
        assert_eq!(config.max_lifetime, Duration::from_secs(1800));
    }

    #[test]
    fn test_account_columns_cover_entity_fields() {
        for column in [
            "id",
            "sort_code",
            "account_number",
            "bank_name",
            "owner_name",
            "current_balance",
            "created_at",
            "updated_at",
        ] {
            assert!(ACCOUNT_COLUMNS.contains(column), "missing {column}");
        }
    }
}
