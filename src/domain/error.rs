//! Error types for infrastructure and request-shape failures.
//!
//! Business outcomes (invalid input, empty results, insufficient funds) are
//! never errors; they are modeled by [`crate::domain::Outcome`]. The types
//! here cover failures the pipelines cannot resolve into an outcome.

use std::collections::BTreeMap;

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised by an account store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate record: {0}")]
    Duplicate(String),

    #[error("Migration failed: {0}")]
    Migration(String),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => Self::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                Self::Connection(err.to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::Duplicate(db_err.message().to_string())
            }
            _ => Self::Query(err.to_string()),
        }
    }
}

/// Field-level request validation failures
#[derive(Debug, Error)]
pub enum ValidationError {
    /// One message per offending field, as reported by `validator`
    #[error("Request failed field validation")]
    Fields(BTreeMap<String, String>),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = BTreeMap::new();
        collect_field_errors(&errors, None, &mut fields);
        Self::Fields(fields)
    }
}

fn collect_field_errors(
    errors: &validator::ValidationErrors,
    prefix: Option<&str>,
    out: &mut BTreeMap<String, String>,
) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}.{field}"),
            None => field.to_string(),
        };
        match kind {
            validator::ValidationErrorsKind::Field(field_errors) => {
                if let Some(first) = field_errors.first() {
                    let message = first
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| first.code.to_string());
                    out.insert(path, message);
                }
            }
            validator::ValidationErrorsKind::Struct(nested) => {
                collect_field_errors(nested, Some(&path), out);
            }
            validator::ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_field_errors(nested, Some(&format!("{path}[{index}]")), out);
                }
            }
        }
    }
}

/// Startup configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 1, message = "Name is required"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_collect_field_messages() {
        let errors = Signup {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        let ValidationError::Fields(fields) = ValidationError::from(errors);
        assert_eq!(fields.get("name").map(String::as_str), Some("Name is required"));
    }

    #[test]
    fn test_app_error_display_wraps_inner() {
        let err = AppError::from(DatabaseError::Connection("refused".to_string()));
        assert_eq!(err.to_string(), "Database error: Connection failed: refused");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = DatabaseError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DatabaseError::NotFound(_)));
    }
}
