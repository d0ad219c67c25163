//! Error handling utilities for repositories

use chatlog_core::error::DomainError;
use chatlog_core::traits::WriteOutcome;
use sqlx::postgres::PgQueryResult;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Interpret the result of an `INSERT .. ON CONFLICT DO NOTHING`
pub fn insert_outcome(result: &PgQueryResult) -> WriteOutcome {
    if result.rows_affected() == 0 {
        WriteOutcome::Duplicate
    } else {
        WriteOutcome::Inserted
    }
}
