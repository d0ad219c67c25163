//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Missing Required Entities
    // =========================================================================
    #[error("Missing {entity} for message {message_id}")]
    MissingEntity {
        entity: &'static str,
        message_id: Snowflake,
    },

    #[error("Thread {thread_id} belongs to channel {found}, not {expected}")]
    ThreadParentMismatch {
        thread_id: Snowflake,
        expected: Snowflake,
        found: Snowflake,
    },

    // =========================================================================
    // Stored Data
    // =========================================================================
    #[error("Corrupt row in {table}: {reason}")]
    CorruptRow { table: &'static str, reason: String },

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingEntity { .. } => "MISSING_ENTITY",
            Self::ThreadParentMismatch { .. } => "THREAD_PARENT_MISMATCH",
            Self::CorruptRow { .. } => "CORRUPT_ROW",
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if the event itself lacked a required entity
    pub fn is_missing_entity(&self) -> bool {
        matches!(
            self,
            Self::MissingEntity { .. } | Self::ThreadParentMismatch { .. }
        )
    }

    /// Check if this came from the store rather than the observed data
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            Self::CorruptRow { .. } | Self::DatabaseError(_) | Self::InternalError(_)
        )
    }
}
