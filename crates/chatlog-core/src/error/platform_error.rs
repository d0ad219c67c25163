//! Platform errors - failures talking to the chat platform

use thiserror::Error;

/// Errors from the platform REST API and its adapters
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Platform request failed: {0}")]
    Transport(String),

    #[error("Platform returned {status} for {route}")]
    Status { status: u16, route: String },

    #[error("Failed to decode platform payload: {0}")]
    Decode(String),

    #[error("Attachment storage failed: {0}")]
    Storage(String),
}

impl PlatformError {
    /// HTTP status, if the platform answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The acting identity may not see the resource
    pub fn is_forbidden(&self) -> bool {
        self.status() == Some(403)
    }

    /// The resource does not exist (any more)
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
