//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Per-item errors (recovered locally, aggregated into reports) =====
    #[error("Path already cataloged: {0}")]
    DuplicatePath(String),

    #[error("Cannot decode {path}: {reason}")]
    DecodeFailure { path: String, reason: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ===== Connection-level errors (surfaced immediately) =====
    #[error("No catalog is open")]
    StoreUnavailable,

    #[error("Cannot open catalog: {0}")]
    BadLocator(String),

    #[error("Catalog store error: {0}")]
    Store(String),

    #[error("System resource exhaustion: {0}")]
    SystemResource(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::DuplicatePath(_)
                | AppError::DecodeFailure { .. }
                | AppError::NotFound(_)
                | AppError::Io(_)
        )
    }

    /// Is this a connection-level failure?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::DuplicatePath(path) => format!("Already in catalog: {}", path),
            AppError::DecodeFailure { path, .. } => format!("Cannot load {}", path),
            AppError::StoreUnavailable => "Open or create a database first".to_string(),
            AppError::BadLocator(msg) => format!("Cannot open database: {}", msg),
            _ => self.to_string(),
        }
    }

    pub(crate) fn decode(path: impl Into<String>, reason: impl ToString) -> Self {
        AppError::DecodeFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<app_db::DbError> for AppError {
    fn from(e: app_db::DbError) -> Self {
        match e {
            app_db::DbError::NotFound(msg) => AppError::NotFound(msg),
            app_db::DbError::Locator(msg) => AppError::BadLocator(msg),
            app_db::DbError::Schema(msg) => AppError::BadLocator(msg),
            app_db::DbError::Io(e) => AppError::Io(e),
            other => AppError::Store(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_split() {
        assert!(AppError::DuplicatePath("/a.png".into()).is_recoverable());
        assert!(AppError::decode("/a.png", "bad header").is_recoverable());
        assert!(AppError::StoreUnavailable.is_fatal());
        assert!(AppError::BadLocator("x".into()).is_fatal());
    }

    #[test]
    fn test_db_error_mapping() {
        let err: AppError = app_db::DbError::Locator("gone.db".into()).into();
        assert!(matches!(err, AppError::BadLocator(_)));

        let err: AppError = app_db::DbError::Pool("timeout".into()).into();
        assert!(matches!(err, AppError::Store(_)));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            AppError::StoreUnavailable.user_message(),
            "Open or create a database first"
        );
        assert_eq!(
            AppError::decode("/x.gif", "eof").to_string(),
            "Cannot decode /x.gif: eof"
        );
    }
}
