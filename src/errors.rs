//! Centralized error handling.
//!
//! `AppError` is the error shared by the domain, store and service layers.
//! It deliberately knows nothing about HTTP: handlers classify it with
//! [`AppError::is_not_found`], [`AppError::duplicate_entity`] and
//! [`AppError::is_unauthorized`] and pick the status code themselves.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// The queried entity does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint was violated while inserting `entity`.
    #[error("duplicate {entity} entry")]
    DuplicateEntry {
        entity: String,
        #[source]
        source: DbErr,
    },

    /// Credentials did not match.
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    /// Any other store failure. Opaque to callers.
    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("internal error: {0}")]
    Internal(String),

    /// Call-site context wrapped around another error.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// The innermost error beneath any context layers.
    pub fn root(&self) -> &AppError {
        let mut current = self;
        while let AppError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self.root(), AppError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.root(), AppError::Unauthorized)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self.root(), AppError::Validation(_))
    }

    /// Entity name of a duplicate-entry error, if this is one.
    pub fn duplicate_entity(&self) -> Option<&str> {
        match self.root() {
            AppError::DuplicateEntry { entity, .. } => Some(entity),
            _ => None,
        }
    }

    /// Wrap in a context layer.
    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify a failed insert: unique violations become `DuplicateEntry`.
    pub fn from_insert(err: DbErr, entity: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateEntry {
                entity: entity.to_string(),
                source: err,
            },
            _ => AppError::Database(err),
        }
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Extension trait adding call-site context to results.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> AppResult<T>;

    fn with_context<C, F>(self, f: F) -> AppResult<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<AppError>,
{
    fn context(self, context: impl Into<String>) -> AppResult<T> {
        self.map_err(|e| AppError::context(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> AppResult<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| AppError::context(e.into(), f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_sees_through_context() {
        let err = AppError::NotFound
            .context("CustomerStore.find_card(id=42)")
            .context("CustomerService.get_card");

        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert_eq!(err.duplicate_entity(), None);
    }

    #[test]
    fn test_duplicate_entity_through_context() {
        let err = AppError::DuplicateEntry {
            entity: "card".to_string(),
            source: DbErr::Custom("unique".to_string()),
        }
        .context("create card");

        assert_eq!(err.duplicate_entity(), Some("card"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_context_display_keeps_chain() {
        let err = AppError::Unauthorized.context("login(username=alice)");
        assert_eq!(err.to_string(), "login(username=alice): unauthorized");
    }

    #[test]
    fn test_result_ext_wraps_db_errors() {
        let result: Result<(), DbErr> = Err(DbErr::Custom("boom".to_string()));
        let err = result.context("ping").unwrap_err();

        assert!(matches!(err.root(), AppError::Database(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_from_insert_keeps_other_errors_opaque() {
        let err = AppError::from_insert(DbErr::Custom("connection reset".to_string()), "user");
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.duplicate_entity(), None);
    }

    #[test]
    fn test_ok_or_not_found() {
        let missing: Option<u8> = None;
        assert!(missing.ok_or_not_found().unwrap_err().is_not_found());
        assert_eq!(Some(3).ok_or_not_found().unwrap(), 3);
    }
}
