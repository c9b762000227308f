//! Error types for sqlcompose

use thiserror::Error;

/// Result type alias for sqlcompose operations
pub type ComposeResult<T> = Result<T, ComposeError>;

/// Errors surfaced by [`QueryBuilder`](crate::QueryBuilder) and the row helpers.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// The builder was rendered before a target table was set.
    #[error("Configuration error: no table set, call `table()` before rendering")]
    MissingTable,

    /// Anything the execution collaborator reported, passed through unmodified.
    #[error(transparent)]
    Statement(#[from] StatementError),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Database connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Pool error
    #[cfg(feature = "pool")]
    #[error("Pool error: {0}")]
    Pool(String),
}

impl ComposeError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a missing-table configuration error
    pub fn is_missing_table(&self) -> bool {
        matches!(self, Self::MissingTable)
    }

    /// Get the collaborator error, if this is one.
    pub fn as_statement_error(&self) -> Option<&StatementError> {
        match self {
            Self::Statement(err) => Some(err),
            _ => None,
        }
    }
}

/// The single failure kind of the execution collaborator.
///
/// Preparing, binding and running a statement all report through this type.
#[derive(Debug, Error)]
pub enum StatementError {
    /// Error reported by the database server or driver
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A value was bound to a placeholder the statement does not contain
    #[error("Unknown placeholder ':{0}'")]
    UnknownPlaceholder(String),

    /// A placeholder in the statement never received a value
    #[error("Placeholder ':{0}' has no bound value")]
    Unbound(String),

    /// A result column could not be converted into a [`Value`](crate::Value)
    #[error("Cannot decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Other collaborator errors
    #[error("{0}")]
    Other(String),
}

impl StatementError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// SQLSTATE code reported by the server, if any.
    pub fn sqlstate(&self) -> Option<&str> {
        match self {
            Self::Database(err) => err.code().map(|code| code.code()),
            _ => None,
        }
    }
}

#[cfg(feature = "pool")]
impl From<deadpool_postgres::PoolError> for ComposeError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        Self::Pool(err.to_string())
    }
}
