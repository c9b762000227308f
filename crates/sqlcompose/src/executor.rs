//! The execution collaborator contract.
//!
//! The builder only needs three capabilities from a backend: turn SQL text
//! into a statement, bind a named placeholder, and run the statement. Every
//! failure along the way is a [`StatementError`].

use crate::error::StatementError;
use crate::row::Row;
use crate::value::Value;
use std::future::Future;

/// A backend that can prepare SQL text into a [`PreparedStatement`].
///
/// Implemented by [`PgExecutor`](crate::PgExecutor) for tokio-postgres; tests
/// implement it with in-memory fakes.
pub trait StatementExecutor: Send + Sync {
    /// Statement handle produced by [`StatementExecutor::prepare`].
    type Statement<'a>: PreparedStatement + 'a
    where
        Self: 'a;

    /// Prepare `sql`, which uses `:name` placeholders.
    fn prepare<'a>(
        &'a self,
        sql: &'a str,
    ) -> impl Future<Output = Result<Self::Statement<'a>, StatementError>> + Send + 'a;
}

/// A prepared statement awaiting bindings.
///
/// The handle owns whatever backend resources it holds and releases them on
/// drop, so a statement abandoned after a failed `bind` is cleaned up the
/// same way as one that ran to completion.
pub trait PreparedStatement: Send + Sized {
    /// Bind `value` to the placeholder `name` (without the leading `:`).
    fn bind(&mut self, name: &str, value: &Value) -> Result<(), StatementError>;

    /// Run the statement and collect every result row.
    fn execute(self) -> impl Future<Output = Result<Vec<Row>, StatementError>> + Send;
}
