//! # sqlcompose
//!
//! A fluent SELECT composer that keeps values out of the SQL text.
//!
//! ## Features
//!
//! - **Fixed clause order**: SELECT, FROM, JOIN, WHERE, GROUP BY, HAVING, ORDER BY, LIMIT
//! - **Named placeholders**: values bind to `:param0, :param1, ...` and `:havingParam`
//! - **Grouped predicates**: `filter_group` adds a parenthesized AND group with
//!   placeholders numbered across the whole statement
//! - **Pluggable execution**: any [`StatementExecutor`] can run a builder;
//!   [`PgExecutor`] does it over tokio-postgres
//!
//! ## Example
//!
//! ```ignore
//! use sqlcompose::{PgExecutor, raw, table};
//!
//! let executor = PgExecutor::new(&client);
//!
//! let rows = table("product")
//!     .eq("status", 1)
//!     .filter_group(|g| {
//!         g.gt("quantity", 0).gt("amount", 0);
//!     })
//!     .sum(raw("quantity * amount"))
//!     .execute(&executor)
//!     .await?;
//! ```

pub mod builder;
pub mod error;
pub mod executor;
pub mod pg_executor;
pub mod prelude;
pub mod raw;
pub mod row;
pub mod value;

pub use builder::{
    Binding, ConditionGroup, Direction, HAVING_PARAM, JoinType, PARAM_PREFIX, QueryBuilder,
    Statement, table,
};
pub use error::{ComposeError, ComposeResult, StatementError};
pub use executor::{PreparedStatement, StatementExecutor};
pub use pg_executor::{ExecutorConfig, PgExecutor, PgStatement};
pub use raw::{RawSql, raw};
pub use row::{FromRow, Row};
pub use value::{FromValue, Value};

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{create_pool, create_pool_with_config};
