//! Convenient imports for typical `sqlcompose` usage.
//!
//! ```ignore
//! use sqlcompose::prelude::*;
//! ```

pub use crate::{
    ComposeError, ComposeResult, ConditionGroup, Direction, FromRow, JoinType, PgExecutor,
    QueryBuilder, Row, Value, raw, table,
};

#[cfg(feature = "pool")]
pub use crate::create_pool;
