//! Fluent SELECT composition.
//!
//! Configuration calls accumulate fragments; [`QueryBuilder::to_sql`]
//! concatenates them in SQL grammar order:
//!
//! ```text
//! SELECT .. FROM .. [JOIN ..] [WHERE ..] [GROUP BY ..] [HAVING ..] [ORDER BY ..] [LIMIT ..]
//! ```
//!
//! Values never appear in the SQL text. WHERE values bind to `:param0`,
//! `:param1`, ... in call order (nested groups included); the HAVING value
//! binds to `:havingParam`.

mod clause;
mod group;
mod select;

pub use clause::{Binding, Direction, HAVING_PARAM, JoinType, PARAM_PREFIX, Statement};
pub use group::ConditionGroup;
pub use select::QueryBuilder;

/// Create a builder targeting `table`.
///
/// # Example
/// ```ignore
/// let qb = sqlcompose::table("product").eq("status", 1);
/// ```
pub fn table(name: &str) -> QueryBuilder {
    QueryBuilder::new().table(name)
}
