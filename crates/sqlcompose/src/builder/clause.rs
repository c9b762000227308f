//! Small clause types shared by the builder and its rendered output.

use crate::value::Value;
use std::fmt;

/// Prefix of WHERE placeholders: `:param0`, `:param1`, ...
pub const PARAM_PREFIX: &str = "param";

/// Name of the single HAVING placeholder.
pub const HAVING_PARAM: &str = "havingParam";

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// JOIN flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinType {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
        }
    }
}

/// A value bound to a named placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// Placeholder name without the leading `:`.
    pub name: String,
    pub value: Value,
}

impl Binding {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The token as it appears in SQL text, e.g. `:param0`.
    pub fn placeholder(&self) -> String {
        format!(":{}", self.name)
    }
}

/// A rendered statement: SQL text plus its bindings in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub bindings: Vec<Binding>,
}

impl Statement {
    /// Values only, in binding order.
    pub fn values(&self) -> Vec<&Value> {
        self.bindings.iter().map(|b| &b.value).collect()
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}
