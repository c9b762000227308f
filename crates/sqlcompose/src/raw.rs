//! Trusted SQL fragments.

use std::fmt;

/// A SQL fragment inlined verbatim into the rendered statement.
///
/// Nothing wrapped in `RawSql` is parameterized or escaped. Use it for
/// computed expressions such as `quantity * amount`; never for user input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawSql(String);

impl RawSql {
    pub fn new(expression: impl Into<String>) -> Self {
        Self(expression.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Mark `expression` as a trusted SQL fragment.
///
/// This is an identity on the text: it exists so call sites make visible
/// which strings bypass parameterization.
///
/// # Example
/// ```ignore
/// let qb = sqlcompose::table("product").sum(sqlcompose::raw("quantity * amount"));
/// ```
pub fn raw(expression: impl Into<String>) -> RawSql {
    RawSql::new(expression)
}

impl fmt::Display for RawSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RawSql {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RawSql {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RawSql {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<RawSql> for String {
    fn from(raw: RawSql) -> Self {
        raw.0
    }
}
