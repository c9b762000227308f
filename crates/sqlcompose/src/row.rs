//! Result rows and typed row mapping.

use crate::error::{ComposeError, ComposeResult};
use crate::value::{FromValue, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One result row: ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. Used by executors while decoding a result row.
    pub fn push(&mut self, column: impl Into<String>, value: Value) {
        self.columns.push((column.into(), value));
    }

    /// Builder-style [`Row::push`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value.into());
        self
    }

    /// Value of the first column named `column`.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Typed access to a column.
    ///
    /// A missing column or a value of the wrong kind is a
    /// [`ComposeError::Decode`].
    pub fn try_get<T: FromValue>(&self, column: &str) -> ComposeResult<T> {
        let value = self
            .get(column)
            .ok_or_else(|| ComposeError::decode(column, "no such column"))?;
        T::from_value(value).map_err(|msg| ComposeError::decode(column, msg))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Trait for types that can be built from a result [`Row`].
///
/// # Example
/// ```ignore
/// struct Product { id: i64, name: String }
///
/// impl FromRow for Product {
///     fn from_row(row: &Row) -> ComposeResult<Self> {
///         Ok(Self { id: row.try_get("id")?, name: row.try_get("name")? })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> ComposeResult<Self>;
}

impl FromRow for Row {
    fn from_row(row: &Row) -> ComposeResult<Self> {
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> Row {
        Row::new()
            .with("id", 1)
            .with("name", "lamp")
            .with("amount", 9.5)
            .with("note", None::<String>)
    }

    #[test]
    fn try_get_reports_missing_and_mismatched_columns() {
        let row = product();
        assert_eq!(row.try_get::<i64>("id").unwrap(), 1);
        assert_eq!(row.try_get::<Option<String>>("note").unwrap(), None);

        let err = row.try_get::<i64>("missing").unwrap_err();
        assert!(matches!(err, ComposeError::Decode { ref column, .. } if column.as_str() == "missing"));

        let err = row.try_get::<i64>("name").unwrap_err();
        assert!(err.to_string().contains("expected integer, got text"));
    }

    #[test]
    fn serializes_as_ordered_object() {
        let json = serde_json::to_string(&product()).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"lamp","amount":9.5,"note":null}"#);
    }

    #[test]
    fn column_names_keep_order() {
        let names: Vec<_> = product().column_names().map(str::to_string).collect();
        assert_eq!(names, ["id", "name", "amount", "note"]);
    }
}
