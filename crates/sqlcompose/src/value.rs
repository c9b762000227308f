//! Scalar values bound to placeholders and returned in rows.

use bytes::BytesMut;
use serde::Serialize;
use std::error::Error;
use std::fmt;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A scalar value supported by the backend.
///
/// Predicate values are converted into this closed set at the call site
/// (`.filter("status", "=", 1)`), so the builder never holds an open
/// dynamic type. Type checking against the target column happens when the
/// value is bound.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Bool(_) => "boolean",
            Value::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Null => f.write_str("NULL"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(i64::from(v))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

fn is_text_type(ty: &Type) -> bool {
    *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
        || *ty == Type::UNKNOWN
}

fn is_integer_type(ty: &Type) -> bool {
    *ty == Type::INT8 || *ty == Type::INT4 || *ty == Type::INT2
}

fn is_float_type(ty: &Type) -> bool {
    *ty == Type::FLOAT8 || *ty == Type::FLOAT4
}

fn is_numeric_type(ty: &Type) -> bool {
    cfg!(feature = "rust_decimal") && *ty == Type::NUMERIC
}

fn mismatch(value: &Value, ty: &Type) -> Box<dyn Error + Sync + Send> {
    format!("cannot bind {} value to a parameter of type {}", value.kind(), ty).into()
}

impl Value {
    /// Whether this value can be encoded directly for a parameter of type `ty`.
    ///
    /// Range checks (an `Int` too large for INT2, say) are not considered.
    pub(crate) fn binds_as(&self, ty: &Type) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(_) => *ty == Type::BOOL,
            Value::Text(_) => is_text_type(ty),
            Value::Int(_) => is_integer_type(ty) || is_float_type(ty) || is_numeric_type(ty),
            Value::Float(_) => is_float_type(ty) || is_numeric_type(ty),
        }
    }

    /// PostgreSQL type this value is sent as when the server has to convert it.
    pub(crate) fn wire_type(&self) -> Option<Type> {
        match self {
            Value::Text(_) => Some(Type::TEXT),
            Value::Int(_) => Some(Type::INT8),
            Value::Float(_) => Some(Type::FLOAT8),
            Value::Bool(_) => Some(Type::BOOL),
            Value::Null => None,
        }
    }
}

impl ToSql for Value {
    /// Integers bound to FLOAT4/FLOAT8 go through `as` and lose precision
    /// above 2^24 and 2^53 respectively.
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        if !self.binds_as(ty) {
            return Err(mismatch(self, ty));
        }
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Bool(b) => b.to_sql(ty, out),
            Value::Text(s) => s.as_str().to_sql(ty, out),
            Value::Int(i) if *ty == Type::INT8 => i.to_sql(ty, out),
            Value::Int(i) if *ty == Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
            Value::Int(i) if *ty == Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
            Value::Int(i) if *ty == Type::FLOAT8 => (*i as f64).to_sql(ty, out),
            Value::Int(i) if *ty == Type::FLOAT4 => (*i as f32).to_sql(ty, out),
            Value::Float(v) if *ty == Type::FLOAT8 => v.to_sql(ty, out),
            Value::Float(v) if *ty == Type::FLOAT4 => (*v as f32).to_sql(ty, out),
            other => numeric_to_sql(other, ty, out),
        }
    }

    // Every parameter type is accepted here so that `Null` can bind anywhere;
    // variant/type compatibility is checked in `to_sql`.
    fn accepts(_ty: &Type) -> bool {
        true
    }

    to_sql_checked!();
}

#[cfg(feature = "rust_decimal")]
fn numeric_to_sql(
    value: &Value,
    ty: &Type,
    out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    use rust_decimal::Decimal;

    let decimal = match value {
        Value::Int(i) => Decimal::from(*i),
        Value::Float(v) => Decimal::try_from(*v)?,
        other => return Err(mismatch(other, ty)),
    };
    decimal.to_sql(ty, out)
}

#[cfg(not(feature = "rust_decimal"))]
fn numeric_to_sql(
    value: &Value,
    ty: &Type,
    _out: &mut BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    Err(mismatch(value, ty))
}

/// Conversion out of a [`Value`], used by [`Row::try_get`](crate::Row::try_get).
pub trait FromValue: Sized {
    /// Convert `value`, or return a message describing the mismatch.
    fn from_value(value: &Value) -> Result<Self, String>;
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Result<Self, String> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_i64()
            .ok_or_else(|| format!("expected integer, got {}", value.kind()))
    }
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Result<Self, String> {
        let v = i64::from_value(value)?;
        i32::try_from(v).map_err(|_| format!("integer {v} out of range for i32"))
    }
}

impl FromValue for f64 {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_f64()
            .ok_or_else(|| format!("expected float, got {}", value.kind()))
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_bool()
            .ok_or_else(|| format!("expected boolean, got {}", value.kind()))
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Result<Self, String> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("expected text, got {}", value.kind()))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_closed_variant() {
        assert_eq!(Value::from(1), Value::Int(1));
        assert_eq!(Value::from(2u32), Value::Int(2));
        assert_eq!(Value::from(0.5f64), Value::Float(0.5));
        assert_eq!(Value::from("active"), Value::Text("active".into()));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(None::<i32>), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn binds_integers_to_narrower_columns() {
        let mut out = BytesMut::new();
        let res = Value::Int(7).to_sql_checked(&Type::INT4, &mut out);
        assert!(matches!(res, Ok(IsNull::No)));
        assert_eq!(&out[..], &7i32.to_be_bytes());
    }

    #[test]
    fn rejects_out_of_range_integers() {
        let mut out = BytesMut::new();
        let res = Value::Int(i64::from(i16::MAX) + 1).to_sql_checked(&Type::INT2, &mut out);
        assert!(res.is_err());
    }

    #[test]
    fn rejects_mismatched_types() {
        let mut out = BytesMut::new();
        let Err(err) = Value::Text("abc".into()).to_sql_checked(&Type::INT8, &mut out) else {
            panic!("text must not bind to int8");
        };
        assert!(err.to_string().contains("cannot bind text value"));
    }

    #[test]
    fn binds_integers_to_float_columns() {
        let mut out = BytesMut::new();
        let res = Value::Int(3).to_sql_checked(&Type::FLOAT4, &mut out);
        assert!(matches!(res, Ok(IsNull::No)));
        assert_eq!(&out[..], &3f32.to_be_bytes());

        // f64 has a 53-bit mantissa
        let mut out = BytesMut::new();
        let res = Value::Int((1 << 53) + 1).to_sql_checked(&Type::FLOAT8, &mut out);
        assert!(matches!(res, Ok(IsNull::No)));
        assert_eq!(&out[..], &9_007_199_254_740_992f64.to_be_bytes());
    }

    #[cfg(feature = "rust_decimal")]
    #[test]
    fn binds_numbers_to_numeric_columns() {
        let mut out = BytesMut::new();
        assert!(matches!(
            Value::Int(0).to_sql_checked(&Type::NUMERIC, &mut out),
            Ok(IsNull::No)
        ));

        let mut out = BytesMut::new();
        assert!(matches!(
            Value::Float(12.5).to_sql_checked(&Type::NUMERIC, &mut out),
            Ok(IsNull::No)
        ));

        let mut out = BytesMut::new();
        assert!(Value::Float(f64::NAN).to_sql_checked(&Type::NUMERIC, &mut out).is_err());
        assert!(Value::Int(1).binds_as(&Type::NUMERIC));
    }

    #[test]
    fn text_needs_server_conversion_for_dates() {
        let date = Value::Text("2024-01-01".into());
        let mut out = BytesMut::new();
        assert!(date.to_sql_checked(&Type::DATE, &mut out).is_err());
        assert!(!date.binds_as(&Type::DATE));
        assert_eq!(date.wire_type(), Some(Type::TEXT));

        assert!(Value::Null.binds_as(&Type::DATE));
        assert_eq!(Value::Null.wire_type(), None);
    }

    #[test]
    fn null_binds_to_any_type() {
        let mut out = BytesMut::new();
        let res = Value::Null.to_sql_checked(&Type::TIMESTAMPTZ, &mut out);
        assert!(matches!(res, Ok(IsNull::Yes)));
        assert!(out.is_empty());
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(1),
            Value::Text("a".into()),
            Value::Null,
            Value::Bool(false),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"a",null,false]"#);
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!(Value::Text("O'Brien".into()).to_string(), "'O''Brien'");
        assert_eq!(Value::Null.to_string(), "NULL");
    }

    #[test]
    fn from_value_handles_options() {
        assert_eq!(Option::<i64>::from_value(&Value::Null), Ok(None));
        assert_eq!(Option::<i64>::from_value(&Value::Int(3)), Ok(Some(3)));
        assert!(i64::from_value(&Value::Text("3".into())).is_err());
        assert!(i32::from_value(&Value::Int(i64::MAX)).is_err());
    }
}
