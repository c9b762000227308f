//! tokio-postgres implementation of the execution contract.
//!
//! PostgreSQL only understands positional `$n` parameters, so the named
//! placeholders produced by the builder are rewritten before the statement is
//! prepared on the server. Bindings are then routed to their `$n` slot by name.
//!
//! ```ignore
//! let executor = sqlcompose::PgExecutor::new(&client);
//! let rows = sqlcompose::table("product")
//!     .select(["id", "name"])
//!     .eq("status", 1)
//!     .execute(&executor)
//!     .await?;
//! ```

mod config;
mod placeholder;

pub use config::ExecutorConfig;

use crate::error::StatementError;
use crate::executor::{PreparedStatement, StatementExecutor};
use crate::row::Row;
use crate::value::Value;
use placeholder::{Cast, to_positional, to_positional_with_casts};
use std::future::Future;
use tokio_postgres::GenericClient;
use tokio_postgres::types::{FromSql, ToSql, Type};

/// [`StatementExecutor`] over a tokio-postgres client or transaction.
pub struct PgExecutor<'c, C> {
    client: &'c C,
    config: ExecutorConfig,
}

impl<'c, C> PgExecutor<'c, C>
where
    C: GenericClient + Sync,
{
    pub fn new(client: &'c C) -> Self {
        Self::with_config(client, ExecutorConfig::default())
    }

    pub fn with_config(client: &'c C, config: ExecutorConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl<C> StatementExecutor for PgExecutor<'_, C>
where
    C: GenericClient + Sync,
{
    type Statement<'a>
        = PgStatement<'a, C>
    where
        Self: 'a;

    fn prepare<'a>(
        &'a self,
        sql: &'a str,
    ) -> impl Future<Output = Result<Self::Statement<'a>, StatementError>> + Send + 'a {
        async move {
            let positional = to_positional(sql);
            self.config
                .log_prepare(sql, &positional.sql, positional.names.len(), false);

            let statement = self.client.prepare(&positional.sql).await?;
            let slots = vec![None; positional.names.len()];
            Ok(PgStatement {
                client: self.client,
                config: &self.config,
                named_sql: sql,
                statement,
                names: positional.names,
                slots,
            })
        }
    }
}

/// A server-side prepared statement with its pending bindings.
///
/// Parameter types are inferred by the server at prepare time. A bound value
/// that cannot be encoded for its inferred type (text against a `date`
/// column, for instance) makes [`execute`](PreparedStatement::execute)
/// prepare the statement again with an explicit conversion for that
/// placeholder, leaving the conversion to PostgreSQL.
pub struct PgStatement<'a, C> {
    client: &'a C,
    config: &'a ExecutorConfig,
    named_sql: &'a str,
    statement: tokio_postgres::Statement,
    names: Vec<String>,
    slots: Vec<Option<Value>>,
}

impl<C> PgStatement<'_, C> {
    /// Placeholder names in `$n` order.
    pub fn placeholder_names(&self) -> &[String] {
        &self.names
    }

    /// Server-side conversions needed for the current bindings, by slot.
    fn casts(&self) -> Vec<Option<Cast>> {
        self.statement
            .params()
            .iter()
            .zip(&self.slots)
            .map(|(ty, slot)| slot.as_ref().and_then(|value| cast_for(value, ty)))
            .collect()
    }
}

impl<C> PreparedStatement for PgStatement<'_, C>
where
    C: GenericClient + Sync,
{
    fn bind(&mut self, name: &str, value: &Value) -> Result<(), StatementError> {
        let slot = self
            .names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| StatementError::UnknownPlaceholder(name.to_string()))?;
        self.slots[slot] = Some(value.clone());
        Ok(())
    }

    fn execute(self) -> impl Future<Output = Result<Vec<Row>, StatementError>> + Send {
        async move {
            if let Some(i) = self.slots.iter().position(Option::is_none) {
                return Err(StatementError::Unbound(self.names[i].clone()));
            }

            let casts = self.casts();
            let statement = if casts.iter().any(Option::is_some) {
                let positional = to_positional_with_casts(self.named_sql, &casts);
                self.config
                    .log_prepare(self.named_sql, &positional.sql, positional.names.len(), true);
                self.client.prepare(&positional.sql).await?
            } else {
                self.statement
            };

            let params: Vec<&(dyn ToSql + Sync)> = self
                .slots
                .iter()
                .flatten()
                .map(|v| v as &(dyn ToSql + Sync))
                .collect();

            let rows = self.client.query(&statement, &params).await?;
            rows.iter().map(decode_row).collect()
        }
    }
}

/// `($k::wire)::inferred` for values the server has to convert.
fn cast_for(value: &Value, ty: &Type) -> Option<Cast> {
    if value.binds_as(ty) || *ty == Type::UNKNOWN {
        return None;
    }
    let wire = value.wire_type()?;
    Some(Cast {
        from: wire.name().to_string(),
        to: format!("\"{}\".\"{}\"", ty.schema(), ty.name()),
    })
}

fn decode_row(row: &tokio_postgres::Row) -> Result<Row, StatementError> {
    let mut out = Row::new();
    for (idx, column) in row.columns().iter().enumerate() {
        let value = decode_column(row, idx, column.type_())
            .map_err(|msg| StatementError::decode(column.name(), msg))?;
        out.push(column.name(), value);
    }
    Ok(out)
}

fn get<'r, T: FromSql<'r>>(row: &'r tokio_postgres::Row, idx: usize) -> Result<Option<T>, String> {
    row.try_get::<_, Option<T>>(idx).map_err(|e| e.to_string())
}

fn decode_column(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value, String> {
    let value = if *ty == Type::BOOL {
        get::<bool>(row, idx)?.map(Value::Bool)
    } else if *ty == Type::INT2 {
        get::<i16>(row, idx)?.map(Value::from)
    } else if *ty == Type::INT4 {
        get::<i32>(row, idx)?.map(Value::from)
    } else if *ty == Type::INT8 {
        get::<i64>(row, idx)?.map(Value::Int)
    } else if *ty == Type::FLOAT4 {
        get::<f32>(row, idx)?.map(Value::from)
    } else if *ty == Type::FLOAT8 {
        get::<f64>(row, idx)?.map(Value::Float)
    } else if *ty == Type::TEXT
        || *ty == Type::VARCHAR
        || *ty == Type::BPCHAR
        || *ty == Type::NAME
    {
        get::<String>(row, idx)?.map(Value::Text)
    } else {
        return decode_numeric(row, idx, ty);
    };
    Ok(value.unwrap_or(Value::Null))
}

// SUM over BIGINT/NUMERIC columns yields NUMERIC. Values that fit are
// returned as floats; anything else keeps its exact decimal text.
#[cfg(feature = "rust_decimal")]
fn decode_numeric(row: &tokio_postgres::Row, idx: usize, ty: &Type) -> Result<Value, String> {
    use rust_decimal::prelude::ToPrimitive;

    if *ty != Type::NUMERIC {
        return Err(unsupported(ty));
    }
    let value = get::<rust_decimal::Decimal>(row, idx)?
        .map(|d| d.to_f64().map_or_else(|| Value::Text(d.to_string()), Value::Float));
    Ok(value.unwrap_or(Value::Null))
}

#[cfg(not(feature = "rust_decimal"))]
fn decode_numeric(_row: &tokio_postgres::Row, _idx: usize, ty: &Type) -> Result<Value, String> {
    Err(unsupported(ty))
}

fn unsupported(ty: &Type) -> String {
    format!("unsupported column type {ty}; cast it to text, bigint, double precision or boolean")
}
