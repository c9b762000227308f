//! SELECT statement builder.

use super::clause::{Binding, Direction, HAVING_PARAM, JoinType, Statement};
use super::group::ConditionGroup;
use crate::error::{ComposeError, ComposeResult, StatementError};
use crate::executor::{PreparedStatement, StatementExecutor};
use crate::raw::RawSql;
use crate::row::{FromRow, Row};
use crate::value::Value;

/// Single HAVING condition with its value.
#[derive(Clone, Debug)]
struct Having {
    condition: String,
    value: Value,
}

/// Fluent SELECT builder with named placeholders.
///
/// Configuration methods consume and return the builder. Rendering does not
/// consume it, so a builder can be rendered, extended and rendered again.
///
/// # Example
/// ```ignore
/// let sql = sqlcompose::table("product")
///     .select(["id", "name", "amount"])
///     .filter("status", "=", 1)
///     .order_by("amount")
///     .limit(10)
///     .to_sql()?;
///
/// assert_eq!(
///     sql,
///     "SELECT id, name, amount FROM product WHERE status = :param0 ORDER BY amount ASC LIMIT 10"
/// );
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct QueryBuilder {
    /// Target relation
    table: Option<String>,
    /// SELECT list (ignored when `aggregate` is set)
    projections: Vec<String>,
    /// WHERE predicates and their bindings
    conditions: ConditionGroup,
    /// Rendered JOIN clauses
    joins: Vec<String>,
    /// ORDER BY terms
    orderings: Vec<(String, Direction)>,
    /// LIMIT (0 means no limit)
    limit: Option<u64>,
    /// GROUP BY column
    group_by: Option<String>,
    /// HAVING condition
    having: Option<Having>,
    /// `SUM(...)` replacing the SELECT list
    aggregate: Option<String>,
    /// Label for execution logs
    tag: Option<String>,
}

impl QueryBuilder {
    /// Create an empty builder. A table must be set before rendering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target table. Not validated.
    pub fn table(mut self, name: &str) -> Self {
        self.table = Some(name.to_string());
        self
    }

    /// Replace the SELECT list.
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projections = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Associate a tag for execution logs.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    // ==================== WHERE ====================

    /// Add WHERE: `field operator :paramN`.
    ///
    /// `operator` is inserted verbatim.
    pub fn filter(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.conditions.filter(field, operator, value);
        self
    }

    /// Add WHERE: field = value
    pub fn eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, "=", value)
    }

    /// Add WHERE: field != value
    pub fn ne(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, "!=", value)
    }

    /// Add WHERE: field > value
    pub fn gt(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, ">", value)
    }

    /// Add WHERE: field >= value
    pub fn gte(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, ">=", value)
    }

    /// Add WHERE: field < value
    pub fn lt(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, "<", value)
    }

    /// Add WHERE: field <= value
    pub fn lte(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, "<=", value)
    }

    /// Add WHERE: field LIKE pattern
    pub fn like(self, field: &str, pattern: impl Into<Value>) -> Self {
        self.filter(field, "LIKE", pattern)
    }

    /// Add a parenthesized group of AND-joined predicates as one WHERE term.
    ///
    /// ```ignore
    /// let qb = sqlcompose::table("product")
    ///     .eq("status", 1)
    ///     .filter_group(|g| {
    ///         g.gt("quantity", 0).gt("amount", 0);
    ///     });
    /// // ... WHERE status = :param0 AND (quantity > :param1 AND amount > :param2)
    /// ```
    pub fn filter_group(mut self, build: impl FnOnce(&mut ConditionGroup)) -> Self {
        self.conditions.group(build);
        self
    }

    // ==================== JOIN ====================

    /// Add `INNER JOIN table ON left operator right`.
    pub fn join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join_with(JoinType::Inner, table, left, operator, right)
    }

    /// Add `LEFT JOIN table ON left operator right`.
    pub fn left_join(self, table: &str, left: &str, operator: &str, right: &str) -> Self {
        self.join_with(JoinType::Left, table, left, operator, right)
    }

    /// Add a JOIN of the given type. Nothing is validated.
    pub fn join_with(
        mut self,
        kind: JoinType,
        table: &str,
        left: &str,
        operator: &str,
        right: &str,
    ) -> Self {
        self.joins.push(format!(
            "{} {} ON {} {} {}",
            kind.as_sql(),
            table,
            left,
            operator,
            right
        ));
        self
    }

    // ==================== Ordering & Grouping ====================

    /// Add ORDER BY column ASC.
    pub fn order_by(self, column: &str) -> Self {
        self.order_by_with(column, Direction::Asc)
    }

    /// Add ORDER BY column DESC.
    pub fn order_by_desc(self, column: &str) -> Self {
        self.order_by_with(column, Direction::Desc)
    }

    /// Add an ORDER BY term. Terms accumulate in call order.
    pub fn order_by_with(mut self, column: &str, direction: Direction) -> Self {
        self.orderings.push((column.to_string(), direction));
        self
    }

    /// Set GROUP BY column (last call wins).
    pub fn group_by(mut self, column: &str) -> Self {
        self.group_by = Some(column.to_string());
        self
    }

    /// Set HAVING: `field operator :havingParam` (last call wins).
    pub fn having(mut self, field: &str, operator: &str, value: impl Into<Value>) -> Self {
        self.having = Some(Having {
            condition: format!("{field} {operator} :{HAVING_PARAM}"),
            value: value.into(),
        });
        self
    }

    /// Select `SUM(expression)` instead of the SELECT list.
    pub fn sum(mut self, expression: impl Into<RawSql>) -> Self {
        self.aggregate = Some(format!("SUM({})", expression.into()));
        self
    }

    // ==================== Pagination ====================

    /// Set LIMIT (last call wins). `limit(0)` renders no LIMIT clause.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    // ==================== Rendering ====================

    /// WHERE bindings in placeholder order, then the HAVING binding.
    pub fn bindings(&self) -> Vec<Binding> {
        let mut bindings = self.conditions.bindings().to_vec();
        if let Some(having) = &self.having {
            bindings.push(Binding::new(HAVING_PARAM, having.value.clone()));
        }
        bindings
    }

    /// Render the SQL text.
    ///
    /// Fails with [`ComposeError::MissingTable`] when no table is set. An
    /// empty SELECT list without an aggregate is not checked.
    pub fn to_sql(&self) -> ComposeResult<String> {
        let table = self.table.as_deref().ok_or(ComposeError::MissingTable)?;

        let select_list = match &self.aggregate {
            Some(aggregate) => aggregate.clone(),
            None => self.projections.join(", "),
        };

        let mut sql = format!("SELECT {select_list} FROM {table}");

        if !self.joins.is_empty() {
            sql.push(' ');
            sql.push_str(&self.joins.join(" "));
        }

        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.render());
        }

        if let Some(column) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(column);
        }

        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(&having.condition);
        }

        if !self.orderings.is_empty() {
            let terms: Vec<String> = self
                .orderings
                .iter()
                .map(|(column, direction)| format!("{} {}", column, direction.as_sql()))
                .collect();
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        if let Some(limit) = self.limit.filter(|n| *n > 0) {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(sql)
    }

    /// Render SQL text and bindings together.
    pub fn build(&self) -> ComposeResult<Statement> {
        Ok(Statement {
            sql: self.to_sql()?,
            bindings: self.bindings(),
        })
    }

    // ==================== Execution ====================

    /// Prepare, bind and run the statement, returning every row.
    ///
    /// Collaborator failures are returned as [`ComposeError::Statement`]
    /// without retry.
    pub async fn execute<E: StatementExecutor>(&self, executor: &E) -> ComposeResult<Vec<Row>> {
        let statement = self.build()?;
        let tag = self.tag.as_deref().unwrap_or("-");

        // SQL text is logged by the executor, with its own level and truncation.
        tracing::debug!(
            target: "sqlcompose.sql",
            tag,
            param_count = statement.bindings.len(),
            "executing statement"
        );

        match run(executor, &statement).await {
            Ok(rows) => {
                tracing::debug!(target: "sqlcompose.sql", tag, rows = rows.len(), "statement finished");
                Ok(rows)
            }
            Err(err) => {
                tracing::warn!(target: "sqlcompose.sql", tag, error = %err, "statement failed");
                Err(err.into())
            }
        }
    }

    /// Execute and map every row to `T`.
    pub async fn fetch_as<T: FromRow, E: StatementExecutor>(
        &self,
        executor: &E,
    ) -> ComposeResult<Vec<T>> {
        let rows = self.execute(executor).await?;
        rows.iter().map(T::from_row).collect()
    }
}

async fn run<E: StatementExecutor>(
    executor: &E,
    statement: &Statement,
) -> Result<Vec<Row>, StatementError> {
    let mut prepared = executor.prepare(&statement.sql).await?;
    for binding in &statement.bindings {
        prepared.bind(&binding.name, &binding.value)?;
    }
    prepared.execute().await
}
