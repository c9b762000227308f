#![allow(dead_code)]

use sqlcompose::{PreparedStatement, Row, StatementError, StatementExecutor, Value};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Step at which [`RecordingExecutor`] reports a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Prepare,
    Bind,
    Execute,
}

/// One call observed by the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Prepare(String),
    Bind(String, Value),
    Execute,
}

/// In-memory executor that records the prepare/bind/execute protocol.
#[derive(Default)]
pub struct RecordingExecutor {
    rows: Vec<Row>,
    fail_at: Option<FailAt>,
    calls: Arc<Mutex<Vec<Call>>>,
    open_statements: Arc<AtomicUsize>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn returning(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn failing_at(step: FailAt) -> Self {
        Self {
            fail_at: Some(step),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Statements prepared but not yet dropped.
    pub fn open_statements(&self) -> usize {
        self.open_statements.load(Ordering::SeqCst)
    }
}

pub struct RecordingStatement {
    sql: String,
    rows: Vec<Row>,
    fail_at: Option<FailAt>,
    calls: Arc<Mutex<Vec<Call>>>,
    open_statements: Arc<AtomicUsize>,
}

impl Drop for RecordingStatement {
    fn drop(&mut self) {
        self.open_statements.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Whether `sql` contains `:name` as a whole token.
fn has_placeholder(sql: &str, name: &str) -> bool {
    let token = format!(":{name}");
    sql.match_indices(&token).any(|(at, _)| {
        sql[at + token.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

impl StatementExecutor for RecordingExecutor {
    type Statement<'a>
        = RecordingStatement
    where
        Self: 'a;

    fn prepare<'a>(
        &'a self,
        sql: &'a str,
    ) -> impl Future<Output = Result<Self::Statement<'a>, StatementError>> + Send + 'a {
        async move {
            self.calls.lock().unwrap().push(Call::Prepare(sql.to_string()));
            if self.fail_at == Some(FailAt::Prepare) {
                return Err(StatementError::Other("syntax error at or near \"FROM\"".into()));
            }

            self.open_statements.fetch_add(1, Ordering::SeqCst);
            Ok(RecordingStatement {
                sql: sql.to_string(),
                rows: self.rows.clone(),
                fail_at: self.fail_at,
                calls: Arc::clone(&self.calls),
                open_statements: Arc::clone(&self.open_statements),
            })
        }
    }
}

impl PreparedStatement for RecordingStatement {
    fn bind(&mut self, name: &str, value: &Value) -> Result<(), StatementError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Bind(name.to_string(), value.clone()));
        if self.fail_at == Some(FailAt::Bind) {
            return Err(StatementError::Other("type mismatch".into()));
        }
        if !has_placeholder(&self.sql, name) {
            return Err(StatementError::UnknownPlaceholder(name.to_string()));
        }
        Ok(())
    }

    fn execute(self) -> impl Future<Output = Result<Vec<Row>, StatementError>> + Send {
        async move {
            self.calls.lock().unwrap().push(Call::Execute);
            if self.fail_at == Some(FailAt::Execute) {
                return Err(StatementError::Other("connection reset".into()));
            }
            Ok(self.rows.clone())
        }
    }
}

#[test]
fn placeholder_tokens_match_whole_names() {
    assert!(has_placeholder("a = :param1", "param1"));
    assert!(has_placeholder("a = :param1 AND b", "param1"));
    assert!(!has_placeholder("a = :param10", "param1"));
}
