//! Logging settings for the prepared-statement log line.

use tracing::Level;

/// Logging configuration for [`PgExecutor`](super::PgExecutor).
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Tracing event level for the prepared-statement log line.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl ExecutorConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Emit the SQL log line for a (re)prepared statement.
    pub(crate) fn log_prepare(
        &self,
        named_sql: &str,
        exec_sql: &str,
        param_count: usize,
        with_casts: bool,
    ) {
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    Level::TRACE => tracing::trace!($($field)*),
                }
            };
        }

        let exec_sql = self.truncate_sql(exec_sql);
        let named_sql = self.truncate_sql(named_sql);
        emit_at_level!(
            self.level,
            target: "sqlcompose.sql",
            param_count,
            with_casts,
            sql = %exec_sql,
            named_sql = %named_sql,
            "preparing statement"
        );
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => {
                let mut end = max;
                while !sql.is_char_boundary(end) {
                    end -= 1;
                }
                format!("{}...", &sql[..end])
            }
            _ => sql.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundary() {
        let config = ExecutorConfig::new().max_sql_length(3);
        assert_eq!(config.truncate_sql("SELECT"), "SEL...");
        assert_eq!(config.truncate_sql("añb"), "añ...");
        assert_eq!(config.truncate_sql("ab"), "ab");
    }

    #[test]
    fn no_truncate_keeps_everything() {
        let config = ExecutorConfig::new().no_truncate().level(Level::INFO);
        let sql = "x".repeat(1000);
        assert_eq!(config.truncate_sql(&sql), sql);
        assert_eq!(config.level, Level::INFO);
    }
}
