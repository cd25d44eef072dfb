//! Console logger implementation

use super::traits::Logger;

/// A logger that writes every level to stderr
///
/// Settings are usually resolved before an application's own logging is up,
/// so this is the simplest way to see what `load` did.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    prefix: String,
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleLogger {
    pub fn new() -> Self {
        Self::with_prefix("[secret-settings]")
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn line(&self, level: &str, message: &str) -> String {
        format!("{} {}: {}", self.prefix, level, message)
    }
}

impl Logger for ConsoleLogger {
    fn debug(&self, message: &str) {
        eprintln!("{}", self.line("DEBUG", message));
    }

    fn info(&self, message: &str) {
        eprintln!("{}", self.line("INFO", message));
    }

    fn warn(&self, message: &str) {
        eprintln!("{}", self.line("WARN", message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.line("ERROR", message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;

    #[test]
    fn test_console_logger_prefix() {
        let logger = ConsoleLogger::new();
        assert_eq!(logger.line("INFO", "loaded"), "[secret-settings] INFO: loaded");

        let custom = ConsoleLogger::with_prefix("[app]");
        assert_eq!(custom.line("WARN", "x"), "[app] WARN: x");
    }

    #[test]
    fn test_loggers_do_not_panic() {
        let console = ConsoleLogger::new();
        crate::log_debug!(console, "debug {}", 1);
        crate::log_info!(console, "info");
        crate::log_warn!(console, "warn");
        console.error("error");

        let noop = NoOpLogger::new();
        crate::log_debug!(noop, "debug {}", 1);
        noop.error("error");
    }
}
