//! Logger trait definition

use std::sync::Arc;

/// Logger used by the resolver to report resolution steps
///
/// Secret payloads are never passed to a logger, only store and fetcher
/// names and URI schemes.
///
/// Implementations:
/// - `NoOpLogger`: the resolver default
/// - `ConsoleLogger`: writes to stderr
/// - Host adapters (e.g. forwarding to an application's own log facade)
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);

    fn info(&self, message: &str);

    fn warn(&self, message: &str);

    fn error(&self, message: &str);
}

/// Type alias for an Arc-wrapped logger
pub type SharedLogger = Arc<dyn Logger>;

#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $logger.info(&format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $logger.warn(&format!($($arg)*))
    };
}
