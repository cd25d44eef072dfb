//! Logging abstractions
//!
//! - `Logger` trait injected into the resolver (default `NoOpLogger`)
//! - `file_logger`: process-wide opt-in file sink used by the fetchers

mod traits;
mod noop;
mod console;
pub mod file_logger;

pub use traits::{Logger, SharedLogger};
pub use noop::NoOpLogger;
pub use console::ConsoleLogger;

pub use file_logger::{log_file_path, LogLevel};
