//! Fetcher abstractions and implementations
//!
//! A fetcher turns the decomposed settings URI into raw text for a store:
//! - `Fetcher` trait for custom sources
//! - Built-in implementations: `FileFetcher`, `GsmFetcher` (feature `gsm`)
//! - `FnFetcher` for closure-backed fetchers

mod traits;
mod file;
#[cfg(feature = "gsm")]
mod gsm;

pub use traits::{Fetcher, FetchRequest, FnFetcher};
pub use file::{FileFetcher, FileFetchError};
#[cfg(feature = "gsm")]
pub use gsm::{GsmFetcher, GsmError, SecretManagerClient, HttpSecretManagerClient};
