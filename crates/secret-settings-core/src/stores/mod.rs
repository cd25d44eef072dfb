//! Settings store abstractions and implementations
//!
//! This module provides the typed accessor contract with:
//! - `SettingsStore` trait implemented by every store
//! - Built-in implementations: `EnvironmentStore`, `JsonStore`
//! - `Coercion` targets for `get_value`
//! - `Environment` providers so the process environment can be substituted

mod traits;
mod coerce;
mod environment;
mod env_store;
mod json_store;

pub use traits::{SettingsStore, SettingsStoreExt, is_truthy, TRUTHY_TOKENS};
pub use coerce::{Coercion, CoerceFn};
pub use environment::{Environment, SharedEnvironment, ProcessEnvironment, MemoryEnvironment};
pub use env_store::EnvironmentStore;
pub use json_store::JsonStore;
