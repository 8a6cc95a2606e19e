//! usersync — in-memory user record store with optional remote sync (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod avatar;
pub mod config;
pub mod constants;
pub mod env;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod remote;
pub mod session;
pub mod store;

pub use error::{FetchCause, FetchError, StoreError};
pub use models::{Gender, UserDraft, UserId, UserRecord};
pub use store::UserStore;
