//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and the default remote endpoint so a rename only touches this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "usersync";

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Target triple, exported by `build.rs`.
pub const TARGET: &str = env!("TARGET");

/// `User-Agent` sent with every remote request.
pub const USER_AGENT: &str = concat!("usersync/", env!("CARGO_PKG_VERSION"));

/// Local config filename (e.g. `.usersync.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".usersync.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "usersync";

/// Public placeholder API serving a sample `/users` collection.
pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";

/// Path of the user collection relative to the base URL.
pub const USERS_PATH: &str = "users";

/// Default bound on a single remote call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// ── Environment variable names ──────────────────────────────────────

pub const ENV_BASE_URL: &str = "USERSYNC_BASE_URL";
pub const ENV_MODE: &str = "USERSYNC_MODE";
pub const ENV_TIMEOUT_SECS: &str = "USERSYNC_TIMEOUT_SECS";
pub const ENV_FORMAT: &str = "USERSYNC_FORMAT";
pub const ENV_LOG: &str = "USERSYNC_LOG";
