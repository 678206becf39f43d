//! Configuration subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read + parse)
//!     → validation.rs (semantic checks, all errors collected)
//!     → schema.rs types consumed by the rest of the service
//! ```
//!
//! # Design Decisions
//! - Every section has a `Default` so the service runs with no file at all
//! - Validation is a pure function over the parsed config
//! - No hot reload; the config is read once at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ServiceConfig;
