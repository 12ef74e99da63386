//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → ResolverConfig (validated, immutable)
//!     → ResolverHost builds a ResolverSnapshot from it
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new config sent over an mpsc channel
//!     → host publishes a new snapshot
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    ContentTypeConfig, ObservabilityConfig, QueryVarsConfig, ResolverConfig, RewriteConfig,
    RuleConfig, TaxonomyConfig,
};
pub use validation::{validate_config, ValidationError};
pub use watcher::ConfigWatcher;
