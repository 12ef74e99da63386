//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Sessions, config watcher:
//!     → logging.rs (structured log events, session spans)
//!     → metrics.rs (counters)
//!
//! Consumers:
//!     → stdout (plain or JSON)
//!     → whatever `metrics` recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Every session span carries its `session_id`
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
