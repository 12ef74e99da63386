//! Resolver metrics.
//!
//! # Responsibilities
//! - Count resolutions by outcome
//! - Count session cache hits and misses
//! - Count rewrite rules tried and config reloads
//!
//! # Metrics
//! - `resolver_resolutions_total` (counter): resolutions by `outcome`
//!   (`resolved`, `bad_url`, `not_found`, `not_resolved`)
//! - `resolver_cache_total` (counter): session lookups by `result` (`hit`, `miss`)
//! - `resolver_rules_scanned_total` (counter): rewrite rules tried
//! - `resolver_config_reloads_total` (counter): reloads by `result` (`ok`, `error`)
//!
//! # Design Decisions
//! - Only the `metrics` facade is used; installing a recorder is up to the host
//! - Without a recorder every call is a no-op

use metrics::counter;

use crate::resolution::ResolutionOutcome;

pub fn record_resolution(outcome: &ResolutionOutcome) {
    let label = match outcome {
        Ok(_) => "resolved",
        Err(e) => e.code(),
    };
    counter!("resolver_resolutions_total", "outcome" => label).increment(1);
}

pub fn record_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("resolver_cache_total", "result" => result).increment(1);
}

pub fn record_rules_scanned(count: usize) {
    counter!("resolver_rules_scanned_total").increment(count as u64);
}

pub fn record_config_reload(success: bool) {
    let result = if success { "ok" } else { "error" };
    counter!("resolver_config_reloads_total", "result" => result).increment(1);
}
