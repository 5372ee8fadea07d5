//! Request telemetry for the relay.
//!
//! Subscriber setup lives in [`crate::logging`]; this module holds the per-request
//! logging middleware and its helpers.

pub mod middleware;

/// Request logging middleware
pub use middleware::RequestLoggingMiddleware;

/// Helper function to categorize performance based on duration.
pub fn categorize_performance(duration_ms: u64) -> &'static str {
    match duration_ms {
        0..=100 => "EXCELLENT",
        101..=500 => "GOOD",
        501..=2000 => "ACCEPTABLE",
        2001..=5000 => "SLOW",
        _ => "CRITICAL",
    }
}
