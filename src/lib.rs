//! Library entry point for the DeepScan relay backend.
//!
//! Exports all core modules for use in integration tests and by the main binary.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod models;
pub mod services;
pub mod telemetry;
pub mod detection {
    pub mod analyzer;
    pub mod simulator;
    pub use analyzer::*;
    pub use simulator::*;
}

pub use config::*;
pub use detection::*;
pub use errors::*;
pub use logging::*;
pub use models::AppState;
pub use models::*;
