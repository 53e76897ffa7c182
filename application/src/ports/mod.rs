//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod ci_context;
pub mod comparison_engine;
pub mod connection;
pub mod progress;
pub mod run_event_logger;
pub mod service_lifecycle;
pub mod version_control;
