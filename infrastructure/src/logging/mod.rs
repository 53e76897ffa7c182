//! Structured run logging.
//!
//! Provides [`JsonlRunEventLogger`], a JSONL file writer implementing the
//! [`RunEventLogger`](consistency_application::RunEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlRunEventLogger;
