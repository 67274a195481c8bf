//! Structured logging for MindGauge.
//!
//! Handles console/file tracing output and redaction of sensitive material
//! (API keys, bearer tokens, phone numbers in diary text) before it is logged.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
