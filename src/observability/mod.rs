//! Observability infrastructure.
//!
//! Provides:
//! - Structured tracing to stderr, as text or JSON

pub mod tracing;
