//! Structured logging for the jewelry storefront.
//!
//! This crate provides:
//! - `StructuredLogger` - Structured logging with component context
//! - `LogSink` - Where rendered log lines go (stderr, memory)
//! - `LogBuilder` - Fluent construction of entries with typed fields

mod logging;
mod sink;

pub use logging::*;
pub use sink::*;
