//! Observability setup for embstore: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
