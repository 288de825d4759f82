//! Worker thread that owns the tokio runtime and the dashboard.

pub mod commands;
pub mod runtime;
