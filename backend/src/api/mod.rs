//! HTTP API module.
//!
//! HTTP server, response types and the SSE log channel.

pub mod logs;
pub mod server;
pub mod types;

pub use logs::{log_error, log_info, log_success, log_warning, LogEntry, LogLevel, LOG_BROADCASTER};
pub use server::start_server;
pub use types::*;
