pub mod admin_cli;
pub mod auth;
pub mod core;
pub mod error;
pub mod repositories;
pub mod types;
pub mod utils;
pub mod web;
pub mod workflow;

pub use error::WorkflowError;
pub use web::{build_rocket, start_web_server};
pub use workflow::{ApplicationWorkflow, WorkflowSettings};

/// Logs through `tracing` at the given level: `app_log!(info, "Started {}", name)`.
#[macro_export]
macro_rules! app_log {
    (trace, $($arg:tt)+) => { ::tracing::trace!($($arg)+) };
    (debug, $($arg:tt)+) => { ::tracing::debug!($($arg)+) };
    (info, $($arg:tt)+) => { ::tracing::info!($($arg)+) };
    (warn, $($arg:tt)+) => { ::tracing::warn!($($arg)+) };
    (error, $($arg:tt)+) => { ::tracing::error!($($arg)+) };
}
