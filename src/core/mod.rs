// src/core/mod.rs
//! Process-wide services: configuration and the database handle

pub mod config_manager;
pub mod database;

pub use config_manager::{AppConfig, ConfigManager};
pub use database::Database;
