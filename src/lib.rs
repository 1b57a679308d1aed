// ABOUTME: Library root for assetship - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod batch;
pub mod config;
pub mod deploy;
pub mod error;
pub mod listing;
pub mod output;
pub mod retention;
pub mod retry;
pub mod store;
pub mod version;
