// ABOUTME: Command module aggregator for the assetship CLI.
// ABOUTME: Re-exports deploy and cleanup command handlers.

mod cleanup;
mod connection;
mod deploy;

pub use cleanup::cleanup;
pub use deploy::deploy;
