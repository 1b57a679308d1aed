// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines the deploy and cleanup subcommands and their shared options.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "assetship")]
#[command(about = "Versioned static asset deployment and cleanup for Azure Blob Storage")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy a directory to the storage container under the current version
    Deploy {
        #[command(flatten)]
        store: StoreArgs,

        /// Path to the directory being deployed
        #[arg(short, long)]
        path: PathBuf,
    },

    /// Remove prior builds of the current lineage from the storage container
    Cleanup {
        #[command(flatten)]
        store: StoreArgs,

        /// Maximum number of listing pages loaded for cleanup
        #[arg(long)]
        max_pages: Option<usize>,

        /// Exit with an error if any deletion failed
        #[arg(long)]
        fail_on_error: bool,
    },
}

/// Options shared by every command that talks to the storage account.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Version being deployed, e.g. master.1234 or 2.0.1
    #[arg(long)]
    pub current_version: String,

    /// Azure storage account connection string
    #[arg(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)]
    pub connection_string: Option<String>,

    /// Container within the storage account [default: $web]
    #[arg(long)]
    pub container: Option<String>,

    /// Number of concurrent storage operations [default: 50]
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Number of attempts per storage operation [default: 3]
    #[arg(long)]
    pub retries: Option<u32>,

    /// Do not perform uploads or deletes
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a config file (defaults to assetship.yml in the working directory)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
