// ABOUTME: Cleanup command implementation.
// ABOUTME: Removes superseded version folders and prints a summary.

use super::connection::{connect, resolve_config};
use crate::cli::StoreArgs;
use assetship::error::{Error, Result};
use assetship::output::Output;

/// Remove prior builds of the current lineage from the configured container.
///
/// Failed deletions are reported in the summary. They only fail the command
/// when `fail_on_error` is set.
pub async fn cleanup(
    args: StoreArgs,
    max_pages: Option<usize>,
    fail_on_error: bool,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let config = resolve_config(&args, max_pages)?;
    let manager = connect(&args, &config, &output)?;

    output.progress(&format!(
        "Cleaning up versions prior to {} in {}",
        args.current_version, config.container
    ));

    let report = manager.cleanup().await?;

    for entry in &report.failed_files {
        output.warning(&format!("failed to remove {}", entry.name));
    }
    output.report(&report.summary(), &report);

    if fail_on_error && report.has_failures() {
        return Err(Error::CleanupIncomplete(report.failed_files.len()));
    }

    Ok(())
}
