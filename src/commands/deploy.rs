// ABOUTME: Deploy command implementation.
// ABOUTME: Uploads a local directory under the current version folder.

use super::connection::{connect, resolve_config};
use crate::cli::StoreArgs;
use assetship::error::Result;
use assetship::output::Output;
use std::path::Path;

/// Upload `path` to the configured container.
pub async fn deploy(args: StoreArgs, path: &Path, mut output: Output) -> Result<()> {
    output.start_timer();
    let config = resolve_config(&args, None)?;
    let manager = connect(&args, &config, &output)?;

    output.progress(&format!(
        "Deploying {} as {} to {}",
        path.display(),
        args.current_version,
        config.container
    ));
    if args.dry_run {
        output.progress("  → Dry run: no files will be uploaded");
    }

    let report = match manager.deploy(path).await {
        Ok(report) => report,
        Err(e) => {
            if let Some(failures) = e.upload_failures() {
                for failure in failures {
                    output.error(&format!(
                        "upload {} ({}) failed: {}",
                        failure.index, failure.path, failure.error
                    ));
                }
            }
            return Err(e.into());
        }
    };

    let action = if report.dry_run {
        "Would have uploaded"
    } else {
        "Uploaded"
    };
    output.report(
        &format!(
            "{action} {} files totaling {:.2}MB.",
            report.uploaded_files,
            report.uploaded_bytes as f64 / 1024.0 / 1024.0
        ),
        &report,
    );
    output.success("Deployment complete!");
    Ok(())
}
