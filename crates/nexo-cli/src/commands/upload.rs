//! `upload`: picked files, dropped paths (`--flatten`) or whole folders (`--folder`).

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use indicatif::ProgressBar;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use nexo_core::error::AppError;
use nexo_service::file::{FolderEntry, LocalFile, UploadProgress, collect_folder};

use crate::context::CliContext;
use crate::output::{self, OutputFormat};

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Files (or directories with `--folder`/`--flatten`)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
    /// Recreate each directory's structure in the drive
    #[arg(long, conflicts_with = "flatten")]
    pub folder: bool,
    /// Upload every file found under the paths into the current folder,
    /// skipping files over the size limit
    #[arg(long)]
    pub flatten: bool,
}

/// Cancel `token` on Ctrl-C. The in-flight file still completes.
fn cancel_on_interrupt(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current file");
            token.cancel();
        }
    });
}

fn tracker(total: u64, bar: &ProgressBar) -> Arc<UploadProgress> {
    bar.set_length(total);
    Arc::new(UploadProgress::new(total).with_listener(output::bar_listener(bar.clone())))
}

/// Execute the upload command.
pub async fn execute(cli: &CliContext, args: &UploadArgs) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);
    let uploads = &cli.services.uploads;

    let cancel = CancellationToken::new();
    cancel_on_interrupt(cancel.clone());
    let bar = output::upload_bar(0, cli.format);

    let report = if args.folder {
        let mut entries: Vec<FolderEntry> = Vec::new();
        for path in &args.paths {
            entries.extend(collect_folder(path)?);
        }
        let total = entries.iter().map(|e| e.file.size).sum();
        let progress = tracker(total, &bar);
        uploads
            .upload_folder(&ctx, stored.cwd, &entries, Some(progress), &cancel)
            .await
    } else {
        let files: Vec<LocalFile> = if args.flatten {
            let dropped = uploads.collect_dropped(&args.paths)?;
            let limit = nexo_service::file::collect::limit_in_mb(uploads.max_file_size());
            for skipped in &dropped.oversized {
                output::print_warning(&format!(
                    "File {} exceeds the {limit} MB limit",
                    skipped.name
                ));
            }
            dropped.files
        } else {
            args.paths
                .iter()
                .map(|path| LocalFile::from_path(path))
                .collect::<Result<_, _>>()?
        };
        if files.is_empty() {
            output::print_warning("Nothing to upload");
            return Ok(());
        }
        let total = files.iter().map(|f| f.size).sum();
        let progress = tracker(total, &bar);
        uploads
            .upload_files(&ctx, stored.cwd, &files, Some(progress), &cancel)
            .await
    };

    bar.finish_and_clear();
    let report = report?;
    info!(session = %report.session, files = report.files.len(), "Upload command done");

    match cli.format {
        OutputFormat::Json => output::print_json(&report),
        OutputFormat::Table if report.cancelled => output::print_warning(&format!(
            "Upload cancelled; {} file(s) were uploaded",
            report.files.len()
        )),
        OutputFormat::Table if args.folder => output::print_success(&format!(
            "Uploaded {} folder(s) and {} file(s)",
            report.folders.len(),
            report.files.len()
        )),
        OutputFormat::Table => {
            output::print_success(&format!("Uploaded {} file(s)", report.files.len()))
        }
    }
    Ok(())
}
