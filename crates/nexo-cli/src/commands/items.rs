//! Item commands: rename, rm, mv, lock, unlock, link, download.

use std::path::{Path, PathBuf};

use nexo_core::error::{AppError, ErrorKind};
use nexo_entity::file::format_file_size;
use nexo_entity::item::ItemRef;

use crate::context::CliContext;
use crate::output::{self, OutputFormat};
use crate::resolve::{resolve_folder, resolve_item};

use super::prompt_error;

/// Rename a folder, or a file keeping its extension.
pub async fn rename(cli: &CliContext, item: &str, name: &str) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    match resolve_item(cli, &ctx, stored.cwd, item).await? {
        ItemRef::Folder(id) => {
            cli.services.folders.rename(&ctx, id, name).await?;
            output::print_success(&format!("Folder renamed to '{}'", name.trim()));
        }
        ItemRef::File(id) => {
            let new_name = cli.services.files.rename(&ctx, id, name).await?;
            output::print_success(&format!("File renamed to '{new_name}'"));
        }
    }
    Ok(())
}

/// Delete the given items after confirmation.
pub async fn remove(cli: &CliContext, targets: &[String], yes: bool) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    let mut refs = Vec::with_capacity(targets.len());
    for target in targets {
        refs.push(resolve_item(cli, &ctx, stored.cwd, target).await?);
    }

    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Delete {} item(s)? Folders are deleted with everything inside them.",
                refs.len()
            ))
            .default(false)
            .interact()
            .map_err(prompt_error)?;
        if !confirmed {
            output::print_warning("Delete aborted");
            return Ok(());
        }
    }

    let summary = cli.services.items.bulk_delete(&ctx, &refs).await?;

    output::print_success(&format!(
        "Deleted {} folder(s) and {} file(s)",
        summary.folders, summary.files
    ));
    Ok(())
}

/// Move an item into a folder (`/` for the root).
pub async fn move_to(cli: &CliContext, item: &str, target: &str) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    let item = resolve_item(cli, &ctx, stored.cwd, item).await?;
    let target = resolve_folder(cli, &ctx, stored.cwd, target).await?;
    cli.services.items.move_item(&ctx, item, target).await?;

    let where_to = cli.services.folders.breadcrumbs(&ctx, target).await?;
    output::print_success(&format!("Moved to {}", where_to.display_path()));
    Ok(())
}

/// Lock or unlock an item.
pub async fn set_locked(cli: &CliContext, item: &str, locked: bool) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    let item = resolve_item(cli, &ctx, stored.cwd, item).await?;
    if locked {
        cli.services.items.lock(&ctx, item).await?;
        output::print_success("Item locked");
    } else {
        cli.services.items.unlock(&ctx, item).await?;
        output::print_success("Item unlocked");
    }
    Ok(())
}

/// Print what the web client would copy to the clipboard.
pub async fn link(cli: &CliContext, item: &str) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    let item = resolve_item(cli, &ctx, stored.cwd, item).await?;
    let text = cli.services.items.copy_target(&ctx, item).await?;
    match cli.format {
        OutputFormat::Json => output::print_json(&serde_json::json!({ "link": text })),
        OutputFormat::Table => println!("{text}"),
    }
    Ok(())
}

/// Download a file's body to disk.
pub async fn download(cli: &CliContext, file: &str, dest: Option<&Path>) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    let id = match resolve_item(cli, &ctx, stored.cwd, file).await? {
        ItemRef::File(id) => id,
        ItemRef::Folder(_) => {
            return Err(AppError::validation(format!("'{file}' is a folder")));
        }
    };
    let (record, body) = cli.services.files.download(&ctx, id).await?;

    let path: PathBuf = match dest {
        Some(dest) if dest.is_dir() => dest.join(&record.name),
        Some(dest) => dest.to_path_buf(),
        None => PathBuf::from(&record.name),
    };
    tokio::fs::write(&path, &body).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Cannot write {}: {e}", path.display()),
            e,
        )
    })?;

    output::print_success(&format!(
        "Saved {} ({}) to {}",
        record.name,
        format_file_size(record.size),
        path.display()
    ));
    Ok(())
}
