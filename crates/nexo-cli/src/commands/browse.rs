//! Navigation commands: ls, cd, pwd, mkdir.

use nexo_core::error::AppError;

use crate::context::CliContext;
use crate::output::{self, ItemRow, OutputFormat};
use crate::resolve::resolve_folder;

/// List a folder: sub-folders first, then files, each by name.
pub async fn ls(cli: &CliContext, folder: Option<&str>) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);
    let target = match folder {
        Some(arg) => resolve_folder(cli, &ctx, stored.cwd, arg).await?,
        None => stored.cwd,
    };

    let listing = cli.services.folders.list(&ctx, target).await?;
    match cli.format {
        OutputFormat::Json => output::print_json(&listing),
        OutputFormat::Table => {
            println!("{}", listing.breadcrumbs.display_path());
            let rows: Vec<ItemRow> = listing
                .folders
                .iter()
                .map(ItemRow::folder)
                .chain(listing.files.iter().map(ItemRow::file))
                .collect();
            output::print_list(&rows, cli.format);
        }
    }
    Ok(())
}

/// Change the current folder.
pub async fn cd(cli: &CliContext, folder: &str) -> Result<(), AppError> {
    let mut stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);

    let target = resolve_folder(cli, &ctx, stored.cwd, folder).await?;
    let breadcrumbs = cli.services.folders.breadcrumbs(&ctx, target).await?;
    stored.cwd = target;
    cli.store.save(&stored)?;

    println!("{}", breadcrumbs.display_path());
    Ok(())
}

/// Print the current folder path.
pub async fn pwd(cli: &CliContext) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);
    let breadcrumbs = cli.services.folders.breadcrumbs(&ctx, stored.cwd).await?;
    println!("{}", breadcrumbs.display_path());
    Ok(())
}

/// Create a folder in the current folder.
pub async fn mkdir(cli: &CliContext, name: &str) -> Result<(), AppError> {
    let stored = cli.require_session().await?;
    let ctx = CliContext::session_context(&stored);
    let folder = cli.services.folders.create(&ctx, stored.cwd, name).await?;
    output::print_success(&format!("Folder '{}' created", folder.name));
    Ok(())
}
