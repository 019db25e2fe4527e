//! Item addressing: ids, names in the current folder, `/` and `..`.

use uuid::Uuid;

use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;
use nexo_core::types::{FileId, FolderId};
use nexo_entity::item::ItemRef;
use nexo_service::SessionContext;

use crate::context::CliContext;

/// Resolve an item argument against the current folder.
///
/// A UUID is looked up as a folder, then as a file. Anything else must match
/// exactly one folder or file name directly inside `cwd`.
pub async fn resolve_item(
    cli: &CliContext,
    ctx: &SessionContext,
    cwd: Option<FolderId>,
    arg: &str,
) -> AppResult<ItemRef> {
    if let Ok(uuid) = Uuid::parse_str(arg) {
        let folder = ItemRef::Folder(FolderId::from_uuid(uuid));
        match cli.services.items.load(ctx, folder).await {
            Ok(_) => return Ok(folder),
            Err(e) if e.is(ErrorKind::NotFound) => {}
            Err(e) => return Err(e),
        }
        let file = ItemRef::File(FileId::from_uuid(uuid));
        cli.services.items.load(ctx, file).await?;
        return Ok(file);
    }

    let name = arg.trim_end_matches('/');
    let listing = cli.services.folders.list(ctx, cwd).await?;
    let mut matches: Vec<ItemRef> = listing
        .folders
        .iter()
        .filter(|f| f.name == name)
        .map(|f| ItemRef::Folder(f.id))
        .collect();
    if !arg.ends_with('/') {
        matches.extend(
            listing
                .files
                .iter()
                .filter(|f| f.name == name)
                .map(|f| ItemRef::File(f.id)),
        );
    }

    match matches.as_slice() {
        [] => Err(AppError::not_found(format!("No item named '{name}' here"))),
        [single] => Ok(*single),
        many => Err(AppError::validation(format!(
            "'{name}' matches {} items; use an id instead",
            many.len()
        ))),
    }
}

/// Resolve a folder argument. `/` is the root and `..` the parent of `cwd`.
pub async fn resolve_folder(
    cli: &CliContext,
    ctx: &SessionContext,
    cwd: Option<FolderId>,
    arg: &str,
) -> AppResult<Option<FolderId>> {
    match arg {
        "/" => Ok(None),
        "." => Ok(cwd),
        ".." => match cwd {
            Some(id) => Ok(cli.services.folders.get(ctx, id).await?.parent_id),
            None => Ok(None),
        },
        _ => match resolve_item(cli, ctx, cwd, arg).await? {
            ItemRef::Folder(id) => Ok(Some(id)),
            ItemRef::File(_) => Err(AppError::validation(format!("'{arg}' is not a folder"))),
        },
    }
}
