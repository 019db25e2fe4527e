//! Typed repositories over the hosted record store.

pub mod file;
pub mod folder;
pub mod user;

pub use file::FileRepository;
pub use folder::FolderRepository;
pub use user::UserRepository;

use serde::de::DeserializeOwned;
use serde_json::Value;

use nexo_core::error::{AppError, ErrorKind};
use nexo_core::result::AppResult;

/// Decode JSON rows into entities.
pub(crate) fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> AppResult<Vec<T>> {
    rows.into_iter().map(|row| decode_row(row, what)).collect()
}

/// Decode one JSON row into an entity.
pub(crate) fn decode_row<T: DeserializeOwned>(row: Value, what: &str) -> AppResult<T> {
    serde_json::from_value(row).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Failed to decode {what} row"),
            e,
        )
    })
}

/// Turn a zero-row update into `NotFound`.
pub(crate) fn expect_changed(changed: u64, what: &str) -> AppResult<()> {
    if changed == 0 {
        return Err(AppError::not_found(format!("{what} not found")));
    }
    Ok(())
}
