//! Convenience result type alias for Nexo Drive.

use crate::error::AppError;

/// A specialized `Result` type for Nexo Drive operations.
pub type AppResult<T> = Result<T, AppError>;
