use forum_core::AppError;
use tracing::warn;

const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";

/// Maps a driver error into the application error taxonomy.
///
/// Unique violations become conflicts. Foreign-key violations become
/// `on_foreign_key`, since a missing parent and a still-referenced row mean
/// different things to the caller.
pub(crate) fn map_database_error(
    context: &str,
    error: sqlx::Error,
    on_foreign_key: impl FnOnce() -> AppError,
) -> AppError {
    let code = error
        .as_database_error()
        .and_then(|database_error| database_error.code())
        .map(|code| code.into_owned());

    match code.as_deref() {
        Some(FOREIGN_KEY_VIOLATION) => on_foreign_key(),
        Some(UNIQUE_VIOLATION) => AppError::Conflict(format!("{context}: duplicate value")),
        _ => {
            warn!(error = %error, "{context}");
            AppError::Internal(format!("{context}: {error}"))
        }
    }
}

/// Wraps a driver error that has no domain meaning.
pub(crate) fn internal_error(context: &str, error: sqlx::Error) -> AppError {
    warn!(error = %error, "{context}");
    AppError::Internal(format!("{context}: {error}"))
}
