//! # Error Handling Middleware
//!
//! Maps `ClubError` to HTTP status codes and `{ "error": ... }` JSON bodies
//! so every handler reports failures the same way.
//!
//! Database and internal failures are logged with their cause and reported
//! to the client with an opaque message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use clubly_core::errors::ClubError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// # Example
///
/// ```
/// use axum::Json;
/// use clubly_api::middleware::error_handling::AppError;
/// use clubly_core::errors::ClubError;
///
/// async fn handler(name: Option<String>) -> Result<Json<String>, AppError> {
///     let name = name.ok_or_else(|| ClubError::required("name"))?;
///     Ok(Json(name))
/// }
/// # fn main() {}
/// ```
#[derive(Debug)]
pub struct AppError(pub ClubError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            ClubError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            ClubError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            ClubError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
            ClubError::Authorization(message) => (StatusCode::FORBIDDEN, message.clone()),
            ClubError::Database(_) | ClubError::Internal(_) => {
                tracing::error!("Request failed: {:?}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Allows `?` on `ClubResult` inside handlers.
impl From<ClubError> for AppError {
    fn from(err: ClubError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ClubError::Database(err))
    }
}

/// Maps a ClubError straight to an HTTP response.
pub fn map_error(err: ClubError) -> Response {
    AppError(err).into_response()
}
