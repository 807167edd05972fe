use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::server::error::ApiError;

pub const INVALID_JSON: &str = "Invalid JSON in request body";

/// Decode a JSON request body.
///
/// Bodies are taken as raw bytes so that a missing or wrong `Content-Type`
/// is not a rejection on its own; only undecodable content is.
///
/// # Errors
/// Returns [`ApiError::InvalidInput`] when the bytes are not JSON of the
/// expected shape.
pub fn parse_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::invalid_input(INVALID_JSON))
}

/// Treat absent and empty strings the same way, as the browser client does.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Whether `value` can stand as one URL path segment on its own: no `/`
/// and not a `.` or `..` dot segment.
pub fn is_path_segment(value: &str) -> bool {
    !value.is_empty() && !value.contains('/') && value != "." && value != ".."
}
