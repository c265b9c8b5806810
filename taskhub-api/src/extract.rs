/// Request extractors
///
/// [`ApiJson`] behaves like `axum::Json` but reports body errors (bad
/// syntax, wrong field types, missing content type) as `400 Bad Request`
/// in the API's error format.

use crate::error::ApiError;
use axum::extract::FromRequest;

/// JSON body extractor with API-shaped rejections
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
