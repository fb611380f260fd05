//! Path extractor whose rejections use the standard error envelope.

use axum::extract::FromRequestParts;

use crate::errors::AppError;

/// Drop-in for `axum::extract::Path`; a malformed segment (for example a
/// non-UUID id) becomes `VALIDATION_ERROR`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);
