use axum::extract::FromRequest;

use crate::errors::AppError;

/// `axum::Json` whose rejections are reported as `AppError`, so a body that
/// is missing, unparsable or the wrong shape gets the same structured error
/// payload as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
