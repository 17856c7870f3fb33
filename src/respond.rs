use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::{AppError, ContractError, FieldErrors};

/// Renders the outcome of a contract: `code` with the body, 400 with the
/// field errors, or a 500 for store failures.
pub fn contract<T: Serialize>(
    code: StatusCode,
    result: Result<T, ContractError>,
) -> Result<Response, AppError> {
    match result {
        Ok(body) => Ok((code, Json(body)).into_response()),
        Err(ContractError::Invalid(errors)) => {
            Ok((StatusCode::BAD_REQUEST, Json(errors)).into_response())
        }
        Err(ContractError::Store(error)) => Err(error.into()),
    }
}

pub fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Invalid or missing token." })),
    )
        .into_response()
}

/// A body that could not be read as the expected JSON object, as a 400.
///
/// The messages are fixed, serde's would quote the submitted values.
pub fn rejected(rejection: JsonRejection) -> Response {
    let message = match rejection {
        JsonRejection::JsonDataError(_) => "Invalid data. Check the type of each field.",
        JsonRejection::JsonSyntaxError(_) => "JSON parse error.",
        JsonRejection::MissingJsonContentType(_) => "Expected a `Content-Type: application/json` body.",
        _ => "Invalid request body.",
    };
    (StatusCode::BAD_REQUEST, Json(FieldErrors::non_field(message))).into_response()
}
