use common::errors::ReviewError;
use common::http::{json_response, preflight_response, ResponseBody};
use hyper::{Response, StatusCode};
use serde_json::{json, Value};

/// Builds every response the server sends, so that all of them share the
/// JSON content type and the CORS origin header.
pub struct ResponseHandler;

impl ResponseHandler {
    /// `200 {"success": true, "data": ...}`
    pub fn review_success(data: Value) -> Response<ResponseBody> {
        json_response(StatusCode::OK, &json!({ "success": true, "data": data }))
    }

    pub fn review_outcome(outcome: Result<Value, ReviewError>) -> Response<ResponseBody> {
        match outcome {
            Ok(data) => Self::review_success(data),
            Err(err) => err.into_response(),
        }
    }

    /// Create an error response with a given status code and message
    pub fn create_error_response(status: StatusCode, message: &str) -> Response<ResponseBody> {
        json_response(status, &json!({ "error": message }))
    }

    pub fn not_found() -> Response<ResponseBody> {
        Self::create_error_response(StatusCode::NOT_FOUND, "Not Found")
    }

    pub fn method_not_allowed() -> Response<ResponseBody> {
        Self::create_error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
    }

    pub fn create_internal_error(message: &str) -> Response<ResponseBody> {
        Self::create_error_response(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn preflight() -> Response<ResponseBody> {
        preflight_response()
    }
}
