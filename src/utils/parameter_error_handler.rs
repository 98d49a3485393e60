//! 请求体 / 查询参数解析失败时的统一 400 响应

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest};
use tracing::debug;

use crate::errors::TrackademyError;

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    debug!("JSON payload rejected for {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large".to_string()
        }
        JsonPayloadError::Deserialize(e) if e.is_data() => {
            format!("Validation failed: {e}")
        }
        JsonPayloadError::Deserialize(e) => format!("Malformed JSON body: {e}"),
        other => format!("Invalid request body: {other}"),
    };
    TrackademyError::validation(message).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    debug!("Query string rejected for {}: {}", req.path(), err);
    let message = match &err {
        QueryPayloadError::Deserialize(e) => format!("Validation failed: {e}"),
        other => format!("Invalid query parameters: {other}"),
    };
    TrackademyError::validation(message).into()
}
