//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，每个变体携带错误代码、类型名称和 HTTP 状态码。
//! `ResponseError` 的实现即全局错误转换器：所有处理器只需用 `?` 把错误交出去。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;

use crate::config::AppConfig;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - http_status() 方法 - 返回对应的 HTTP 状态码
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_trackademy_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum TrackademyError {
            $($variant(String),)*
        }

        impl TrackademyError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TrackademyError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TrackademyError::$variant(_) => $type_name,)*
                }
            }

            /// 获取 HTTP 状态码
            pub fn http_status(&self) -> StatusCode {
                match self {
                    $(TrackademyError::$variant(_) => StatusCode::$status,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TrackademyError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TrackademyError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TrackademyError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_trackademy_errors! {
    Validation("E001", "Validation Error", BAD_REQUEST),
    Unauthenticated("E002", "Authentication Error", UNAUTHORIZED),
    Forbidden("E003", "Authorization Error", FORBIDDEN),
    NotFound("E004", "Resource Not Found", NOT_FOUND),
    Conflict("E005", "Conflict", CONFLICT),
    StateViolation("E006", "State Violation", BAD_REQUEST),
    BadRequest("E007", "Bad Request", BAD_REQUEST),
    DateParse("E008", "Date Parse Error", BAD_REQUEST),
    DatabaseConfig("E009", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E010", "Database Connection Error", INTERNAL_SERVER_ERROR),
    DatabaseOperation("E011", "Database Operation Error", INTERNAL_SERVER_ERROR),
    FileOperation("E012", "File Operation Error", INTERNAL_SERVER_ERROR),
    Serialization("E013", "Serialization Error", INTERNAL_SERVER_ERROR),
    Internal("E014", "Internal Error", INTERNAL_SERVER_ERROR),
}

pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";
pub const DATABASE_CONNECTION_MESSAGE: &str = "Database connection error. Please try again later.";
pub const INVALID_DATA_MESSAGE: &str = "Invalid data provided. Please check your input.";
pub const REFERENCED_RECORD_MESSAGE: &str =
    "This record cannot be deleted because it is referenced by other records.";
pub const TOKEN_INVALID_MESSAGE: &str = "Invalid token. Please login again.";
pub const TOKEN_EXPIRED_MESSAGE: &str = "Token expired. Please login again.";

impl TrackademyError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 4xx 返回 "fail"，5xx 返回 "error"
    pub fn envelope_status(&self) -> &'static str {
        if self.http_status().is_server_error() {
            "error"
        } else {
            "fail"
        }
    }

    /// 客户端可见的消息
    ///
    /// 4xx 领域错误原样返回；连接错误给出固定提示；其余 5xx 一律隐藏细节。
    pub fn client_message(&self) -> &str {
        match self {
            TrackademyError::DatabaseConnection(_) => DATABASE_CONNECTION_MESSAGE,
            e if e.http_status().is_server_error() => INTERNAL_SERVER_ERROR_MESSAGE,
            e => e.message(),
        }
    }
}

impl fmt::Display for TrackademyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrackademyError {}

/// 错误响应体
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope<'a> {
    pub status: &'static str,
    pub message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetail<'a>>,
}

/// 非生产环境附带的错误细节
#[derive(Debug, Serialize)]
pub struct ErrorDetail<'a> {
    pub code: &'static str,
    #[serde(rename = "type")]
    pub error_type: &'static str,
    pub detail: &'a str,
}

impl TrackademyError {
    pub fn envelope(&self, verbose: bool) -> ErrorEnvelope<'_> {
        ErrorEnvelope {
            status: self.envelope_status(),
            message: self.client_message(),
            error: verbose.then(|| ErrorDetail {
                code: self.code(),
                error_type: self.error_type(),
                detail: self.message(),
            }),
        }
    }
}

impl ResponseError for TrackademyError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        if self.http_status().is_server_error() {
            tracing::error!("{}", self.format_simple());
        } else {
            tracing::debug!("{}", self.format_simple());
        }

        let verbose = !AppConfig::get().is_production();
        HttpResponse::build(self.http_status()).json(self.envelope(verbose))
    }
}

/// 从唯一约束报错中提取字段名
///
/// SQLite: `UNIQUE constraint failed: subjects.code, subjects.department_id`
/// PostgreSQL: `... Key (code, department_id)=(...) already exists.`
/// MySQL: `Duplicate entry '...' for key 'subjects.uq_subjects_code'`
fn unique_violation_field(raw: &str) -> String {
    if let Some((_, cols)) = raw.split_once("UNIQUE constraint failed:")
        && let Some(first) = cols.split(',').next()
    {
        let col = first.trim();
        return col.rsplit('.').next().unwrap_or(col).to_string();
    }
    if let Some((_, rest)) = raw.split_once("Key (")
        && let Some((cols, _)) = rest.split_once(')')
    {
        return cols.split(',').next().unwrap_or(cols).trim().to_string();
    }
    "field".to_string()
}

impl From<DbErr> for TrackademyError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(raw)) => {
                let field = unique_violation_field(&raw);
                return TrackademyError::Conflict(format!(
                    "A record with this {field} already exists. Please use a different {field}."
                ));
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                return TrackademyError::BadRequest(REFERENCED_RECORD_MESSAGE.to_string());
            }
            _ => {}
        }

        match err {
            DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => {
                TrackademyError::NotFound("Record not found.".to_string())
            }
            DbErr::Type(_) | DbErr::Json(_) | DbErr::TryIntoErr { .. } => {
                TrackademyError::BadRequest(INVALID_DATA_MESSAGE.to_string())
            }
            DbErr::Conn(e) => TrackademyError::DatabaseConnection(e.to_string()),
            DbErr::ConnectionAcquire(e) => TrackademyError::DatabaseConnection(e.to_string()),
            other => TrackademyError::DatabaseOperation(other.to_string()),
        }
    }
}

impl From<sea_orm::TransactionError<TrackademyError>> for TrackademyError {
    fn from(err: sea_orm::TransactionError<TrackademyError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => e.into(),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

impl From<std::io::Error> for TrackademyError {
    fn from(err: std::io::Error) -> Self {
        TrackademyError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TrackademyError {
    fn from(err: serde_json::Error) -> Self {
        TrackademyError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TrackademyError {
    fn from(err: chrono::ParseError) -> Self {
        TrackademyError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for TrackademyError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                TrackademyError::Unauthenticated(TOKEN_EXPIRED_MESSAGE.to_string())
            }
            _ => TrackademyError::Unauthenticated(TOKEN_INVALID_MESSAGE.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackademyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TrackademyError::validation("test").code(), "E001");
        assert_eq!(TrackademyError::not_found("test").code(), "E004");
        assert_eq!(TrackademyError::conflict("test").code(), "E005");
        assert_eq!(TrackademyError::internal("test").code(), "E014");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TrackademyError::validation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TrackademyError::unauthenticated("x").http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TrackademyError::forbidden("x").http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            TrackademyError::not_found("x").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TrackademyError::conflict("x").http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            TrackademyError::state_violation("x").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TrackademyError::database_operation("x").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = TrackademyError::database_operation("no such column: foo");
        assert_eq!(err.client_message(), INTERNAL_SERVER_ERROR_MESSAGE);
        assert_eq!(err.envelope_status(), "error");

        let err = TrackademyError::database_connection("pool timed out");
        assert_eq!(err.client_message(), DATABASE_CONNECTION_MESSAGE);

        let err = TrackademyError::state_violation("Cannot update a graded submission.");
        assert_eq!(err.client_message(), "Cannot update a graded submission.");
        assert_eq!(err.envelope_status(), "fail");
    }

    #[test]
    fn test_envelope_detail_only_when_verbose() {
        let err = TrackademyError::internal("boom");
        let quiet = serde_json::to_value(err.envelope(false)).unwrap();
        assert!(quiet.get("error").is_none());
        assert_eq!(quiet["message"], INTERNAL_SERVER_ERROR_MESSAGE);

        let loud = serde_json::to_value(err.envelope(true)).unwrap();
        assert_eq!(loud["error"]["detail"], "boom");
        assert_eq!(loud["status"], "error");
    }

    #[test]
    fn test_unique_violation_field() {
        assert_eq!(
            unique_violation_field("UNIQUE constraint failed: subjects.code, subjects.semester_id"),
            "code"
        );
        assert_eq!(
            unique_violation_field(
                "duplicate key value violates unique constraint \"users_email_key\" Key (email)=(a@b.c) already exists."
            ),
            "email"
        );
        assert_eq!(unique_violation_field("something else"), "field");
    }

    #[test]
    fn test_record_not_found_maps_to_404() {
        let err: TrackademyError = DbErr::RecordNotFound("exam".into()).into();
        assert_eq!(err.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Record not found.");
    }

    #[test]
    fn test_jwt_error_mapping() {
        let expired = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        let err: TrackademyError = expired.into();
        assert_eq!(err.message(), TOKEN_EXPIRED_MESSAGE);
        assert_eq!(err.http_status(), StatusCode::UNAUTHORIZED);

        let invalid =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidToken);
        let err: TrackademyError = invalid.into();
        assert_eq!(err.message(), TOKEN_INVALID_MESSAGE);
    }
}
