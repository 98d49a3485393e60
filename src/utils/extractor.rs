//! 请求提取器
//!
//! - `SafeIdI64`：路径参数 `{id}`，必须是正整数
//! - `ValidatedJson` / `ValidatedQuery`：反序列化后立即执行 `Validate`
//! - `Identity`：JWT 中间件写入请求扩展的调用者身份

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use serde::de::DeserializeOwned;

use crate::errors::TrackademyError;
use crate::models::users::entities::Identity;
use crate::utils::validate::Validate;

pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication token is required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeIdI64(pub i64);

fn parse_path_id(req: &HttpRequest) -> Result<i64, TrackademyError> {
    let raw = req.match_info().get("id").unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(TrackademyError::bad_request(format!(
            "Invalid id '{raw}'. Expected a positive integer."
        ))),
    }
}

impl FromRequest for SafeIdI64 {
    type Error = TrackademyError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(parse_path_id(req).map(SafeIdI64))
    }
}

/// 通过校验的 JSON 请求体
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        Box::pin(async move {
            let value = json.await?.into_inner();
            value.validate()?;
            Ok(ValidatedJson(value))
        })
    }
}

/// 通过校验的查询参数
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T> ValidatedQuery<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedQuery<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = web::Query::<T>::from_query(req.query_string())
            .map_err(|e| crate::utils::query_error_handler(e, req))
            .and_then(|query| {
                let value = query.into_inner();
                value.validate()?;
                Ok(ValidatedQuery(value))
            });
        ready(result)
    }
}

impl FromRequest for Identity {
    type Error = TrackademyError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .copied()
                .ok_or_else(|| TrackademyError::unauthenticated(AUTH_REQUIRED_MESSAGE)),
        )
    }
}
