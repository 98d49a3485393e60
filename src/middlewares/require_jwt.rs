/*!
 * JWT 认证中间件
 *
 * 令牌由外部认证服务签发，这里只做校验并把调用者身份写入请求扩展。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/colleges")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_colleges))
 * ```
 *
 * 处理器通过 `Identity` 提取器拿到 `{ user_id, role }`。
 *
 * ## 认证流程
 *
 * 1. 读取 `Authorization: Bearer <JWT_TOKEN>`
 * 2. 校验签名、过期时间与 `token_type`
 * 3. 先查缓存 `identity:{userId}`，未命中再读库；账号不存在或已删除视为未认证
 * 4. 成功后把 `Identity` 放入请求扩展
 */

use std::{rc::Rc, sync::Arc};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, info};

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::errors::{Result, TOKEN_INVALID_MESSAGE, TrackademyError};
use crate::models::users::entities::Identity;
use crate::storage::Storage;
use crate::utils::extractor::AUTH_REQUIRED_MESSAGE;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 身份缓存键
pub fn identity_cache_key(user_id: i64) -> String {
    format!("identity:{user_id}")
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// 提取并验证 JWT，解析出调用者身份
async fn resolve_identity(req: &ServiceRequest) -> Result<Identity> {
    let token = bearer_token(req)
        .ok_or_else(|| TrackademyError::unauthenticated(AUTH_REQUIRED_MESSAGE))?;

    let claims = JwtUtils::verify_access_token(token).inspect_err(|err| {
        info!("JWT token validation failed: {}", err);
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| TrackademyError::unauthenticated(TOKEN_INVALID_MESSAGE))?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| TrackademyError::internal("Cache not found in app data"))?;

    let key = identity_cache_key(user_id);
    if let Some(identity) = cache.get_json::<Identity>(&key).await {
        debug!("Identity cache hit for user {}", user_id);
        return Ok(identity);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| TrackademyError::internal("Storage not found in app data"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await?
        .filter(|user| !user.is_deleted)
        .ok_or_else(|| {
            info!("Token subject {} has no active account", user_id);
            TrackademyError::unauthenticated(TOKEN_INVALID_MESSAGE)
        })?;

    // 角色以账号记录为准
    let identity = Identity {
        user_id: user.id,
        role: user.role,
    };
    cache
        .insert_json(key, &identity, AppConfig::get().cache.default_ttl)
        .await;

    Ok(identity)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(
                    req.into_response(HttpResponse::NoContent().finish().map_into_right_body())
                );
            }

            match resolve_identity(&req).await {
                Ok(identity) => {
                    debug!(
                        "JWT authentication successful for user {} ({})",
                        identity.user_id, identity.role
                    );
                    req.extensions_mut().insert(identity);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::create_cache;
    use crate::models::UserRole;
    use crate::models::users::requests::CreateUserRequest;
    use crate::storage::sea_orm_storage::SeaOrmStorage;
    use actix_web::{App, HttpResponse, test};

    async fn whoami(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().json(identity)
    }

    async fn setup() -> (Arc<dyn Storage>, Arc<dyn ObjectCache>, i64) {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let user = storage
            .create_user(CreateUserRequest {
                email: "admin@college.edu".into(),
                full_name: Some("Admin".into()),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        (storage, create_cache(), user.id)
    }

    macro_rules! app {
        ($storage:expr, $cache:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($storage.clone()))
                    .app_data(web::Data::new($cache.clone()))
                    .service(
                        web::scope("/me")
                            .wrap(RequireJWT)
                            .route("", web::get().to(whoami)),
                    ),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_header_is_rejected() {
        let (storage, cache, _) = setup().await;
        let app = app!(storage, cache);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/me").to_request()).await;
        assert_eq!(resp.status(), 401);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], AUTH_REQUIRED_MESSAGE);
    }

    #[actix_web::test]
    async fn test_valid_token_resolves_identity() {
        let (storage, cache, user_id) = setup().await;
        let app = app!(storage, cache);
        let token = JwtUtils::generate_access_token(user_id, "ADMIN").unwrap();

        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["userId"], user_id);
        assert_eq!(body["role"], "ADMIN");

        let cached = cache.get_json::<Identity>(&identity_cache_key(user_id)).await;
        assert_eq!(cached.map(|i| i.role), Some(UserRole::Admin));
    }

    #[actix_web::test]
    async fn test_expired_and_deleted() {
        let (storage, cache, user_id) = setup().await;
        let app = app!(storage, cache);

        let expired = JwtUtils::generate_token_with_expiry(
            user_id,
            "ADMIN",
            "access",
            chrono::Duration::minutes(-10),
        )
        .unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {expired}")))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["message"], crate::errors::TOKEN_EXPIRED_MESSAGE);

        storage.set_user_deleted(user_id, true).await.unwrap();
        let token = JwtUtils::generate_access_token(user_id, "ADMIN").unwrap();
        let req = test::TestRequest::get()
            .uri("/me")
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
