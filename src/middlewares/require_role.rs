/*!
 * 基于角色的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用，从请求扩展中读取 `Identity` 判断角色。
 *
 * ```rust,ignore
 * web::post()
 *     .to(create_college)
 *     .wrap(RequireRole::new(&UserRole::Admin))
 * ```
 *
 * 或者允许多个角色中的任一个：
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(UserRole::staff_roles()))
 * ```
 */

use std::rc::Rc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use crate::errors::TrackademyError;
use crate::models::UserRole;
use crate::models::users::entities::Identity;
use crate::utils::extractor::AUTH_REQUIRED_MESSAGE;

pub const PERMISSION_DENIED_MESSAGE: &str = "You do not have permission to perform this action.";

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 只允许单一角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed_roles: vec![*role],
        }
    }

    /// 允许任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: roles.iter().map(|r| **r).collect(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            allowed_roles: self.allowed_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    allowed_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let allowed_roles = self.allowed_roles.clone();

        Box::pin(async move {
            let identity = req.extensions().get::<Identity>().copied();

            let denied = match identity {
                Some(identity) if allowed_roles.contains(&identity.role) => None,
                Some(identity) => {
                    info!(
                        "Access denied for user {} (role: {}). Allowed roles: {:?}",
                        identity.user_id, identity.role, allowed_roles
                    );
                    Some(TrackademyError::forbidden(PERMISSION_DENIED_MESSAGE))
                }
                None => {
                    info!(
                        "Role check failed: no identity in request. Make sure RequireJWT is applied first."
                    );
                    Some(TrackademyError::unauthenticated(AUTH_REQUIRED_MESSAGE))
                }
            };

            match denied {
                None => Ok(srv.call(req).await?.map_into_left_body()),
                Some(err) => Ok(req.into_response(err.error_response().map_into_right_body())),
            }
        })
    }
}
