/*!
 * 基于角色的访问控制中间件
 *
 * 必须包在 RequireJWT 之内使用：
 *
 * ```rust,ignore
 * web::scope("/api/v1/manage")
 *     .wrap(RequireRole::new_any(UserRole::instructor_roles()))
 *     .wrap(RequireJWT)
 * ```
 *
 * actix 中后注册的 wrap 先执行，所以 RequireJWT 写在后面。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{
    ErrorCode,
    users::entities::{User, UserRole},
};

use super::create_error_response;

#[derive(Clone)]
pub struct RequireRole {
    allowed_roles: Rc<Vec<UserRole>>,
}

impl RequireRole {
    /// 只允许指定角色
    pub fn new(role: &UserRole) -> Self {
        Self {
            allowed_roles: Rc::new(vec![role.clone()]),
        }
    }

    /// 允许任一角色
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            allowed_roles: Rc::new(roles.iter().map(|r| (*r).clone()).collect()),
        }
    }

    fn allows(allowed: &[UserRole], role: &UserRole) -> bool {
        allowed.contains(role)
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
    allowed_roles: Rc<Vec<UserRole>>,
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
            let role = req.extensions().get::<User>().map(|u| (u.id, u.role.clone()));

            match role {
                Some((_, role)) if RequireRole::allows(&allowed_roles, &role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some((user_id, role)) => {
                    info!(
                        "Access denied for user {} (role: {}). Allowed roles: {:?}",
                        user_id, role, allowed_roles
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Access denied.",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Role check without authenticated user on {}", req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instructor_scope_admits_admin_not_student() {
        let guard = RequireRole::new_any(UserRole::instructor_roles());
        assert!(RequireRole::allows(&guard.allowed_roles, &UserRole::Instructor));
        assert!(RequireRole::allows(&guard.allowed_roles, &UserRole::Admin));
        assert!(!RequireRole::allows(&guard.allowed_roles, &UserRole::Student));
    }

    #[test]
    fn test_single_role() {
        let guard = RequireRole::new(&UserRole::Admin);
        assert!(RequireRole::allows(&guard.allowed_roles, &UserRole::Admin));
        assert!(!RequireRole::allows(&guard.allowed_roles, &UserRole::Instructor));
    }
}
