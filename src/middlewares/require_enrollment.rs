/*!
 * 选课检查中间件
 *
 * 必须包在 RequireJWT 之内，从路径参数 `course_id` 读取课程，
 * 当前用户已选该课程时放行；管理员直接放行。
 *
 * 未选课时的响应分两种：
 * - [`RequireEnrollment::forbidden`]：403，用于聊天室和 REST 内容接口；
 * - [`RequireEnrollment::hidden`]：404，学生端不暴露未选课程是否存在。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{ErrorCode, users::entities::User},
    storage::Storage,
    utils::extractor::parse_positive_i64,
};

use super::create_error_response;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Denial {
    Forbidden(ErrorCode),
    Hidden,
}

#[derive(Clone)]
pub struct RequireEnrollment {
    denial: Denial,
}

impl RequireEnrollment {
    /// 未选课返回 403 及指定错误码
    pub fn forbidden(code: ErrorCode) -> Self {
        Self {
            denial: Denial::Forbidden(code),
        }
    }

    /// 未选课返回 404
    pub fn hidden() -> Self {
        Self {
            denial: Denial::Hidden,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireEnrollment
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireEnrollmentMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireEnrollmentMiddleware {
            service: Rc::new(service),
            denial: self.denial,
        }))
    }
}

pub struct RequireEnrollmentMiddleware<S> {
    service: Rc<S>,
    denial: Denial,
}

impl<S, B> Service<ServiceRequest> for RequireEnrollmentMiddleware<S>
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
        let denial = self.denial;

        Box::pin(async move {
            let Some(user) = req.extensions().get::<User>().cloned() else {
                return Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                ));
            };

            let course_id = match parse_positive_i64(req.match_info().get("course_id")) {
                Ok(id) => id,
                Err(msg) => {
                    return Ok(req.into_response(
                        create_error_response(
                            StatusCode::BAD_REQUEST,
                            ErrorCode::BadRequest,
                            &format!("course_id: {msg}"),
                        )
                        .map_into_right_body(),
                    ));
                }
            };

            if user.is_admin() {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let enrolled = match req.app_data::<web::Data<Arc<dyn Storage>>>() {
                Some(storage) => match storage.is_enrolled(course_id, user.id).await {
                    Ok(enrolled) => enrolled,
                    Err(e) => {
                        error!("Failed to check enrollment: {}", e);
                        return Ok(req.into_response(
                            create_error_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                ErrorCode::InternalServerError,
                                "Failed to check enrollment",
                            )
                            .map_into_right_body(),
                        ));
                    }
                },
                None => false,
            };

            if enrolled {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            debug!("User {} is not enrolled in course {}", user.id, course_id);
            let response = match denial {
                Denial::Forbidden(code) => create_error_response(
                    StatusCode::FORBIDDEN,
                    code,
                    "You are not enrolled in this course",
                ),
                Denial::Hidden => create_error_response(
                    StatusCode::NOT_FOUND,
                    ErrorCode::CourseNotFound,
                    "Course not found",
                ),
            };
            Ok(req.into_response(response.map_into_right_body()))
        })
    }
}
