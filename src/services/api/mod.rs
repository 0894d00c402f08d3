//! 只读 REST 接口（外加选课）

pub mod courses;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::courses::requests::CourseListParams;
use crate::storage::Storage;

pub struct ApiService {
    storage: Option<Arc<dyn Storage>>,
}

impl ApiService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_courses(
        &self,
        params: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_courses(self, params, request).await
    }

    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::get_course(self, course_id, request).await
    }

    pub async fn enroll(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        courses::enroll(self, course_id, request).await
    }

    pub async fn course_contents(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::course_contents(self, course_id, request).await
    }
}
