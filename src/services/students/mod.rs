//! 学生端：选课、已选课程与课程学习页

pub mod courses;
pub mod enroll;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::PaginationQuery;
use crate::models::students::requests::EnrollRequest;
use crate::storage::Storage;

/// 学习页缓存 15 分钟
pub const STUDENT_COURSE_CACHE_TTL: u64 = 15 * 60;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl StudentService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
        match &self.cache {
            Some(cache) => Ok(cache.clone()),
            None => super::cache_from_request(request),
        }
    }

    pub async fn enroll(
        &self,
        enroll_request: EnrollRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll(self, enroll_request, request).await
    }

    pub async fn list_enrolled_courses(
        &self,
        query: PaginationQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::list_enrolled_courses(self, query, request).await
    }

    pub async fn course_detail(
        &self,
        course_id: i64,
        module_id: Option<i64>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        courses::course_detail(self, course_id, module_id, request).await
    }
}
