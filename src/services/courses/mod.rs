//! 讲师课程管理
//!
//! 所有查询都带上 `owner_id = 当前用户`，别人的课程一律视为不存在。

pub mod formset;
pub mod manage;
pub mod order;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::PaginationQuery;
use crate::models::courses::requests::{CreateCourseRequest, UpdateCourseRequest};
use crate::models::modules::requests::{ModuleFormEntry, OrderRequest};
use crate::storage::Storage;

/// 课程 / 模块标题最大长度
pub const COURSE_TITLE_MAX_LEN: usize = 200;

pub struct CourseService {
    storage: Option<Arc<dyn Storage>>,
}

impl CourseService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_own_courses(
        &self,
        query: PaginationQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_own_courses(self, query, request).await
    }

    pub async fn create_course(
        &self,
        create_request: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::create_course(self, create_request, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update_request: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::update_course(self, course_id, update_request, request).await
    }

    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::delete_course(self, course_id, request).await
    }

    pub async fn get_module_formset(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        formset::get_module_formset(self, course_id, request).await
    }

    pub async fn save_module_formset(
        &self,
        course_id: i64,
        forms: Vec<ModuleFormEntry>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        formset::save_module_formset(self, course_id, forms, request).await
    }

    pub async fn reorder_modules(
        &self,
        orders: OrderRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        order::reorder_modules(self, orders, request).await
    }
}
