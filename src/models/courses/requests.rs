use serde::Deserialize;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourseRequest {
    pub subject_id: i64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub overview: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub subject_id: Option<i64>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub overview: Option<String>,
}

// 课程列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct CourseListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
}

// 课程列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct CourseListQuery {
    pub pagination: PaginationQuery,
    /// 只列出该讲师创建的课程
    pub owner_id: Option<i64>,
    pub subject_id: Option<i64>,
    /// 只列出该用户已选的课程
    pub student_id: Option<i64>,
}
