use serde::{Deserialize, Serialize};

use super::entities::Course;
use crate::models::common::PaginatedResponse;
use crate::models::modules::entities::Module;
use crate::models::subjects::entities::Subject;

pub type CourseListResponse = PaginatedResponse<Course>;

/// 目录中的课程，附带模块数量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    #[serde(flatten)]
    pub course: Course,
    pub total_modules: i64,
}

/// 目录中的学科，附带课程数量
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectWithCount {
    #[serde(flatten)]
    pub subject: Subject,
    pub total_courses: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub subjects: Vec<SubjectWithCount>,
    pub subject: Option<Subject>,
    pub courses: Vec<CourseSummary>,
}

/// 公开课程详情
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetailResponse {
    pub course: Course,
    pub subject: Option<Subject>,
    pub owner: Option<String>,
    pub modules: Vec<Module>,
    /// 携带有效 token 时表示调用者是否已选该课程
    pub enrolled: bool,
}

// ==================== REST 只读接口 ====================

#[derive(Debug, Clone, Serialize)]
pub struct ApiModule {
    pub order: i32,
    pub title: String,
    pub description: String,
}

impl From<Module> for ApiModule {
    fn from(m: Module) -> Self {
        Self {
            order: m.order,
            title: m.title,
            description: m.description,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiCourse {
    pub id: i64,
    pub subject: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
    pub created: chrono::DateTime<chrono::Utc>,
    pub owner: i64,
    pub modules: Vec<ApiModule>,
}

impl ApiCourse {
    pub fn new(course: Course, modules: Vec<Module>) -> Self {
        Self {
            id: course.id,
            subject: course.subject_id,
            title: course.title,
            slug: course.slug,
            overview: course.overview,
            created: course.created_at,
            owner: course.owner_id,
            modules: modules.into_iter().map(ApiModule::from).collect(),
        }
    }
}

/// 内容及其渲染后的 HTML 片段
#[derive(Debug, Clone, Serialize)]
pub struct ApiContent {
    pub order: i32,
    pub item: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiModuleWithContents {
    pub order: i32,
    pub title: String,
    pub description: String,
    pub contents: Vec<ApiContent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiCourseWithContents {
    pub id: i64,
    pub subject: i64,
    pub title: String,
    pub slug: String,
    pub overview: String,
    pub created: chrono::DateTime<chrono::Utc>,
    pub owner: i64,
    pub modules: Vec<ApiModuleWithContents>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnrollResult {
    pub enrolled: bool,
}
