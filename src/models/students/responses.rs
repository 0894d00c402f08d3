use serde::{Deserialize, Serialize};

use crate::models::contents::responses::RenderedContent;
use crate::models::courses::entities::Course;
use crate::models::modules::entities::Module;

#[derive(Debug, Clone, Serialize)]
pub struct EnrollResponse {
    /// 选课后跳转的课程
    pub course_id: i64,
    /// 本次请求是否新建了选课记录
    pub created: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentModule {
    #[serde(flatten)]
    pub module: Module,
    pub contents: Vec<RenderedContent>,
}

/// 学生视角的课程详情
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCourseDetail {
    pub course: Course,
    pub modules: Vec<Module>,
    /// 当前选中的模块，课程没有模块时为空
    pub module: Option<StudentModule>,
}
