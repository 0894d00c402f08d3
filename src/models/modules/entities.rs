use serde::{Deserialize, Serialize};

/// 课程模块，`order` 在所属课程内递增分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: String,
    pub order: i32,
}
