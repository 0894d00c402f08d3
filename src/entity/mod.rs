//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod chat_messages;
pub mod contents;
pub mod course_students;
pub mod courses;
pub mod files;
pub mod images;
pub mod modules;
pub mod subjects;
pub mod texts;
pub mod uploads;
pub mod users;
pub mod videos;

use chrono::{DateTime, Utc};

/// 数据库中的秒级时间戳转为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
