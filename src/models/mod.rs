//! 数据模型定义
//!
//! 每个业务模块按 `entities` / `requests` / `responses` 拆分。

pub mod auth;
pub mod chat;
pub mod common;
pub mod contents;
pub mod courses;
pub mod files;
pub mod modules;
pub mod students;
pub mod subjects;
pub mod users;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

use serde::Serialize;

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 按模块分段：1xxx 通用，2xxx 认证，3xxx 用户，4xxx 学科/课程，
/// 5xxx 模块/内容，6xxx 文件，7xxx 选课，8xxx 聊天。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    PasswordMismatch = 2002,

    // 用户
    UserNotFound = 3000,
    UserNameInvalid = 3001,
    UserEmailInvalid = 3002,
    UserPasswordInvalid = 3003,
    UserNameAlreadyExists = 3004,
    UserEmailAlreadyExists = 3005,
    UserUpdateFailed = 3006,
    UserDeleteFailed = 3007,
    CanNotDeleteCurrentUser = 3008,
    UserHasMessages = 3009,

    // 学科 / 课程
    SubjectNotFound = 4000,
    SubjectSlugInvalid = 4001,
    SubjectAlreadyExists = 4002,
    CourseNotFound = 4100,
    CourseSlugInvalid = 4101,
    CourseAlreadyExists = 4102,
    CourseCreationFailed = 4103,
    CourseHasMessages = 4104,

    // 模块 / 内容
    ModuleNotFound = 5000,
    ModuleFormsetInvalid = 5001,
    OrderInvalid = 5002,
    ContentNotFound = 5100,
    ContentTypeNotFound = 5101,
    ContentInvalid = 5102,

    // 文件
    FileNotFound = 6000,
    FileUploadFailed = 6001,
    FileTypeNotAllowed = 6002,
    FileSizeExceeded = 6003,
    MultifileUploadNotAllowed = 6004,

    // 选课
    NotEnrolled = 7000,
    EnrollFailed = 7001,

    // 聊天
    ChatAccessDenied = 8000,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Conflict as i32, 1009);
        assert_eq!(ErrorCode::CourseHasMessages as i32, 4104);
        assert_eq!(ErrorCode::ChatAccessDenied as i32, 8000);
    }
}
