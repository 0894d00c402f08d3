//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_skillspark_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SkillSparkError {
            $($variant(String),)*
        }

        impl SkillSparkError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(SkillSparkError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SkillSparkError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(SkillSparkError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl SkillSparkError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SkillSparkError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_skillspark_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Conflict Error"),
    ReferenceProtected("E014", "Protected Reference Error"),
}

impl SkillSparkError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, SkillSparkError::Conflict(_))
    }

    /// 是否因被聊天消息等记录引用而禁止删除
    pub fn is_reference_protected(&self) -> bool {
        matches!(self, SkillSparkError::ReferenceProtected(_))
    }
}

impl fmt::Display for SkillSparkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for SkillSparkError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SkillSparkError {
    fn from(err: sea_orm::DbErr) -> Self {
        SkillSparkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for SkillSparkError {
    fn from(err: std::io::Error) -> Self {
        SkillSparkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SkillSparkError {
    fn from(err: serde_json::Error) -> Self {
        SkillSparkError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for SkillSparkError {
    fn from(err: chrono::ParseError) -> Self {
        SkillSparkError::DateParse(err.to_string())
    }
}

/// 根据数据库返回的错误文本归类约束错误
///
/// SQLite / PostgreSQL / MySQL 的措辞不同，这里只做关键字匹配。
pub fn classify_db_error(context: &str, err: sea_orm::DbErr) -> SkillSparkError {
    let text = err.to_string();
    let lower = text.to_lowercase();
    if lower.contains("unique constraint")
        || lower.contains("duplicate key")
        || lower.contains("duplicate entry")
    {
        SkillSparkError::conflict(format!("{context}: {text}"))
    } else if lower.contains("foreign key constraint")
        || lower.contains("violates foreign key")
        || lower.contains("a foreign key constraint fails")
    {
        SkillSparkError::reference_protected(format!("{context}: {text}"))
    } else {
        SkillSparkError::database_operation(format!("{context}: {text}"))
    }
}

pub type Result<T> = std::result::Result<T, SkillSparkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SkillSparkError::cache_connection("test").code(), "E001");
        assert_eq!(SkillSparkError::database_config("test").code(), "E003");
        assert_eq!(SkillSparkError::validation("test").code(), "E007");
        assert_eq!(SkillSparkError::authentication("test").code(), "E011");
        assert_eq!(SkillSparkError::reference_protected("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            SkillSparkError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            SkillSparkError::conflict("test").error_type(),
            "Conflict Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = SkillSparkError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = SkillSparkError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_classify_db_error() {
        let unique = classify_db_error(
            "create course",
            sea_orm::DbErr::Custom("UNIQUE constraint failed: courses.slug".into()),
        );
        assert!(unique.is_conflict());

        let fk = classify_db_error(
            "delete course",
            sea_orm::DbErr::Custom("FOREIGN KEY constraint failed".into()),
        );
        assert!(fk.is_reference_protected());

        let other = classify_db_error("query", sea_orm::DbErr::Custom("timeout".into()));
        assert_eq!(other.code(), "E005");
        assert!(other.message().starts_with("query"));
    }
}
