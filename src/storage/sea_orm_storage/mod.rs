//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod contents;
mod courses;
mod enrollments;
mod items;
mod messages;
mod modules;
mod subjects;
mod uploads;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, SkillSparkError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config.database.pool_size, config.database.timeout)
                .await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接保证所有查询看到同一个库
    pub async fn new_in_memory() -> Result<Self> {
        let db = Self::connect_sqlite("sqlite::memory:", 1, 5).await?;
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化，开启外键约束）
    async fn connect_sqlite(
        url: &str,
        pool_size: u32,
        timeout_secs: u64,
    ) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SkillSparkError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库不支持 WAL
        if !url.contains(":memory:") {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout_secs))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| {
                SkillSparkError::database_connection(format!("SQLite 连接失败: {e}"))
            })?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt).await.map_err(|e| {
            SkillSparkError::database_connection(format!("无法连接到数据库: {e}"))
        })
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SkillSparkError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    PaginationQuery,
    chat::{entities::ChatMessage, requests::ChatMessageQuery, responses::ChatMessageListResponse},
    contents::{
        entities::{Content, ContentKind, Item, ItemBody},
        responses::ContentDetail,
    },
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseListResponse, CourseSummary, SubjectWithCount},
    },
    files::entities::Upload,
    modules::{entities::Module, requests::ModuleFormsetPlan},
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, UpdateSubjectRequest},
        responses::{SubjectListResponse, SubjectSummary},
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学科模块
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(req).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_by_slug(&self, slug: &str) -> Result<Option<Subject>> {
        self.get_subject_by_slug_impl(slug).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    async fn list_subject_summaries_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subject_summaries_with_pagination_impl(query)
            .await
    }

    async fn get_subject_summary(&self, id: i64) -> Result<Option<SubjectSummary>> {
        self.get_subject_summary_impl(id).await
    }

    async fn list_subjects_with_counts(&self) -> Result<Vec<SubjectWithCount>> {
        self.list_subjects_with_counts_impl().await
    }

    // 课程模块
    async fn create_course(&self, owner_id: i64, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(owner_id, req).await
    }

    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(id).await
    }

    async fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>> {
        self.get_course_by_slug_impl(slug).await
    }

    async fn get_owned_course(&self, owner_id: i64, course_id: i64) -> Result<Option<Course>> {
        self.get_owned_course_impl(owner_id, course_id).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn list_course_summaries(&self, subject_id: Option<i64>) -> Result<Vec<CourseSummary>> {
        self.list_course_summaries_impl(subject_id).await
    }

    async fn update_course(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(id, update).await
    }

    async fn delete_course(&self, id: i64) -> Result<bool> {
        self.delete_course_impl(id).await
    }

    // 选课模块
    async fn enroll_student(&self, course_id: i64, user_id: i64) -> Result<bool> {
        self.enroll_student_impl(course_id, user_id).await
    }

    async fn is_enrolled(&self, course_id: i64, user_id: i64) -> Result<bool> {
        self.is_enrolled_impl(course_id, user_id).await
    }

    // 模块
    async fn get_module_by_id(&self, id: i64) -> Result<Option<Module>> {
        self.get_module_by_id_impl(id).await
    }

    async fn get_owned_module(&self, owner_id: i64, module_id: i64) -> Result<Option<Module>> {
        self.get_owned_module_impl(owner_id, module_id).await
    }

    async fn list_modules_by_course(&self, course_id: i64) -> Result<Vec<Module>> {
        self.list_modules_by_course_impl(course_id).await
    }

    async fn apply_module_formset(
        &self,
        course_id: i64,
        plan: ModuleFormsetPlan,
    ) -> Result<Vec<Module>> {
        self.apply_module_formset_impl(course_id, plan).await
    }

    async fn reorder_modules(&self, owner_id: i64, orders: &[(i64, i32)]) -> Result<u64> {
        self.reorder_modules_impl(owner_id, orders).await
    }

    // 模块内容
    async fn create_content(
        &self,
        module_id: i64,
        owner_id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<ContentDetail> {
        self.create_content_impl(module_id, owner_id, title, body)
            .await
    }

    async fn list_contents_by_module(&self, module_id: i64) -> Result<Vec<ContentDetail>> {
        self.list_contents_by_module_impl(module_id).await
    }

    async fn get_item(&self, kind: ContentKind, id: i64) -> Result<Option<Item>> {
        self.get_item_impl(kind, id).await
    }

    async fn update_item(
        &self,
        kind: ContentKind,
        id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<Option<Item>> {
        self.update_item_impl(kind, id, title, body).await
    }

    async fn get_owned_content(&self, owner_id: i64, content_id: i64) -> Result<Option<Content>> {
        self.get_owned_content_impl(owner_id, content_id).await
    }

    async fn delete_content(&self, content_id: i64) -> Result<bool> {
        self.delete_content_impl(content_id).await
    }

    async fn reorder_contents(&self, owner_id: i64, orders: &[(i64, i32)]) -> Result<u64> {
        self.reorder_contents_impl(owner_id, orders).await
    }

    // 文件模块
    async fn create_upload(
        &self,
        token: &str,
        original_name: &str,
        file_size: i64,
        file_type: &str,
        owner_id: i64,
    ) -> Result<Upload> {
        self.create_upload_impl(token, original_name, file_size, file_type, owner_id)
            .await
    }

    async fn get_upload_by_token(&self, token: &str) -> Result<Option<Upload>> {
        self.get_upload_by_token_impl(token).await
    }

    // 聊天消息
    async fn create_message(
        &self,
        user_id: i64,
        course_id: i64,
        content: &str,
        sent_on: chrono::DateTime<chrono::Utc>,
    ) -> Result<ChatMessage> {
        self.create_message_impl(user_id, course_id, content, sent_on)
            .await
    }

    async fn list_recent_messages(&self, course_id: i64, limit: u64) -> Result<Vec<ChatMessage>> {
        self.list_recent_messages_impl(course_id, limit).await
    }

    async fn list_messages_with_pagination(
        &self,
        query: ChatMessageQuery,
    ) -> Result<ChatMessageListResponse> {
        self.list_messages_with_pagination_impl(query).await
    }
}
