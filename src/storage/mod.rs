use std::sync::Arc;

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

use crate::errors::Result;

pub mod ordering;
pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 删除用户，被聊天消息引用时返回 ReferenceProtected
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 学科管理方法
    async fn create_subject(&self, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_slug(&self, slug: &str) -> Result<Option<Subject>>;
    async fn update_subject(&self, id: i64, update: UpdateSubjectRequest)
    -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;
    // 按标题排序，附带课程数与热门课程
    async fn list_subject_summaries_with_pagination(
        &self,
        query: PaginationQuery,
    ) -> Result<SubjectListResponse>;
    async fn get_subject_summary(&self, id: i64) -> Result<Option<SubjectSummary>>;
    // 全部学科及各自的课程数
    async fn list_subjects_with_counts(&self) -> Result<Vec<SubjectWithCount>>;

    /// 课程管理方法
    async fn create_course(&self, owner_id: i64, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course_by_id(&self, id: i64) -> Result<Option<Course>>;
    async fn get_course_by_slug(&self, slug: &str) -> Result<Option<Course>>;
    // 只返回属于该讲师的课程
    async fn get_owned_course(&self, owner_id: i64, course_id: i64) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    // 目录用：课程（新的在前）及模块数
    async fn list_course_summaries(&self, subject_id: Option<i64>) -> Result<Vec<CourseSummary>>;
    async fn update_course(&self, id: i64, update: UpdateCourseRequest)
    -> Result<Option<Course>>;
    // 删除课程，存在聊天消息时返回 ReferenceProtected
    async fn delete_course(&self, id: i64) -> Result<bool>;

    /// 选课方法
    // 返回是否新建了选课记录
    async fn enroll_student(&self, course_id: i64, user_id: i64) -> Result<bool>;
    async fn is_enrolled(&self, course_id: i64, user_id: i64) -> Result<bool>;

    /// 模块管理方法
    async fn get_module_by_id(&self, id: i64) -> Result<Option<Module>>;
    // 只返回所属课程属于该讲师的模块
    async fn get_owned_module(&self, owner_id: i64, module_id: i64) -> Result<Option<Module>>;
    async fn list_modules_by_course(&self, course_id: i64) -> Result<Vec<Module>>;
    // 在一个事务内执行表单集的增删改
    async fn apply_module_formset(
        &self,
        course_id: i64,
        plan: ModuleFormsetPlan,
    ) -> Result<Vec<Module>>;
    // 只更新属于该讲师的模块，返回更新的行数
    async fn reorder_modules(&self, owner_id: i64, orders: &[(i64, i32)]) -> Result<u64>;

    /// 模块内容方法
    // 创建条目及指向它的内容行
    async fn create_content(
        &self,
        module_id: i64,
        owner_id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<ContentDetail>;
    async fn list_contents_by_module(&self, module_id: i64) -> Result<Vec<ContentDetail>>;
    async fn get_item(&self, kind: ContentKind, id: i64) -> Result<Option<Item>>;
    async fn update_item(
        &self,
        kind: ContentKind,
        id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<Option<Item>>;
    // 只返回所属课程属于该讲师的内容
    async fn get_owned_content(&self, owner_id: i64, content_id: i64) -> Result<Option<Content>>;
    // 先删除条目再删除内容行
    async fn delete_content(&self, content_id: i64) -> Result<bool>;
    async fn reorder_contents(&self, owner_id: i64, orders: &[(i64, i32)]) -> Result<u64>;

    /// 文件管理方法
    async fn create_upload(
        &self,
        token: &str,
        original_name: &str,
        file_size: i64,
        file_type: &str,
        owner_id: i64,
    ) -> Result<Upload>;
    async fn get_upload_by_token(&self, token: &str) -> Result<Option<Upload>>;

    /// 聊天消息方法
    async fn create_message(
        &self,
        user_id: i64,
        course_id: i64,
        content: &str,
        sent_on: chrono::DateTime<chrono::Utc>,
    ) -> Result<ChatMessage>;
    // 最近的若干条消息，按时间正序
    async fn list_recent_messages(&self, course_id: i64, limit: u64) -> Result<Vec<ChatMessage>>;
    async fn list_messages_with_pagination(
        &self,
        query: ChatMessageQuery,
    ) -> Result<ChatMessageListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
