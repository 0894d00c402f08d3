//! 课程存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::chat_messages::{Column as MessageColumn, Entity as ChatMessages};
use crate::entity::course_students::{Column as EnrollmentColumn, Entity as CourseStudents};
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::modules::{Column as ModuleColumn, Entity as Modules};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::{CourseListResponse, CourseSummary},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(
        &self,
        owner_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            owner_id: Set(owner_id),
            subject_id: Set(req.subject_id),
            title: Set(req.title),
            slug: Set(req.slug),
            overview: Set(req.overview),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| classify_db_error("创建课程失败", e))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_slug_impl(&self, slug: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_owned_course_impl(
        &self,
        owner_id: i64,
        course_id: i64,
    ) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .filter(Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程（新的在前）
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = Courses::find();

        if let Some(owner_id) = query.owner_id {
            select = select.filter(Column::OwnerId.eq(owner_id));
        }

        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        // 已选课程
        if let Some(student_id) = query.student_id {
            let course_ids: Vec<i64> = CourseStudents::find()
                .filter(EnrollmentColumn::UserId.eq(student_id))
                .select_only()
                .column(EnrollmentColumn::CourseId)
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SkillSparkError::database_operation(format!("查询选课记录失败: {e}"))
                })?;
            select = select.filter(Column::Id.is_in(course_ids));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询课程总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询课程页数失败: {e}"))
        })?;
        let courses = paginator.fetch_page(page - 1).await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询课程列表失败: {e}"))
        })?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 目录课程列表，附带模块数
    pub async fn list_course_summaries_impl(
        &self,
        subject_id: Option<i64>,
    ) -> Result<Vec<CourseSummary>> {
        let mut select = Courses::find();
        if let Some(subject_id) = subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }

        let courses = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询课程列表失败: {e}")))?;

        if courses.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = courses.iter().map(|c| c.id).collect();
        let module_counts: HashMap<i64, i64> = Modules::find()
            .filter(ModuleColumn::CourseId.is_in(course_ids))
            .select_only()
            .column(ModuleColumn::CourseId)
            .column_as(ModuleColumn::Id.count(), "total")
            .group_by(ModuleColumn::CourseId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("统计课程模块数失败: {e}")))?
            .into_iter()
            .collect();

        Ok(courses
            .into_iter()
            .map(|m| {
                let total_modules = module_counts.get(&m.id).copied().unwrap_or(0);
                CourseSummary {
                    course: m.into_course(),
                    total_modules,
                }
            })
            .collect())
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let existing = self.get_course_by_id_impl(id).await?;
        if existing.is_none()
            || (update.subject_id.is_none()
                && update.title.is_none()
                && update.slug.is_none()
                && update.overview.is_none())
        {
            return Ok(existing);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(subject_id) = update.subject_id {
            model.subject_id = Set(subject_id);
        }

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(slug) = update.slug {
            model.slug = Set(slug);
        }

        if let Some(overview) = update.overview {
            model.overview = Set(overview);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| classify_db_error("更新课程失败", e))?;

        self.get_course_by_id_impl(id).await
    }

    /// 删除课程，模块与选课记录级联删除；存在聊天消息时拒绝
    pub async fn delete_course_impl(&self, id: i64) -> Result<bool> {
        let messages = ChatMessages::find()
            .filter(MessageColumn::CourseId.eq(id))
            .count(&self.db)
            .await
            .map_err(|e| {
                SkillSparkError::database_operation(format!("统计课程消息失败: {e}"))
            })?;

        if messages > 0 {
            return Err(SkillSparkError::reference_protected(format!(
                "课程 {id} 仍被 {messages} 条聊天消息引用"
            )));
        }

        let result = Courses::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error("删除课程失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 讲师拥有的全部课程 ID
    pub(super) async fn owned_course_ids<C>(conn: &C, owner_id: i64) -> Result<Vec<i64>>
    where
        C: sea_orm::ConnectionTrait,
    {
        Courses::find()
            .filter(Column::OwnerId.eq(owner_id))
            .select_only()
            .column(Column::Id)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询讲师课程失败: {e}")))
    }
}
