//! 学科存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::course_students::{Column as EnrollmentColumn, Entity as CourseStudents};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::subjects::{ActiveModel, Column, Entity as Subjects, Model};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::{
    PaginationInfo, PaginationQuery,
    courses::responses::SubjectWithCount,
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, UpdateSubjectRequest},
        responses::{SubjectListResponse, SubjectSummary},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

/// 热门课程数量
const POPULAR_COURSES: usize = 3;

impl SeaOrmStorage {
    pub async fn create_subject_impl(&self, req: CreateSubjectRequest) -> Result<Subject> {
        let model = ActiveModel {
            title: Set(req.title),
            slug: Set(req.slug),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| classify_db_error("创建学科失败", e))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询学科失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_slug_impl(&self, slug: &str) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询学科失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        let existing = self.get_subject_by_id_impl(id).await?;
        if existing.is_none() || (update.title.is_none() && update.slug.is_none()) {
            return Ok(existing);
        }

        let mut model = ActiveModel {
            id: Set(id),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(slug) = update.slug {
            model.slug = Set(slug);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| classify_db_error("更新学科失败", e))?;

        self.get_subject_by_id_impl(id).await
    }

    /// 删除学科，其下课程级联删除
    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| classify_db_error("删除学科失败", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 分页列出学科（按标题排序）
    pub async fn list_subject_summaries_with_pagination_impl(
        &self,
        query: PaginationQuery,
    ) -> Result<SubjectListResponse> {
        let (page, size) = query.normalized();

        let paginator = Subjects::find()
            .order_by_asc(Column::Title)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询学科总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询学科页数失败: {e}"))
        })?;
        let subjects = paginator.fetch_page(page - 1).await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询学科列表失败: {e}"))
        })?;

        let mut items = Vec::with_capacity(subjects.len());
        for subject in subjects {
            items.push(self.summarize_subject(subject).await?);
        }

        Ok(SubjectListResponse {
            items,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn get_subject_summary_impl(&self, id: i64) -> Result<Option<SubjectSummary>> {
        let subject = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询学科失败: {e}")))?;

        match subject {
            Some(subject) => Ok(Some(self.summarize_subject(subject).await?)),
            None => Ok(None),
        }
    }

    /// 全部学科及课程数（目录侧边栏）
    pub async fn list_subjects_with_counts_impl(&self) -> Result<Vec<SubjectWithCount>> {
        let subjects = Subjects::find()
            .order_by_asc(Column::Title)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询学科列表失败: {e}")))?;

        let counts: HashMap<i64, i64> = Courses::find()
            .select_only()
            .column(CourseColumn::SubjectId)
            .column_as(CourseColumn::Id.count(), "total")
            .group_by(CourseColumn::SubjectId)
            .into_tuple::<(i64, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("统计学科课程数失败: {e}")))?
            .into_iter()
            .collect();

        Ok(subjects
            .into_iter()
            .map(|m| {
                let total_courses = counts.get(&m.id).copied().unwrap_or(0);
                SubjectWithCount {
                    subject: m.into_subject(),
                    total_courses,
                }
            })
            .collect())
    }

    /// 课程总数与选课人数最多的三门课程
    async fn summarize_subject(&self, subject: Model) -> Result<SubjectSummary> {
        let courses: Vec<(i64, String)> = Courses::find()
            .filter(CourseColumn::SubjectId.eq(subject.id))
            .select_only()
            .column(CourseColumn::Id)
            .column(CourseColumn::Title)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询学科课程失败: {e}")))?;

        let course_ids: Vec<i64> = courses.iter().map(|(id, _)| *id).collect();
        let students: HashMap<i64, i64> = if course_ids.is_empty() {
            HashMap::new()
        } else {
            CourseStudents::find()
                .filter(EnrollmentColumn::CourseId.is_in(course_ids))
                .select_only()
                .column(EnrollmentColumn::CourseId)
                .column_as(EnrollmentColumn::Id.count(), "students")
                .group_by(EnrollmentColumn::CourseId)
                .into_tuple::<(i64, i64)>()
                .all(&self.db)
                .await
                .map_err(|e| {
                    SkillSparkError::database_operation(format!("统计选课人数失败: {e}"))
                })?
                .into_iter()
                .collect()
        };

        let total_courses = courses.len() as i64;
        let popular = rank_popular_courses(courses, &students, POPULAR_COURSES);

        Ok(SubjectSummary::new(
            subject.into_subject(),
            total_courses,
            &popular,
        ))
    }
}

/// 按选课人数降序、标题升序取前 `limit` 门课程
fn rank_popular_courses(
    courses: Vec<(i64, String)>,
    students: &HashMap<i64, i64>,
    limit: usize,
) -> Vec<(String, i64)> {
    let mut ranked: Vec<(String, i64)> = courses
        .into_iter()
        .map(|(id, title)| (title, students.get(&id).copied().unwrap_or(0)))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_popular_courses() {
        let courses = vec![
            (1, "Rust".to_string()),
            (2, "Django".to_string()),
            (3, "Go".to_string()),
            (4, "C".to_string()),
        ];
        let students = HashMap::from([(1, 3), (2, 12), (3, 3)]);
        assert_eq!(
            rank_popular_courses(courses, &students, 3),
            vec![
                ("Django".to_string(), 12),
                ("Go".to_string(), 3),
                ("Rust".to_string(), 3),
            ]
        );
    }
}
