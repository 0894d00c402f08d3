//! 选课存储操作

use super::SeaOrmStorage;
use crate::entity::course_students::{ActiveModel, Column, Entity as CourseStudents};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use tracing::debug;

impl SeaOrmStorage {
    /// 选课，重复选课不报错
    pub async fn enroll_student_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        if self.is_enrolled_impl(course_id, user_id).await? {
            return Ok(false);
        }

        let model = ActiveModel {
            course_id: Set(course_id),
            user_id: Set(user_id),
            enrolled_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) => {
                let err = classify_db_error("选课失败", e);
                // 并发请求撞上唯一索引，视为已选
                if err.is_conflict() {
                    debug!("用户 {} 已选课程 {}", user_id, course_id);
                    Ok(false)
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn is_enrolled_impl(&self, course_id: i64, user_id: i64) -> Result<bool> {
        let count = CourseStudents::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }
}
