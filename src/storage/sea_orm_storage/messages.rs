//! 课程聊天消息存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::chat_messages::{ActiveModel, Column, Entity as ChatMessages, Model};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::{
    PaginationInfo,
    chat::{entities::ChatMessage, requests::ChatMessageQuery, responses::ChatMessageListResponse},
};
use crate::utils::contains_like;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 保存一条聊天消息
    pub async fn create_message_impl(
        &self,
        user_id: i64,
        course_id: i64,
        content: &str,
        sent_on: chrono::DateTime<chrono::Utc>,
    ) -> Result<ChatMessage> {
        let model = ActiveModel {
            user_id: Set(user_id),
            course_id: Set(course_id),
            content: Set(content.to_string()),
            sent_on: Set(sent_on.timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| classify_db_error("保存聊天消息失败", e))?;

        let mut messages = self.attach_usernames(vec![result]).await?;
        messages
            .pop()
            .ok_or_else(|| SkillSparkError::database_operation("保存聊天消息失败: 无返回记录"))
    }

    /// 课程最近的 `limit` 条消息，按时间正序返回
    pub async fn list_recent_messages_impl(
        &self,
        course_id: i64,
        limit: u64,
    ) -> Result<Vec<ChatMessage>> {
        let mut rows = ChatMessages::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_desc(Column::SentOn)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询聊天记录失败: {e}")))?;

        rows.reverse();
        self.attach_usernames(rows).await
    }

    /// 分页列出消息（新的在前）
    pub async fn list_messages_with_pagination_impl(
        &self,
        query: ChatMessageQuery,
    ) -> Result<ChatMessageListResponse> {
        let (page, size) = query.pagination.normalized();

        let mut select = ChatMessages::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Content.like(contains_like(search.trim())));
        }

        let paginator = select
            .order_by_desc(Column::SentOn)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator.num_items().await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询消息总数失败: {e}"))
        })?;
        let pages = paginator.num_pages().await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询消息页数失败: {e}"))
        })?;
        let rows = paginator.fetch_page(page - 1).await.map_err(|e| {
            SkillSparkError::database_operation(format!("查询消息列表失败: {e}"))
        })?;

        Ok(ChatMessageListResponse {
            items: self.attach_usernames(rows).await?,
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 批量查询发送者用户名
    async fn attach_usernames(&self, rows: Vec<Model>) -> Result<Vec<ChatMessage>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut user_ids: Vec<i64> = rows.iter().map(|m| m.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let names: HashMap<i64, String> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .select_only()
            .column(UserColumn::Id)
            .column(UserColumn::Username)
            .into_tuple::<(i64, String)>()
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询消息发送者失败: {e}")))?
            .into_iter()
            .collect();

        Ok(rows
            .into_iter()
            .map(|m| {
                let username = names.get(&m.user_id).cloned().unwrap_or_default();
                m.into_chat_message(username)
            })
            .collect())
    }
}
