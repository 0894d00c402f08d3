//! 内容条目（文本 / 文件 / 图片 / 视频）存储操作
//!
//! 四张表结构相同，只有负载列不同。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::{files, images, texts, videos};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::contents::entities::{Content, ContentKind, Item, ItemBody};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};

impl SeaOrmStorage {
    pub async fn get_item_impl(&self, kind: ContentKind, id: i64) -> Result<Option<Item>> {
        Self::find_item(&self.db, kind, id).await
    }

    /// 更新条目标题与负载，负载类型必须与 kind 一致
    pub async fn update_item_impl(
        &self,
        kind: ContentKind,
        id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<Option<Item>> {
        if body.kind() != kind {
            return Err(SkillSparkError::validation(format!(
                "条目类型不匹配: {} / {}",
                kind,
                body.kind()
            )));
        }

        if Self::find_item(&self.db, kind, id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let result = match body {
            ItemBody::Text { content } => texts::ActiveModel {
                id: Set(id),
                title: Set(title),
                content: Set(content),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map(|m| m.into_item()),
            ItemBody::File { file } => files::ActiveModel {
                id: Set(id),
                title: Set(title),
                file: Set(file),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map(|m| m.into_item()),
            ItemBody::Image { file } => images::ActiveModel {
                id: Set(id),
                title: Set(title),
                file: Set(file),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map(|m| m.into_item()),
            ItemBody::Video { url } => videos::ActiveModel {
                id: Set(id),
                title: Set(title),
                url: Set(url),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .map(|m| m.into_item()),
        };

        result
            .map(Some)
            .map_err(|e| classify_db_error("更新内容条目失败", e))
    }

    pub(super) async fn find_item<C>(conn: &C, kind: ContentKind, id: i64) -> Result<Option<Item>>
    where
        C: ConnectionTrait,
    {
        let result = match kind {
            ContentKind::Text => texts::Entity::find_by_id(id)
                .one(conn)
                .await
                .map(|m| m.map(|m| m.into_item())),
            ContentKind::File => files::Entity::find_by_id(id)
                .one(conn)
                .await
                .map(|m| m.map(|m| m.into_item())),
            ContentKind::Image => images::Entity::find_by_id(id)
                .one(conn)
                .await
                .map(|m| m.map(|m| m.into_item())),
            ContentKind::Video => videos::Entity::find_by_id(id)
                .one(conn)
                .await
                .map(|m| m.map(|m| m.into_item())),
        };

        result.map_err(|e| SkillSparkError::database_operation(format!("查询内容条目失败: {e}")))
    }

    pub(super) async fn insert_item<C>(
        conn: &C,
        owner_id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<Item>
    where
        C: ConnectionTrait,
    {
        let now = chrono::Utc::now().timestamp();
        let result = match body {
            ItemBody::Text { content } => texts::ActiveModel {
                owner_id: Set(owner_id),
                title: Set(title),
                content: Set(content),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.into_item()),
            ItemBody::File { file } => files::ActiveModel {
                owner_id: Set(owner_id),
                title: Set(title),
                file: Set(file),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.into_item()),
            ItemBody::Image { file } => images::ActiveModel {
                owner_id: Set(owner_id),
                title: Set(title),
                file: Set(file),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.into_item()),
            ItemBody::Video { url } => videos::ActiveModel {
                owner_id: Set(owner_id),
                title: Set(title),
                url: Set(url),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map(|m| m.into_item()),
        };

        result.map_err(|e| classify_db_error("创建内容条目失败", e))
    }

    pub(super) async fn delete_item<C>(conn: &C, kind: ContentKind, id: i64) -> Result<u64>
    where
        C: ConnectionTrait,
    {
        let result = match kind {
            ContentKind::Text => texts::Entity::delete_by_id(id).exec(conn).await,
            ContentKind::File => files::Entity::delete_by_id(id).exec(conn).await,
            ContentKind::Image => images::Entity::delete_by_id(id).exec(conn).await,
            ContentKind::Video => videos::Entity::delete_by_id(id).exec(conn).await,
        };

        result
            .map(|r| r.rows_affected)
            .map_err(|e| classify_db_error("删除内容条目失败", e))
    }

    /// 按类型分组批量加载内容引用的条目
    pub(super) async fn load_items<C>(
        conn: &C,
        contents: &[Content],
    ) -> Result<HashMap<(ContentKind, i64), Item>>
    where
        C: ConnectionTrait,
    {
        let mut ids: HashMap<ContentKind, Vec<i64>> = HashMap::new();
        for content in contents {
            ids.entry(content.content_type)
                .or_default()
                .push(content.object_id);
        }

        let mut items = HashMap::new();
        for (kind, ids) in ids {
            let loaded: Vec<Item> = match kind {
                ContentKind::Text => texts::Entity::find()
                    .filter(texts::Column::Id.is_in(ids))
                    .all(conn)
                    .await
                    .map(|v| v.into_iter().map(|m| m.into_item()).collect::<Vec<_>>()),
                ContentKind::File => files::Entity::find()
                    .filter(files::Column::Id.is_in(ids))
                    .all(conn)
                    .await
                    .map(|v| v.into_iter().map(|m| m.into_item()).collect::<Vec<_>>()),
                ContentKind::Image => images::Entity::find()
                    .filter(images::Column::Id.is_in(ids))
                    .all(conn)
                    .await
                    .map(|v| v.into_iter().map(|m| m.into_item()).collect::<Vec<_>>()),
                ContentKind::Video => videos::Entity::find()
                    .filter(videos::Column::Id.is_in(ids))
                    .all(conn)
                    .await
                    .map(|v| v.into_iter().map(|m| m.into_item()).collect::<Vec<_>>()),
            }
            .map_err(|e| SkillSparkError::database_operation(format!("查询内容条目失败: {e}")))?;

            for item in loaded {
                items.insert((kind, item.id), item);
            }
        }

        Ok(items)
    }
}
