//! 模块内容存储操作

use super::SeaOrmStorage;
use crate::entity::contents::{ActiveModel, Column, Entity as Contents};
use crate::entity::courses::Column as CourseColumn;
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::contents::{
    entities::{Content, ItemBody},
    responses::ContentDetail,
};
use crate::storage::ordering::next_order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait, sea_query::Expr,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 创建条目并在模块末尾追加一条指向它的内容
    pub async fn create_content_impl(
        &self,
        module_id: i64,
        owner_id: i64,
        title: String,
        body: ItemBody,
    ) -> Result<ContentDetail> {
        let kind = body.kind();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("开启事务失败: {e}")))?;

        let item = Self::insert_item(&txn, owner_id, title, body).await?;
        let last = Self::max_content_order(&txn, module_id).await?;

        let content = ActiveModel {
            module_id: Set(module_id),
            content_type: Set(kind.to_string()),
            object_id: Set(item.id),
            sort_order: Set(next_order(last)),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| classify_db_error("创建内容失败", e))?;

        txn.commit()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("提交事务失败: {e}")))?;

        let content = content.into_content().ok_or_else(|| {
            SkillSparkError::database_operation(format!("未知的内容类型: {kind}"))
        })?;

        Ok(ContentDetail::new(content, item))
    }

    /// 模块的内容及条目，按序号排列；条目缺失的内容会被跳过
    pub async fn list_contents_by_module_impl(&self, module_id: i64) -> Result<Vec<ContentDetail>> {
        let rows = Contents::find()
            .filter(Column::ModuleId.eq(module_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询内容列表失败: {e}")))?;

        let contents: Vec<Content> = rows.into_iter().filter_map(|m| m.into_content()).collect();
        let mut items = Self::load_items(&self.db, &contents).await?;

        let mut details = Vec::with_capacity(contents.len());
        for content in contents {
            match items.remove(&(content.content_type, content.object_id)) {
                Some(item) => details.push(ContentDetail::new(content, item)),
                None => warn!(
                    "内容 {} 引用的 {} #{} 不存在",
                    content.id, content.content_type, content.object_id
                ),
            }
        }

        Ok(details)
    }

    pub async fn get_owned_content_impl(
        &self,
        owner_id: i64,
        content_id: i64,
    ) -> Result<Option<Content>> {
        let result = Contents::find_by_id(content_id)
            .join(
                JoinType::InnerJoin,
                crate::entity::contents::Relation::Module.def(),
            )
            .join(
                JoinType::InnerJoin,
                crate::entity::modules::Relation::Course.def(),
            )
            .filter(CourseColumn::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询内容失败: {e}")))?;

        Ok(result.and_then(|m| m.into_content()))
    }

    /// 删除内容：先删除条目，再删除内容行
    pub async fn delete_content_impl(&self, content_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("开启事务失败: {e}")))?;

        let row = Contents::find_by_id(content_id)
            .one(&txn)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询内容失败: {e}")))?;

        let Some(row) = row else {
            return Ok(false);
        };

        if let Some(content) = row.into_content() {
            Self::delete_item(&txn, content.content_type, content.object_id).await?;
        }

        let result = Contents::delete_by_id(content_id)
            .exec(&txn)
            .await
            .map_err(|e| classify_db_error("删除内容失败", e))?;

        txn.commit()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 批量调整内容序号，只作用于该讲师课程下的内容
    pub async fn reorder_contents_impl(
        &self,
        owner_id: i64,
        orders: &[(i64, i32)],
    ) -> Result<u64> {
        if orders.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("开启事务失败: {e}")))?;

        let module_ids = Self::owned_module_ids(&txn, owner_id).await?;
        if module_ids.is_empty() {
            return Ok(0);
        }

        let mut updated = 0;
        for (id, order) in orders {
            let result = Contents::update_many()
                .col_expr(Column::SortOrder, Expr::value(*order))
                .filter(Column::Id.eq(*id))
                .filter(Column::ModuleId.is_in(module_ids.clone()))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SkillSparkError::database_operation(format!("更新内容顺序失败: {e}"))
                })?;
            updated += result.rows_affected;
        }

        txn.commit()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    /// 模块内当前最大序号
    async fn max_content_order<C>(conn: &C, module_id: i64) -> Result<Option<i32>>
    where
        C: ConnectionTrait,
    {
        let max: Option<Option<i32>> = Contents::find()
            .filter(Column::ModuleId.eq(module_id))
            .select_only()
            .column_as(Column::SortOrder.max(), "max_order")
            .into_tuple()
            .one(conn)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询内容序号失败: {e}")))?;

        Ok(max.flatten())
    }
}
