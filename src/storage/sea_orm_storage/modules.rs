//! 课程模块存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::modules::{ActiveModel, Column, Entity as Modules};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::modules::{
    entities::Module,
    requests::{ModuleFormsetPlan, NewModule},
};
use crate::storage::ordering::resolve_order;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建模块，未指定序号时追加到课程末尾；取最大序号和插入在同一事务内
    pub async fn create_module_impl(&self, module: NewModule) -> Result<Module> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("开启事务失败: {e}")))?;

        let last = Self::max_module_order(&txn, module.course_id).await?;
        let created = Self::insert_module(&txn, module, last).await?;

        txn.commit()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(created)
    }

    pub async fn get_module_by_id_impl(&self, id: i64) -> Result<Option<Module>> {
        let result = Modules::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询模块失败: {e}")))?;

        Ok(result.map(|m| m.into_module()))
    }

    pub async fn get_owned_module_impl(
        &self,
        owner_id: i64,
        module_id: i64,
    ) -> Result<Option<Module>> {
        let result = Modules::find_by_id(module_id)
            .inner_join(Courses)
            .filter(CourseColumn::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询模块失败: {e}")))?;

        Ok(result.map(|m| m.into_module()))
    }

    /// 课程的模块，按序号排列
    pub async fn list_modules_by_course_impl(&self, course_id: i64) -> Result<Vec<Module>> {
        let modules = Modules::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询模块列表失败: {e}")))?;

        Ok(modules.into_iter().map(|m| m.into_module()).collect())
    }

    /// 保存模块表单集：删除、更新、按序追加新模块，全部在一个事务内完成
    pub async fn apply_module_formset_impl(
        &self,
        course_id: i64,
        plan: ModuleFormsetPlan,
    ) -> Result<Vec<Module>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("开启事务失败: {e}")))?;

        if !plan.deletes.is_empty() {
            Modules::delete_many()
                .filter(Column::CourseId.eq(course_id))
                .filter(Column::Id.is_in(plan.deletes))
                .exec(&txn)
                .await
                .map_err(|e| classify_db_error("删除模块失败", e))?;
        }

        for (id, title, description) in plan.updates {
            Modules::update_many()
                .col_expr(Column::Title, Expr::value(title))
                .col_expr(Column::Description, Expr::value(description))
                .filter(Column::CourseId.eq(course_id))
                .filter(Column::Id.eq(id))
                .exec(&txn)
                .await
                .map_err(|e| classify_db_error("更新模块失败", e))?;
        }

        if !plan.creates.is_empty() {
            let mut last = Self::max_module_order(&txn, course_id).await?;
            for (title, description, order) in plan.creates {
                let module = NewModule {
                    course_id,
                    title,
                    description,
                    order,
                };
                let created = Self::insert_module(&txn, module, last).await?;
                last = Some(last.map_or(created.order, |max| max.max(created.order)));
            }
        }

        txn.commit()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("提交事务失败: {e}")))?;

        self.list_modules_by_course_impl(course_id).await
    }

    /// 批量调整模块序号，只作用于该讲师课程下的模块
    pub async fn reorder_modules_impl(&self, owner_id: i64, orders: &[(i64, i32)]) -> Result<u64> {
        if orders.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("开启事务失败: {e}")))?;

        let course_ids = Self::owned_course_ids(&txn, owner_id).await?;
        if course_ids.is_empty() {
            return Ok(0);
        }

        let mut updated = 0;
        for (id, order) in orders {
            let result = Modules::update_many()
                .col_expr(Column::SortOrder, Expr::value(*order))
                .filter(Column::Id.eq(*id))
                .filter(Column::CourseId.is_in(course_ids.clone()))
                .exec(&txn)
                .await
                .map_err(|e| {
                    SkillSparkError::database_operation(format!("更新模块顺序失败: {e}"))
                })?;
            updated += result.rows_affected;
        }

        txn.commit()
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(updated)
    }

    async fn insert_module<C>(conn: &C, module: NewModule, last: Option<i32>) -> Result<Module>
    where
        C: ConnectionTrait,
    {
        let model = ActiveModel {
            course_id: Set(module.course_id),
            title: Set(module.title),
            description: Set(module.description),
            sort_order: Set(resolve_order(module.order, last)),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| classify_db_error("创建模块失败", e))?;

        Ok(model.into_module())
    }

    /// 课程内当前最大序号
    async fn max_module_order<C>(conn: &C, course_id: i64) -> Result<Option<i32>>
    where
        C: ConnectionTrait,
    {
        let max: Option<Option<i32>> = Modules::find()
            .filter(Column::CourseId.eq(course_id))
            .select_only()
            .column_as(Column::SortOrder.max(), "max_order")
            .into_tuple()
            .one(conn)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询模块序号失败: {e}")))?;

        Ok(max.flatten())
    }

    /// 讲师课程下的全部模块 ID
    pub(super) async fn owned_module_ids<C>(conn: &C, owner_id: i64) -> Result<Vec<i64>>
    where
        C: ConnectionTrait,
    {
        let course_ids = Self::owned_course_ids(conn, owner_id).await?;
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        Modules::find()
            .filter(Column::CourseId.is_in(course_ids))
            .select_only()
            .column(Column::Id)
            .into_tuple()
            .all(conn)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询讲师模块失败: {e}")))
    }
}
