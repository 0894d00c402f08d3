//! 模块内容实体
//!
//! `content_type` + `object_id` 指向 texts / files / images / videos 之一。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contents")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub module_id: i64,
    pub content_type: String,
    pub object_id: i64,
    pub sort_order: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::modules::Entity",
        from = "Column::ModuleId",
        to = "super::modules::Column::Id"
    )]
    Module,
}

impl Related<super::modules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Module.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 类型字段无法识别时返回 None
    pub fn into_content(self) -> Option<crate::models::contents::entities::Content> {
        use crate::models::contents::entities::{Content, ContentKind};

        let content_type = self.content_type.parse::<ContentKind>().ok()?;
        Some(Content {
            id: self.id,
            module_id: self.module_id,
            content_type,
            object_id: self.object_id,
            order: self.sort_order,
        })
    }
}
