//! 上传文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "uploads")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub original_name: String,
    pub file_size: i64,
    pub file_type: String,
    pub owner_id: i64,
    pub uploaded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_upload(self) -> crate::models::files::entities::Upload {
        crate::models::files::entities::Upload {
            token: self.token,
            original_name: self.original_name,
            file_size: self.file_size,
            file_type: self.file_type,
            owner_id: self.owner_id,
            uploaded_at: super::to_datetime(self.uploaded_at),
        }
    }
}
