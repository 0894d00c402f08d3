//! 上传文件存储操作

use super::SeaOrmStorage;
use crate::entity::uploads::{ActiveModel, Entity as Uploads};
use crate::errors::{Result, SkillSparkError, classify_db_error};
use crate::models::files::entities::Upload;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    /// 记录上传文件
    pub async fn create_upload_impl(
        &self,
        token: &str,
        original_name: &str,
        file_size: i64,
        file_type: &str,
        owner_id: i64,
    ) -> Result<Upload> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            token: Set(token.to_string()),
            original_name: Set(original_name.to_string()),
            file_size: Set(file_size),
            file_type: Set(file_type.to_string()),
            owner_id: Set(owner_id),
            uploaded_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| classify_db_error("上传文件记录失败", e))?;

        Ok(result.into_upload())
    }

    /// 通过 token 获取文件
    pub async fn get_upload_by_token_impl(&self, token: &str) -> Result<Option<Upload>> {
        let result = Uploads::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| SkillSparkError::database_operation(format!("查询文件失败: {e}")))?;

        Ok(result.map(|m| m.into_upload()))
    }
}
