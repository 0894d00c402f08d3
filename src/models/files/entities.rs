use serde::{Deserialize, Serialize};

/// 已上传文件，文件内容保存在 `<upload_dir>/<token>.bin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Upload {
    // 文件的唯一标识符，同时作为下载 token
    pub token: String,
    // 原始文件名
    pub original_name: String,
    // 文件大小（以字节为单位）
    pub file_size: i64,
    // MIME 类型
    pub file_type: String,
    // 上传者
    pub owner_id: i64,
    // 上传时间
    pub uploaded_at: chrono::DateTime<chrono::Utc>,
}

impl Upload {
    pub fn is_image(&self) -> bool {
        self.file_type.starts_with("image/")
    }
}
