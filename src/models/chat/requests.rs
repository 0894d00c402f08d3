use serde::Deserialize;

use crate::models::common::PaginationQuery;
use crate::models::common::pagination::deserialize_optional_i64;

// 消息列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct ChatMessageListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub course_id: Option<i64>,
    pub search: Option<String>,
}

// 消息列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct ChatMessageQuery {
    pub pagination: PaginationQuery,
    pub course_id: Option<i64>,
    pub search: Option<String>,
}

/// WebSocket 握手参数
#[derive(Debug, Deserialize)]
pub struct ChatSocketParams {
    pub token: String,
}
