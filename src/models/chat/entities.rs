use serde::{Deserialize, Serialize};

/// 课程聊天消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub course_id: i64,
    pub content: String,
    pub sent_on: chrono::DateTime<chrono::Utc>,
}
