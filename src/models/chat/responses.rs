use serde::Serialize;

use super::entities::ChatMessage;
use crate::models::common::PaginatedResponse;
use crate::models::courses::entities::Course;

/// 聊天室页面数据：课程与最近的消息（按时间正序）
#[derive(Debug, Clone, Serialize)]
pub struct ChatRoomResponse {
    pub course: Course,
    pub messages: Vec<ChatMessage>,
}

pub type ChatMessageListResponse = PaginatedResponse<ChatMessage>;
