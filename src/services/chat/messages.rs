use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ChatService;
use crate::models::{
    ApiResponse, ErrorCode,
    chat::requests::{ChatMessageListParams, ChatMessageQuery},
};
use crate::services::internal_error;

/// 管理员查看聊天记录，新的在前
pub async fn list_messages(
    service: &ChatService,
    params: ChatMessageListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let query = ChatMessageQuery {
        pagination: params.pagination,
        course_id: params.course_id,
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    match storage.list_messages_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Message list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to retrieve message list",
            e,
        )),
    }
}
