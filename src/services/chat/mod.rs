pub mod messages;
pub mod room;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::models::chat::requests::{ChatMessageListParams, ChatSocketParams};
use crate::storage::Storage;

pub struct ChatService {
    storage: Option<Arc<dyn Storage>>,
    cache: Option<Arc<dyn ObjectCache>>,
}

impl ChatService {
    pub fn new_lazy() -> Self {
        Self {
            storage: None,
            cache: None,
        }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
        match &self.cache {
            Some(cache) => Ok(cache.clone()),
            None => super::cache_from_request(request),
        }
    }

    pub async fn chat_room(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        room::chat_room(self, course_id, request).await
    }

    pub async fn connect(
        &self,
        course_id: i64,
        params: ChatSocketParams,
        request: &HttpRequest,
        stream: web::Payload,
    ) -> ActixResult<HttpResponse> {
        room::connect(self, course_id, params, request, stream).await
    }

    pub async fn list_messages(
        &self,
        params: ChatMessageListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        messages::list_messages(self, params, request).await
    }
}
