use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::{
    ApiResponse, ErrorCode,
    modules::{
        requests::{OrderRequest, parse_order_request},
        responses::OrderSaved,
    },
};
use crate::services::{bad_request, current_user, internal_error};

/// 调整模块顺序，不属于当前讲师的模块被忽略
pub async fn reorder_modules(
    service: &CourseService,
    orders: OrderRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request)?;

    let pairs = match parse_order_request(&orders) {
        Ok(pairs) => pairs,
        Err(message) => return Ok(bad_request(ErrorCode::OrderInvalid, message)),
    };
    match storage.reorder_modules(user.id, &pairs).await {
        Ok(updated) => {
            tracing::debug!("Reordered {} of {} modules", updated, pairs.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(OrderSaved::ok(), "Order saved")))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to save module order",
            e,
        )),
    }
}
