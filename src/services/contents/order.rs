use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ContentService;
use crate::models::{
    ApiResponse, ErrorCode,
    modules::{
        requests::{OrderRequest, parse_order_request},
        responses::OrderSaved,
    },
};
use crate::services::{bad_request, current_user, internal_error};

pub async fn reorder_contents(
    service: &ContentService,
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
    match storage.reorder_contents(user.id, &pairs).await {
        Ok(updated) => {
            tracing::debug!("Reordered {} of {} contents", updated, pairs.len());
            Ok(HttpResponse::Ok().json(ApiResponse::success(OrderSaved::ok(), "Order saved")))
        }
        Err(e) => Ok(internal_error(
            ErrorCode::InternalServerError,
            "Failed to save content order",
            e,
        )),
    }
}
