use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::header::{self, ContentDisposition, DispositionParam, DispositionType},
    web,
};

use super::{FileService, stored_file_path};
use crate::errors::SkillSparkError;
use crate::models::ErrorCode;
use crate::services::{internal_error, not_found};

pub async fn handle_download(
    service: &FileService,
    request: &HttpRequest,
    file_token: String,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let upload = match storage.get_upload_by_token(&file_token).await {
        Ok(Some(upload)) => upload,
        Ok(None) => return Ok(not_found(ErrorCode::FileNotFound, "File not found")),
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "File query failed",
                e,
            ));
        }
    };

    let path = stored_file_path(&upload.token);
    if !path.exists() {
        tracing::warn!("Upload {} has no file on disk", upload.token);
        return Ok(not_found(ErrorCode::FileNotFound, "File not found"));
    }

    let data = match web::block(move || std::fs::read(path)).await? {
        Ok(data) => data,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::InternalServerError,
                "File read failed",
                SkillSparkError::file_operation(e.to_string()),
            ));
        }
    };

    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, upload.file_type.as_str()))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(upload.original_name)],
        })
        .body(data))
}
