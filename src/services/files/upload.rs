use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::{StreamExt, TryStreamExt};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use super::{FileService, stored_file_path};
use crate::config::AppConfig;
use crate::errors::SkillSparkError;
use crate::models::{ApiResponse, ErrorCode, files::responses::FileUploadResponse};
use crate::services::{bad_request, current_user, internal_error};
use crate::utils::sniff_mime_type;

/// 接收单个 `file` 字段：扩展名白名单、文件头嗅探、大小限制
pub async fn handle_upload(
    service: &FileService,
    req: &HttpRequest,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let user = match current_user(req) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    let config = AppConfig::get();
    let upload_dir = &config.upload.dir;
    let max_size = config.upload.max_size;

    if !Path::new(upload_dir).exists()
        && let Err(e) = fs::create_dir_all(upload_dir)
    {
        return Ok(internal_error(
            ErrorCode::FileUploadFailed,
            "Failed to create upload directory",
            SkillSparkError::file_operation(e.to_string()),
        ));
    }

    let token = Uuid::new_v4().to_string();
    let file_path = stored_file_path(&token);

    let mut original_name = String::new();
    let mut file_type = "";
    let mut file_size: usize = 0;
    let mut file_uploaded = false;

    while let Ok(Some(mut field)) = payload.try_next().await {
        let content_disposition = field.content_disposition();
        let name = content_disposition
            .and_then(|cd| cd.get_name())
            .unwrap_or_default()
            .to_string();

        if name != "file" {
            continue;
        }
        if file_uploaded {
            let _ = fs::remove_file(&file_path);
            return Ok(bad_request(
                ErrorCode::MultifileUploadNotAllowed,
                "Only one file can be uploaded at a time",
            ));
        }
        file_uploaded = true;

        original_name = content_disposition
            .and_then(|cd| cd.get_filename())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let extension = Path::new(&original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_lowercase()))
            .unwrap_or_default();

        if !config
            .upload
            .allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&extension))
        {
            return Ok(bad_request(
                ErrorCode::FileTypeNotAllowed,
                "File type not allowed",
            ));
        }

        let mut file = match File::create(&file_path) {
            Ok(file) => file,
            Err(e) => {
                return Ok(internal_error(
                    ErrorCode::FileUploadFailed,
                    "Failed to create file",
                    SkillSparkError::file_operation(e.to_string()),
                ));
            }
        };

        while let Some(chunk) = field.next().await {
            let data = chunk?;

            // 首个分块决定文件类型
            if file_size == 0 {
                match sniff_mime_type(&data, &extension) {
                    Some(mime) => file_type = mime,
                    None => {
                        let _ = fs::remove_file(&file_path);
                        return Ok(bad_request(
                            ErrorCode::FileTypeNotAllowed,
                            "File content does not match its extension",
                        ));
                    }
                }
            }

            file_size += data.len();
            if file_size > max_size {
                let _ = fs::remove_file(&file_path);
                return Ok(bad_request(
                    ErrorCode::FileSizeExceeded,
                    "File size exceeds the limit",
                ));
            }
            file.write_all(&data)?;
        }

        if file_size == 0 {
            let _ = fs::remove_file(&file_path);
            return Ok(bad_request(ErrorCode::FileUploadFailed, "File is empty"));
        }
    }

    if !file_uploaded {
        return Ok(bad_request(
            ErrorCode::FileNotFound,
            "No file found in upload payload",
        ));
    }

    let storage = service.get_storage(req)?;

    match storage
        .create_upload(
            &token,
            &original_name,
            file_size as i64,
            file_type,
            user.id,
        )
        .await
    {
        Ok(upload) => Ok(HttpResponse::Created().json(ApiResponse::success(
            FileUploadResponse {
                token: upload.token,
                file_name: upload.original_name,
                size: upload.file_size,
                content_type: upload.file_type,
                uploaded_at: upload.uploaded_at,
            },
            "File uploaded successfully",
        ))),
        Err(e) => {
            let _ = fs::remove_file(&file_path);
            Ok(internal_error(
                ErrorCode::FileUploadFailed,
                "Failed to save upload",
                e,
            ))
        }
    }
}
