use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::services::{bad_request, internal_error};
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_password_simple, validate_username};

use super::AuthService;
use super::login::issue_tokens;

/// 学生自助注册，成功后直接登录
pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let username = register_request.username.trim().to_string();
    let email = register_request.email.trim().to_string();

    if let Err(msg) = validate_username(&username) {
        return Ok(bad_request(ErrorCode::UserNameInvalid, msg));
    }
    if let Err(msg) = validate_email(&email) {
        return Ok(bad_request(ErrorCode::UserEmailInvalid, msg));
    }
    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(bad_request(ErrorCode::UserPasswordInvalid, msg));
    }
    if register_request.password != register_request.password_confirm {
        return Ok(bad_request(
            ErrorCode::PasswordMismatch,
            "Passwords don't match",
        ));
    }

    let storage = service.get_storage(request)?;

    if let Err(response) = check_username_exists(&storage, &username).await {
        return Ok(response);
    }
    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(internal_error(
                ErrorCode::RegisterFailed,
                "Password hashing failed",
                e,
            ));
        }
    };

    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::Student,
        display_name: register_request
            .display_name
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
    };

    match storage.create_user(create_request).await {
        Ok(user) => {
            tracing::info!("Student {} registered", user.username);
            Ok(issue_tokens(
                user,
                false,
                StatusCode::CREATED,
                "Registration successful",
            ))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            "Username or email already exists",
        ))),
        Err(e) => Ok(internal_error(ErrorCode::RegisterFailed, "Register failed", e)),
    }
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(internal_error(ErrorCode::RegisterFailed, "Register failed", e)),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(internal_error(ErrorCode::RegisterFailed, "Register failed", e)),
    }
}
