use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode};

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::{User, UserStatus},
};
use crate::services::internal_error;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => return Ok(internal_error(ErrorCode::InternalServerError, "Login failed", e)),
    };

    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(auth_failed());
    }

    if user.status != UserStatus::Active {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Account is not active",
        )));
    }

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.id, e);
    }

    tracing::info!("User {} logged in successfully", user.username);
    Ok(issue_tokens(
        user,
        login_request.remember_me,
        StatusCode::OK,
        "Login successful",
    ))
}

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

/// 生成令牌对：access token 放在响应体，refresh token 写入 HttpOnly cookie
pub(super) fn issue_tokens(
    user: User,
    remember_me: bool,
    status: StatusCode,
    message: &str,
) -> HttpResponse {
    let config = AppConfig::get();
    let refresh_expiry =
        remember_me.then(|| chrono::Duration::days(config.jwt.refresh_token_remember_me_expiry));

    match user.generate_token_pair(refresh_expiry) {
        Ok(token_pair) => {
            let response = LoginResponse {
                access_token: token_pair.access_token,
                expires_in: config.jwt.access_token_expiry * 60,
                user,
                created_at: chrono::Utc::now(),
            };
            HttpResponse::build(status)
                .cookie(JwtUtils::create_refresh_token_cookie(
                    &token_pair.refresh_token,
                    refresh_expiry,
                ))
                .json(ApiResponse::success(response, message))
        }
        Err(e) => internal_error(
            ErrorCode::InternalServerError,
            "Unable to generate token",
            e,
        ),
    }
}
