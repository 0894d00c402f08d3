//! JWT 令牌签发与校验
//!
//! access token 放在 `Authorization` 头中，refresh token 只通过 HttpOnly cookie 传递。

use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind},
};
use serde::{Deserialize, Serialize};

pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // 用户 ID
    pub role: String,
    pub token_type: TokenKind,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, JwtError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| JwtError::from(ErrorKind::InvalidSubject))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn secret() -> &'static str {
        &AppConfig::get().jwt.secret
    }

    pub fn generate_access_token(user_id: i64, role: &str) -> Result<String, JwtError> {
        let minutes = AppConfig::get().jwt.access_token_expiry;
        Self::sign(user_id, role, TokenKind::Access, chrono::Duration::minutes(minutes))
    }

    /// `expiry` 为空时使用配置中的默认有效期
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        expiry: Option<chrono::Duration>,
    ) -> Result<String, JwtError> {
        let expiry = expiry.unwrap_or_else(Self::default_refresh_expiry);
        Self::sign(user_id, role, TokenKind::Refresh, expiry)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_expiry)?,
        })
    }

    fn sign(
        user_id: i64,
        role: &str,
        kind: TokenKind,
        expiry: chrono::Duration,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: kind,
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(Self::secret().as_bytes()),
        )
    }

    fn verify(token: &str, expected: TokenKind) -> Result<Claims, JwtError> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(Self::secret().as_bytes()),
            &Validation::default(),
        )?
        .claims;

        if claims.token_type != expected {
            return Err(JwtError::from(ErrorKind::InvalidToken));
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Access)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, JwtError> {
        Self::verify(token, TokenKind::Refresh)
    }

    /// 用 refresh token 换取新的 access token
    pub fn refresh_access_token(refresh_token: &str) -> Result<String, JwtError> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        Self::generate_access_token(claims.user_id()?, &claims.role)
    }

    fn default_refresh_expiry() -> chrono::Duration {
        chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
    }

    /// cookie 有效期与 refresh token 保持一致
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        expiry: Option<chrono::Duration>,
    ) -> Cookie<'static> {
        let expiry = expiry.unwrap_or_else(Self::default_refresh_expiry);
        Self::refresh_cookie(
            refresh_token.to_string(),
            actix_web::cookie::time::Duration::seconds(expiry.num_seconds()),
        )
    }

    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        Self::refresh_cookie(String::new(), actix_web::cookie::time::Duration::ZERO)
    }

    fn refresh_cookie(
        value: String,
        max_age: actix_web::cookie::time::Duration,
    ) -> Cookie<'static> {
        Cookie::build(REFRESH_TOKEN_COOKIE, value)
            .path("/")
            .max_age(max_age)
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(AppConfig::get().is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_roundtrip() {
        let pair = JwtUtils::generate_token_pair(42, "instructor", None).expect("token pair");
        let claims = JwtUtils::verify_access_token(&pair.access_token).expect("valid access");
        assert_eq!(claims.user_id().expect("numeric sub"), 42);
        assert_eq!(claims.role, "instructor");
        assert_eq!(claims.token_type, TokenKind::Access);
    }

    #[test]
    fn test_token_kinds_are_not_interchangeable() {
        let pair = JwtUtils::generate_token_pair(7, "student", None).expect("token pair");
        assert!(JwtUtils::verify_access_token(&pair.refresh_token).is_err());
        assert!(JwtUtils::verify_refresh_token(&pair.access_token).is_err());

        let access = JwtUtils::refresh_access_token(&pair.refresh_token).expect("refreshed");
        assert!(JwtUtils::verify_access_token(&access).is_ok());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token = JwtUtils::generate_access_token(1, "admin").expect("token");
        let tampered = format!("{token}x");
        assert!(JwtUtils::verify_access_token(&tampered).is_err());
    }

    #[test]
    fn test_refresh_cookie_attributes() {
        let cookie =
            JwtUtils::create_refresh_token_cookie("abc", Some(chrono::Duration::days(30)));
        assert_eq!(cookie.name(), REFRESH_TOKEN_COOKIE);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::days(30))
        );

        let empty = JwtUtils::create_empty_refresh_token_cookie();
        assert_eq!(empty.value(), "");
        assert_eq!(empty.max_age(), Some(actix_web::cookie::time::Duration::ZERO));
    }
}
