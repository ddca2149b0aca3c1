//! JWT 令牌服务
//!
//! 校验外部身份提供方签发的 JWT，并提取当前用户上下文。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节，与身份提供方共享)
    pub secret: String,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                #[cfg(debug_assertions)]
                {
                    tracing::warn!("JWT_SECRET not set, using development fallback key");
                    "gather-development-key-must-be-replaced".to_string()
                }
                #[cfg(not(debug_assertions))]
                {
                    panic!("🚨 FATAL: JWT_SECRET must be configured in production");
                }
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gather-idp".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "gather-api".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 角色 (user | admin)
    pub role: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 当前用户上下文 (从已验证的 Claims 提取)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub role: String,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            role: claims.role,
        }
    }
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// 从 `Authorization: Bearer <token>` 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim)
    }

    /// 生成令牌 (开发工具和测试使用；生产环境由身份提供方签发)
    pub fn generate_token(
        &self,
        user_id: &str,
        role: &str,
        ttl_minutes: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证令牌并返回 Claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            _ => JwtError::InvalidToken(e.to_string()),
        })
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new(JwtConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-key-for-unit-tests-only".to_string(),
            issuer: "gather-idp".to_string(),
            audience: "gather-api".to_string(),
        })
    }

    #[test]
    fn test_generate_and_validate_roundtrip() {
        let svc = test_service();
        let token = svc.generate_token("u1", "user", 60).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_expired_token_rejected() {
        let svc = test_service();
        let token = svc.generate_token("u1", "user", -10).unwrap();
        let err = svc.validate_token(&token).unwrap_err();
        assert!(matches!(err, JwtError::ExpiredToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let svc = test_service();
        let token = svc.generate_token("u1", "user", 60).unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "a-completely-different-secret-key".to_string(),
            issuer: "gather-idp".to_string(),
            audience: "gather-api".to_string(),
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let svc = test_service();
        let token = svc.generate_token("u1", "user", 60).unwrap();

        let other = JwtService::new(JwtConfig {
            secret: "test-secret-key-for-unit-tests-only".to_string(),
            issuer: "gather-idp".to_string(),
            audience: "someone-else".to_string(),
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_current_user_roles() {
        let admin = CurrentUser { id: "a".into(), role: "admin".into() };
        let user = CurrentUser { id: "b".into(), role: "user".into() };
        assert!(admin.is_admin());
        assert!(!user.is_admin());
    }
}
