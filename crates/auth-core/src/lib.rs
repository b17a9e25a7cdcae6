//! tasker-auth-core - 认证核心库
//!
//! 访问令牌（JWT）签发与校验、刷新令牌生成、令牌哈希

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::{RngCore, rngs::OsRng};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tasker_common::UserId;
use tasker_config::JwtConfig;
use tasker_errors::{AppError, AppResult};
use uuid::Uuid;

/// 刷新令牌随机字节数
pub const REFRESH_TOKEN_BYTES: usize = 64;

/// JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Expiration time
    pub exp: i64,
    /// Issued at
    pub iat: i64,
    /// JWT ID
    pub jti: String,
}

impl Claims {
    pub fn new(
        user_id: &UserId,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
        issuer: &str,
        audience: &str,
    ) -> Self {
        Self {
            sub: user_id.0.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn user_id(&self) -> AppResult<UserId> {
        Uuid::parse_str(&self.sub)
            .map(UserId::from_uuid)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }
}

/// 已签发的访问令牌
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Token 服务
///
/// 启动时由 [`JwtConfig`] 构建一次，之后以 `Arc` 共享。
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_lifetime: Duration,
    refresh_token_lifetime: Duration,
    clock_skew_secs: u64,
    issuer: String,
    audience: String,
}

impl TokenService {
    /// 从配置构建；签名密钥缺失时返回配置错误
    pub fn from_config(config: &JwtConfig) -> AppResult<Self> {
        config
            .validate()
            .map_err(|e| AppError::configuration(e.to_string()))?;

        let secret = config.signing_key.expose_secret().as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            access_token_lifetime: Duration::minutes(config.access_token_minutes),
            refresh_token_lifetime: Duration::days(config.refresh_token_days),
            clock_skew_secs: config.clock_skew_secs,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
        })
    }

    /// 生成访问令牌
    pub fn generate_access_token(&self, user_id: &UserId) -> AppResult<AccessToken> {
        let now = Utc::now();
        let expires_at = now + self.access_token_lifetime;
        let claims = Claims::new(user_id, now, expires_at, &self.issuer, &self.audience);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))?;

        Ok(AccessToken { token, expires_at })
    }

    /// 生成刷新令牌（不透明随机值，不得写入日志）
    pub fn generate_refresh_token(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        STANDARD.encode(bytes)
    }

    /// 刷新令牌哈希（SHA-256 + base64），作为存储查找键
    pub fn hash_token(&self, token: &str) -> String {
        hash_token(token)
    }

    /// 新刷新令牌的过期时间
    pub fn refresh_token_expires_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.refresh_token_lifetime
    }

    /// 验证访问令牌
    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = false;
        validation.leeway = self.clock_skew_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid token: {}", e)))?;

        let claims = token_data.claims;
        if claims.jti.is_empty() {
            return Err(AppError::unauthorized("Token ID (jti) missing"));
        }

        Ok(claims)
    }

    /// 访问令牌有效期（秒）
    pub fn access_token_expires_in(&self) -> i64 {
        self.access_token_lifetime.num_seconds()
    }
}

/// SHA-256 + base64
pub fn hash_token(token: &str) -> String {
    STANDARD.encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::from_config(&JwtConfig::new("test-signing-key-0123456789abcdef")).unwrap()
    }

    #[test]
    fn test_missing_key_is_configuration_error() {
        let result = TokenService::from_config(&JwtConfig::new(""));
        assert!(matches!(result, Err(AppError::Configuration(_))));
    }

    #[test]
    fn test_access_token_claims() {
        let service = service();
        let user_id = UserId::new();

        let access = service.generate_access_token(&user_id).unwrap();
        let claims = service.validate_access_token(&access.token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.iss, "Tasker");
        assert_eq!(claims.aud, "TaskerClient");
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert_eq!(service.access_token_expires_in(), 900);
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let mut other = JwtConfig::new("test-signing-key-0123456789abcdef");
        other.audience = "SomeoneElse".to_string();
        let other = TokenService::from_config(&other).unwrap();

        let access = other.generate_access_token(&UserId::new()).unwrap();
        assert!(service().validate_access_token(&access.token).is_err());
    }

    #[test]
    fn test_expiry_honours_clock_skew() {
        let service = service();
        let user_id = UserId::new();
        let now = Utc::now();
        let key = EncodingKey::from_secret(b"test-signing-key-0123456789abcdef");

        // 过期 10 秒，仍在 30 秒容差内
        let within = Claims::new(
            &user_id,
            now - Duration::minutes(16),
            now - Duration::seconds(10),
            "Tasker",
            "TaskerClient",
        );
        let token = encode(&Header::new(Algorithm::HS256), &within, &key).unwrap();
        assert!(service.validate_access_token(&token).is_ok());

        let beyond = Claims::new(
            &user_id,
            now - Duration::minutes(20),
            now - Duration::minutes(2),
            "Tasker",
            "TaskerClient",
        );
        let token = encode(&Header::new(Algorithm::HS256), &beyond, &key).unwrap();
        assert!(service.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_refresh_token_shape() {
        let service = service();
        let a = service.generate_refresh_token();
        let b = service.generate_refresh_token();

        assert_ne!(a, b);
        assert_eq!(STANDARD.decode(&a).unwrap().len(), REFRESH_TOKEN_BYTES);
    }

    #[test]
    fn test_hash_is_deterministic_and_one_way() {
        let service = service();
        let secret = service.generate_refresh_token();

        assert_eq!(service.hash_token(&secret), service.hash_token(&secret));
        assert_ne!(service.hash_token(&secret), secret);
        assert_ne!(service.hash_token(&secret), service.hash_token("other"));
        // SHA-256 输出 32 字节
        assert_eq!(STANDARD.decode(service.hash_token(&secret)).unwrap().len(), 32);
    }
}
