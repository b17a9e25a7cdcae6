//! 用户实体与密码哈希

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tasker_common::{UserId, normalize_email};
use thiserror::Error;

/// 密码错误
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid password hash: {0}")]
    InvalidHash(String),
}

impl From<PasswordError> for tasker_errors::AppError {
    fn from(err: PasswordError) -> Self {
        tasker_errors::AppError::internal(err.to_string())
    }
}

/// 哈希后的密码（Argon2，带随机盐）
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 从明文密码创建
    pub fn from_plain(plain_password: &str) -> Result<Self, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
            .to_string();
        Ok(Self(hash))
    }

    /// 从已有的哈希字符串创建
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// 验证明文密码是否匹配
    pub fn verify(&self, plain_password: &str) -> Result<bool, PasswordError> {
        let parsed =
            PasswordHash::new(&self.0).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(plain_password.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("HashedPassword([REDACTED])")
    }
}

/// 用户
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// 小写规范化后的邮箱，唯一
    pub email: String,
    pub password_hash: HashedPassword,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: &str, password_hash: HashedPassword) -> Self {
        Self {
            id: UserId::new(),
            email: normalize_email(email),
            password_hash,
            created_at: Utc::now(),
        }
    }

    pub fn verify_password(&self, plain_password: &str) -> Result<bool, PasswordError> {
        self.password_hash.verify(plain_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hashed = HashedPassword::from_plain("Secret123!").unwrap();
        assert!(hashed.verify("Secret123!").unwrap());
        assert!(!hashed.verify("secret123!").unwrap());
        assert!(!format!("{:?}", hashed).contains("argon2"));
    }

    #[test]
    fn test_salted_hash_differs() {
        let a = HashedPassword::from_plain("same").unwrap();
        let b = HashedPassword::from_plain("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_email_is_normalized() {
        let user = User::new("  Alice@Example.COM ", HashedPassword::from_hash("x"));
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_invalid_hash() {
        let hashed = HashedPassword::from_hash("not-a-phc-string");
        assert!(matches!(
            hashed.verify("anything"),
            Err(PasswordError::InvalidHash(_))
        ));
    }
}
