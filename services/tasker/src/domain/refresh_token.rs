//! 刷新令牌记录
//!
//! 只存储令牌哈希，原始令牌不落库。记录从不删除，唯一的变更是设置 `revoked_at`。

use chrono::{DateTime, Utc};
use tasker_common::{RefreshTokenId, UserId};

/// 刷新令牌记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub id: RefreshTokenId,
    pub user_id: UserId,
    /// SHA-256 + base64 的令牌哈希
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl RefreshToken {
    pub fn issue(
        user_id: UserId,
        token_hash: String,
        created_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RefreshTokenId::new(),
            user_id,
            token_hash,
            created_at,
            expires_at,
            revoked_at: None,
            user_agent: None,
            ip_address: None,
        }
    }

    /// 附加客户端信息
    pub fn with_client(mut self, user_agent: Option<String>, ip_address: Option<String>) -> Self {
        self.user_agent = user_agent;
        self.ip_address = ip_address;
        self
    }

    /// 未吊销且未过期
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.revoked_at.is_none() && now < self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn revoke(&mut self, now: DateTime<Utc>) {
        if self.revoked_at.is_none() {
            self.revoked_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn token(now: DateTime<Utc>) -> RefreshToken {
        RefreshToken::issue(UserId::new(), "hash".to_string(), now, now + Duration::days(14))
    }

    #[test]
    fn test_active_until_expiry() {
        let now = Utc::now();
        let token = token(now);
        assert!(token.is_active(now));
        assert!(token.is_active(now + Duration::days(14) - Duration::seconds(1)));
        // 到期时刻即失效
        assert!(!token.is_active(now + Duration::days(14)));
    }

    #[test]
    fn test_revoked_is_inactive() {
        let now = Utc::now();
        let mut token = token(now);
        token.revoke(now);
        assert!(!token.is_active(now));

        // 再次吊销不改变时间戳
        let first = token.revoked_at;
        token.revoke(now + Duration::minutes(5));
        assert_eq!(token.revoked_at, first);
    }
}
