//! Tasker Metrics
//!
//! 认证业务指标

use metrics::counter;

fn outcome(success: bool) -> [(&'static str, String); 1] {
    [("outcome", if success { "success" } else { "rejected" }.to_string())]
}

/// 记录注册
pub fn record_register(success: bool) {
    counter!("tasker_auth_register_total", &outcome(success)).increment(1);
}

/// 记录登录尝试
pub fn record_login(success: bool) {
    counter!("tasker_auth_login_total", &outcome(success)).increment(1);
}

/// 记录刷新令牌轮换
///
/// 被拒绝的刷新可能是重放，单独计数。
pub fn record_refresh(success: bool) {
    counter!("tasker_auth_refresh_total", &outcome(success)).increment(1);
    if !success {
        counter!("tasker_auth_refresh_rejected_total").increment(1);
    }
}

/// 记录登出
pub fn record_logout(revoked: bool) {
    let labels = [("revoked", revoked.to_string())];
    counter!("tasker_auth_logout_total", &labels).increment(1);
}
