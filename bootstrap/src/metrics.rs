//! Metrics 模块
//!
//! 连接池状态采集

use std::time::Duration;

use metrics::gauge;
use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::debug;

/// 设置连接池大小
pub fn set_pool_size(pool_name: &str, size: u32) {
    let labels = [("pool", pool_name.to_string())];
    gauge!("connection_pool_size", &labels).set(size as f64);
}

/// 设置活跃连接数
pub fn set_active_connections(pool_name: &str, count: u32) {
    let labels = [("pool", pool_name.to_string())];
    gauge!("connection_pool_active", &labels).set(count as f64);
}

/// 设置连接池使用率
pub fn set_pool_utilization(pool_name: &str, utilization: f64) {
    let labels = [("pool", pool_name.to_string())];
    gauge!("connection_pool_utilization", &labels).set(utilization);
}

/// 记录一次连接池快照
pub fn record_pool_status(pool_name: &str, pool: &PgPool, max_connections: u32) {
    let size = pool.size();
    let active = size.saturating_sub(pool.num_idle() as u32);

    set_pool_size(pool_name, size);
    set_active_connections(pool_name, active);
    if max_connections > 0 {
        set_pool_utilization(pool_name, active as f64 / max_connections as f64);
    }
}

/// 定期采集 PostgreSQL 连接池状态
pub fn spawn_pool_metrics(pool: PgPool, max_connections: u32, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if pool.is_closed() {
                debug!("PostgreSQL pool closed, stopping pool metrics");
                break;
            }
            record_pool_status("postgres", &pool, max_connections);
        }
    })
}
