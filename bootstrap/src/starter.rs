//! 服务启动器

use std::future::Future;
use std::time::Duration;

use tasker_config::AppConfig;
use tasker_errors::AppResult;
use tracing::{debug, info};

use crate::infrastructure::Infrastructure;
use crate::metrics::spawn_pool_metrics;
use crate::runtime::{init_runtime, shutdown_signal};

/// 连接池指标采集间隔
const POOL_METRICS_INTERVAL: Duration = Duration::from_secs(15);

/// 运行服务
///
/// 1. 加载 `.env` 与配置
/// 2. 初始化运行时（日志、指标）
/// 3. 创建基础设施资源（TokenService、数据库连接池）
/// 4. 调用闭包组装服务；组装失败（例如处理器注册不完整）即退出
/// 5. 等待关闭信号
///
/// ```ignore
/// tasker_bootstrap::run("config", |infra| async move {
///     TaskerService::assemble(infra).await
/// })
/// .await
/// ```
pub async fn run<F, Fut, S>(
    config_dir: &str,
    service_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<S>>,
{
    // 1. 加载配置
    let _ = dotenvy::dotenv();
    let config = AppConfig::load(config_dir)?;

    // 2. 初始化运行时
    let metrics = init_runtime(&config)?;

    info!("Starting {} service", config.app_name);

    // 3. 创建基础设施（带重试）
    let infra = Infrastructure::from_config(&config).await?;
    let pool_metrics = spawn_pool_metrics(
        infra.postgres_pool(),
        config.database.max_connections,
        POOL_METRICS_INTERVAL,
    );

    // 4. 组装服务
    let service = service_builder(infra).await?;
    info!("{} service ready", config.app_name);

    // 5. 等待关闭
    shutdown_signal().await;

    pool_metrics.abort();
    drop(service);
    debug!(snapshot = %metrics.render(), "Final metrics snapshot");
    info!("Service stopped");

    Ok(())
}
