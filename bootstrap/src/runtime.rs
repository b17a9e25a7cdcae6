//! 服务运行时

use metrics_exporter_prometheus::PrometheusHandle;
use tasker_config::AppConfig;
use tasker_errors::{AppError, AppResult};
use tasker_telemetry::{init, init_metrics};
use tracing::{error, info, warn};

/// 初始化服务运行时（日志 + 指标）
pub fn init_runtime(config: &AppConfig) -> AppResult<PrometheusHandle> {
    let json = config.telemetry.json || config.is_production();
    init(&config.telemetry.log_level, json).map_err(|e| AppError::configuration(e.to_string()))?;

    let handle = init_metrics().map_err(|e| AppError::configuration(e.to_string()))?;

    info!(
        app_name = %config.app_name,
        app_env = %config.app_env,
        "Runtime initialized"
    );
    Ok(handle)
}

/// 等待关闭信号
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
