use tokio::signal;
use tracing::{error, warn};

/// 等待退出信号（Ctrl+C）
pub async fn listen_for_shutdown() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // 无法监听信号时保持服务运行
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received, stopping the server...");
}
