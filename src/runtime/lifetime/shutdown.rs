use tokio::signal;
use tracing::{error, warn};

/// 等待 Ctrl+C 信号
pub async fn listen_for_shutdown() {
    match signal::ctrl_c().await {
        Ok(()) => warn!("Shutdown signal received, initiating graceful shutdown..."),
        Err(e) => {
            // 无法监听信号时不主动退出，交由服务器自身结束
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
