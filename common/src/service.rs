use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};

use crate::service_register_center::ServiceRegister;

/// 等待 Ctrl+C 或 SIGTERM
pub async fn shutdown_signal() {
    // 监听 Ctrl+C 信号
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("无法安装Ctrl+C处理器: {}", e);
            std::future::pending::<()>().await;
        }
    };

    // 在Unix系统上监听 SIGTERM 信号
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("无法安装SIGTERM处理器: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    // 在非Unix系统上创建一个永不返回的future
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    // 等待任一信号
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("接收到关闭信号，准备优雅关闭...");
}

/// 注册成功后持有的注销凭据
///
/// `release` 尽力从注册中心注销；若未调用 `release` 就被丢弃，
/// 会在当前 Tokio 运行时上补发一次注销请求。注销失败只记录日志。
#[derive(Debug)]
pub struct RegistrationGuard {
    registry: Arc<dyn ServiceRegister>,
    service_id: String,
    released: bool,
}

impl RegistrationGuard {
    pub fn new(registry: Arc<dyn ServiceRegister>, service_id: String) -> Self {
        Self {
            registry,
            service_id,
            released: false,
        }
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub async fn release(mut self) {
        self.released = true;
        deregister_best_effort(self.registry.as_ref(), &self.service_id).await;
    }
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let registry = self.registry.clone();
        let service_id = std::mem::take(&mut self.service_id);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    deregister_best_effort(registry.as_ref(), &service_id).await;
                });
            }
            Err(_) => warn!(
                "没有可用的运行时，服务 {} 将依赖注册中心的健康检查超时下线",
                service_id
            ),
        }
    }
}

async fn deregister_best_effort(registry: &dyn ServiceRegister, service_id: &str) {
    match registry.deregister(service_id).await {
        Ok(()) => info!("已从服务注册中心注销服务: {}", service_id),
        Err(e) => warn!("从服务注册中心注销服务 {} 失败: {}", service_id, e),
    }
}
