use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use crate::configs::RegistryConfig;

// 声明子模块
pub mod consul;
pub mod typos;

pub use crate::service_register_center::consul::{Consul, RegistrarConfig};
pub use crate::service_register_center::typos::{
    HealthCheckSpec, RegistrationStatus, ServiceRegistration,
};

/// 注册中心调用失败的原因
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("注册中心不可达: {0}")]
    BackendUnreachable(String),

    #[error("注册中心拒绝请求: HTTP {status}: {body}")]
    BackendRejected { status: u16, body: String },
}

/// 服务注册接口
///
/// 每次调用只向注册中心发起一次请求，不做重试
#[async_trait]
pub trait ServiceRegister: Send + Sync + Debug {
    /// 向注册中心注册服务实例，调用前实例必须已经在监听
    async fn register(&self, registration: &ServiceRegistration) -> Result<(), RegistrationError>;

    /// 从注册中心注销服务实例
    async fn deregister(&self, service_id: &str) -> Result<(), RegistrationError>;
}

/// 执行一次注册尝试并记录结果状态
///
/// `Pending` 在注册中心确认后变为 `Registered`，任何错误都变为 `Failed`
pub async fn register_once(
    center: &dyn ServiceRegister,
    registration: &mut ServiceRegistration,
) -> Result<(), RegistrationError> {
    match center.register(registration).await {
        Ok(()) => {
            registration.set_status(RegistrationStatus::Registered);
            info!(
                "服务 {} 已注册, 服务ID: {}, 地址: {}:{}",
                registration.name,
                registration.id(),
                registration.address,
                registration.port
            );
            Ok(())
        }
        Err(err) => {
            registration.set_status(RegistrationStatus::Failed);
            Err(err)
        }
    }
}

/// 根据配置创建服务注册中心实例
pub fn service_register_center(config: &RegistryConfig) -> Arc<dyn ServiceRegister> {
    Arc::new(Consul::new(RegistrarConfig::from_config(config)))
}
