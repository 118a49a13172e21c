// 导入 serde 用于序列化
use serde::Serialize;
use std::time::Duration;

use crate::health;
use crate::identity::ServiceIdentity;
use crate::{Error, Result};

/// 健康检查配置
///
/// 定义服务注册中心如何检查服务的健康状态，探测地址指向正在注册的实例自身
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckSpec {
    /// 健康检查的URL
    pub probe_url: String,
    /// 健康检查的时间间隔
    pub interval: Duration,
    /// 健康检查的超时时间
    pub timeout: Duration,
    /// 服务不健康后多久取消注册
    pub deregister_critical_after: Option<String>,
}

impl HealthCheckSpec {
    /// 为指定实例构建 HTTP 健康检查，要求 `interval > timeout > 0`
    pub fn for_instance(
        address: &str,
        port: u16,
        interval: Duration,
        timeout: Duration,
    ) -> Result<Self> {
        validate_timing(interval, timeout)?;

        Ok(Self {
            probe_url: health::probe_url(address, port),
            interval,
            timeout,
            deregister_critical_after: None,
        })
    }

    pub fn with_deregister_after(mut self, after: Option<String>) -> Self {
        self.deregister_critical_after = after;
        self
    }
}

/// 校验 `interval > timeout > 0`
pub fn validate_timing(interval: Duration, timeout: Duration) -> Result<()> {
    if timeout.is_zero() || interval <= timeout {
        return Err(Error::InvalidConfig(format!(
            "健康检查间隔 {:?} 必须大于超时 {:?}，且超时必须大于 0",
            interval, timeout
        )));
    }
    Ok(())
}

/// 单次注册尝试的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Pending,
    Registered,
    Failed,
}

/// 服务注册信息
///
/// 包含向服务注册中心注册服务所需的所有信息
#[derive(Debug, Clone)]
pub struct ServiceRegistration {
    pub identity: ServiceIdentity,
    /// 服务名称
    pub name: String,
    /// 服务主机地址
    pub address: String,
    /// 服务端口号
    pub port: u16,
    /// 服务标签，用于分类和过滤
    pub tags: Vec<String>,
    pub check: HealthCheckSpec,
    status: RegistrationStatus,
}

impl ServiceRegistration {
    pub fn new(
        identity: ServiceIdentity,
        address: impl Into<String>,
        port: u16,
        check: HealthCheckSpec,
    ) -> Self {
        Self {
            name: identity.logical_name().to_string(),
            identity,
            address: address.into(),
            port,
            tags: Vec::new(),
            check,
            status: RegistrationStatus::Pending,
        }
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn id(&self) -> String {
        self.identity.registration_id()
    }

    pub fn status(&self) -> RegistrationStatus {
        self.status
    }

    pub(crate) fn set_status(&mut self, status: RegistrationStatus) {
        self.status = status;
    }
}

/// Consul agent 注册请求体
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AgentServiceRegistration {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub check: AgentServiceCheck,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct AgentServiceCheck {
    #[serde(rename = "HTTP")]
    pub http: String,
    pub interval: String,
    pub timeout: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deregister_critical_service_after: Option<String>,
}

impl From<&ServiceRegistration> for AgentServiceRegistration {
    fn from(registration: &ServiceRegistration) -> Self {
        Self {
            id: registration.id(),
            name: registration.name.clone(),
            address: registration.address.clone(),
            port: registration.port,
            tags: registration.tags.clone(),
            check: AgentServiceCheck {
                http: registration.check.probe_url.clone(),
                interval: format_duration(registration.check.interval),
                timeout: format_duration(registration.check.timeout),
                deregister_critical_service_after: registration
                    .check
                    .deregister_critical_after
                    .clone(),
            },
        }
    }
}

/// 按 Consul 的时长格式输出，选用能精确表示该时长的最大单位
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.subsec_nanos();
    if nanos == 0 {
        format!("{}s", duration.as_secs())
    } else if nanos % 1_000_000 == 0 {
        format!("{}ms", duration.as_millis())
    } else if nanos % 1_000 == 0 {
        format!("{}us", duration.as_micros())
    } else {
        format!("{}ns", duration.as_nanos())
    }
}
