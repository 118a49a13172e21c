use serde::Deserialize;
use std::time::Duration;

use crate::service_register_center::typos::validate_timing;
use crate::{Error, Result};

/// 服务注册中心配置
#[derive(Debug, Deserialize, Clone)]
pub struct RegistryConfig {
    /// 注册中心地址，例如 `http://consul:8500`
    pub address: String,
    /// 单次调用超时（秒）
    pub timeout: u64,
    /// 健康检查间隔（秒）
    pub check_interval: u64,
    /// 健康检查超时（秒）
    pub check_timeout: u64,
    /// 健康检查持续失败多久后由注册中心自动注销，例如 `1m`
    pub deregister_critical_after: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RegistryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval)
    }

    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout)
    }

    /// 调用超时必须大于 0，健康检查需满足 `interval > timeout > 0`
    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(Error::InvalidConfig(
                "注册中心调用超时 registry.timeout 必须大于 0".to_string(),
            ));
        }
        validate_timing(self.check_interval(), self.check_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RegistryConfig {
        RegistryConfig {
            address: "http://consul:8500".to_string(),
            timeout: 5,
            check_interval: 10,
            check_timeout: 3,
            deregister_critical_after: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(registry().validate().is_ok());
    }

    #[test]
    fn zero_call_timeout_is_rejected() {
        let config = RegistryConfig {
            timeout: 0,
            ..registry()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn check_timing_is_validated_too() {
        let config = RegistryConfig {
            check_timeout: 10,
            ..registry()
        };
        assert!(config.validate().is_err());
    }
}
