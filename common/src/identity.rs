//! 服务实例标识
//!
//! 注册 ID 形如 `<逻辑名>-<主机名>-<实例令牌>`。实例令牌在进程启动后首次使用时生成，
//! 之后在整个进程生命周期内保持不变，保证同一主机上并发运行的多个副本也不会冲突。

use once_cell::sync::Lazy;
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fmt;

use crate::{Error, Result};

const INSTANCE_TOKEN_LEN: usize = 8;

static INSTANCE_TOKEN: Lazy<String> = Lazy::new(generate_instance_token);

fn generate_instance_token() -> String {
    let mut rng = rand::rng();
    (0..INSTANCE_TOKEN_LEN)
        .map(|_| (rng.sample(Alphanumeric) as char).to_ascii_lowercase())
        .collect()
}

/// 运行时主机信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostContext {
    pub hostname: String,
    pub instance_token: String,
}

impl HostContext {
    pub fn new(hostname: impl Into<String>, instance_token: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            instance_token: instance_token.into(),
        }
    }

    /// 当前进程的主机信息，主机名读取失败时退化为 `localhost`
    pub fn current() -> Self {
        let hostname = hostname::get()
            .ok()
            .and_then(|name| name.into_string().ok())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "localhost".to_string());

        Self::new(hostname, INSTANCE_TOKEN.as_str())
    }

    pub fn host_token(&self) -> String {
        format!("{}-{}", self.hostname, self.instance_token)
    }
}

/// 服务实例身份，构建后不可变
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceIdentity {
    logical_name: String,
    host_token: String,
}

impl ServiceIdentity {
    pub fn build(logical_name: &str, host: &HostContext) -> Result<Self> {
        let logical_name = logical_name.trim();
        if logical_name.is_empty() {
            return Err(Error::InvalidConfig("服务名称不能为空".to_string()));
        }

        Ok(Self {
            logical_name: logical_name.to_string(),
            host_token: host.host_token(),
        })
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn host_token(&self) -> &str {
        &self.host_token
    }

    /// 注册中心中的唯一 ID
    pub fn registration_id(&self) -> String {
        format!("{}-{}", self.logical_name, self.host_token)
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.logical_name, self.host_token)
    }
}

/// 基于当前主机构建服务身份
pub fn build_identity(logical_name: &str) -> Result<ServiceIdentity> {
    ServiceIdentity::build(logical_name, &HostContext::current())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_process_yields_same_id() {
        let first = build_identity("order-service").unwrap();
        let second = build_identity("order-service").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.registration_id(), second.registration_id());
    }

    #[test]
    fn id_joins_name_and_host_token() {
        let host = HostContext::new("node-a", "k3x9q2mz");
        let identity = ServiceIdentity::build("user-service", &host).unwrap();
        assert_eq!(identity.registration_id(), "user-service-node-a-k3x9q2mz");
        assert_eq!(identity.to_string(), identity.registration_id());
    }

    #[test]
    fn replicas_on_different_hosts_differ() {
        let a = ServiceIdentity::build("order-service", &HostContext::new("node-a", "t1")).unwrap();
        let b = ServiceIdentity::build("order-service", &HostContext::new("node-b", "t1")).unwrap();
        assert_ne!(a.registration_id(), b.registration_id());
    }

    #[test]
    fn replicas_on_one_host_differ_by_token() {
        let a = ServiceIdentity::build("order-service", &HostContext::new("node-a", "t1")).unwrap();
        let b = ServiceIdentity::build("order-service", &HostContext::new("node-a", "t2")).unwrap();
        assert_ne!(a.registration_id(), b.registration_id());
    }

    #[test]
    fn empty_name_is_rejected() {
        let host = HostContext::new("node-a", "t1");
        assert!(matches!(
            ServiceIdentity::build("  ", &host),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn instance_token_is_short_lowercase_alphanumeric() {
        let token = &HostContext::current().instance_token;
        assert_eq!(token.len(), INSTANCE_TOKEN_LEN);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
