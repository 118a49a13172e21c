use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::configs::RegistryConfig;
use crate::service_register_center::typos::{AgentServiceRegistration, ServiceRegistration};
use crate::service_register_center::{RegistrationError, ServiceRegister};

/// Consul client configuration options
#[derive(Debug, Clone)]
pub struct RegistrarConfig {
    /// 注册中心地址，缺少协议时补全为 `http://`
    pub backend_address: String,
    /// 单次调用超时
    pub timeout: Duration,
}

impl RegistrarConfig {
    pub fn new(backend_address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            backend_address: backend_address.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RegistryConfig) -> Self {
        Self::new(config.address.clone(), config.timeout())
    }

    /// 规范化后的基础地址，不带结尾的 `/`
    pub fn base_url(&self) -> String {
        let address = self.backend_address.trim().trim_end_matches('/');
        if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        }
    }
}

/// Consul service registry implementation
#[derive(Debug, Clone)]
pub struct Consul {
    pub options: RegistrarConfig,
    http_client: Client,
}

impl Consul {
    pub fn new(options: RegistrarConfig) -> Self {
        let http_client = Client::builder()
            .timeout(options.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            options,
            http_client,
        }
    }

    async fn put(
        &self,
        url: &str,
        payload: Option<&AgentServiceRegistration>,
    ) -> Result<(), RegistrationError> {
        let mut request = self.http_client.put(url).timeout(self.options.timeout);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RegistrationError::BackendUnreachable(e.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(RegistrationError::BackendRejected { status, body })
    }
}

#[async_trait]
impl ServiceRegister for Consul {
    async fn register(&self, registration: &ServiceRegistration) -> Result<(), RegistrationError> {
        let url = format!("{}/v1/agent/service/register", self.options.base_url());
        let payload = AgentServiceRegistration::from(registration);

        debug!(
            "Registering service: {} ({}:{}) at {}",
            payload.id, payload.address, payload.port, url
        );

        self.put(&url, Some(&payload)).await?;

        info!(
            "Service registered successfully: {}, health check {} every {} (timeout {})",
            payload.id, payload.check.http, payload.check.interval, payload.check.timeout
        );
        Ok(())
    }

    async fn deregister(&self, service_id: &str) -> Result<(), RegistrationError> {
        let url = format!(
            "{}/v1/agent/service/deregister/{}",
            self.options.base_url(),
            service_id
        );

        debug!("Deregistering service: {}", service_id);

        self.put(&url, None).await?;

        info!("Service deregistered successfully: {}", service_id);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::spawn_agent;
    use super::*;
    use crate::identity::{HostContext, ServiceIdentity};
    use crate::service_register_center::typos::HealthCheckSpec;
    use axum::http::StatusCode;

    fn order_registration() -> ServiceRegistration {
        let identity =
            ServiceIdentity::build("order-service", &HostContext::new("order-host", "t1")).unwrap();
        let check = HealthCheckSpec::for_instance(
            "order-host",
            8083,
            Duration::from_secs(10),
            Duration::from_secs(3),
        )
        .unwrap();
        ServiceRegistration::new(identity, "order-host", 8083, check)
    }

    fn consul_at(address: String) -> Consul {
        Consul::new(RegistrarConfig::new(address, Duration::from_secs(2)))
    }

    #[test]
    fn bare_address_gets_http_scheme() {
        let options = RegistrarConfig::new("consul:8500", Duration::from_secs(1));
        assert_eq!(options.base_url(), "http://consul:8500");

        let options = RegistrarConfig::new("https://consul.local/", Duration::from_secs(1));
        assert_eq!(options.base_url(), "https://consul.local");
    }

    #[tokio::test]
    async fn register_sends_one_request_with_check() {
        let (addr, agent) = spawn_agent(StatusCode::OK).await;
        let consul = consul_at(addr.to_string());

        consul.register(&order_registration()).await.unwrap();

        let bodies = agent.registrations.lock().unwrap().clone();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        assert_eq!(body["Name"], "order-service");
        assert_eq!(body["Port"], 8083);
        assert!(body["Check"]["HTTP"]
            .as_str()
            .unwrap()
            .ends_with(":8083/health"));
        assert_eq!(body["Check"]["Interval"], "10s");
        assert_eq!(body["Check"]["Timeout"], "3s");
    }

    #[tokio::test]
    async fn non_success_status_is_rejection() {
        let (addr, agent) = spawn_agent(StatusCode::BAD_REQUEST).await;
        let consul = consul_at(format!("http://{}", addr));

        let err = consul.register(&order_registration()).await.unwrap_err();

        assert!(matches!(
            err,
            RegistrationError::BackendRejected { status: 400, .. }
        ));
        assert_eq!(agent.registrations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let consul = consul_at("127.0.0.1:1".to_string());

        let err = consul.register(&order_registration()).await.unwrap_err();

        assert!(matches!(err, RegistrationError::BackendUnreachable(_)));
    }

    #[tokio::test]
    async fn silent_backend_times_out_as_unreachable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        let consul = Consul::new(RegistrarConfig::new(addr.to_string(), Duration::from_secs(1)));

        let started = std::time::Instant::now();
        let err = consul.register(&order_registration()).await.unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err, RegistrationError::BackendUnreachable(_)));
        assert!(elapsed >= Duration::from_millis(900), "{:?}", elapsed);
        assert!(elapsed < Duration::from_secs(3), "{:?}", elapsed);
    }

    #[tokio::test]
    async fn deregister_targets_service_id() {
        let (addr, agent) = spawn_agent(StatusCode::OK).await;
        let consul = consul_at(addr.to_string());

        consul
            .deregister("order-service-order-host-t1")
            .await
            .unwrap();

        assert_eq!(
            agent.deregistrations.lock().unwrap().clone(),
            vec!["order-service-order-host-t1".to_string()]
        );
    }
}
