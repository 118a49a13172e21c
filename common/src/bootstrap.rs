//! 服务启动编排
//!
//! 启动顺序固定为一次性单向流程：
//! `Init -> DependencyReady -> ListenerReady -> Registered | RegistrationDegraded -> Serving`。
//! 依赖获取或端口绑定失败是致命错误；注册失败只降级，服务照常对外提供接口，
//! 只是暂时不能被注册中心发现。

use std::fmt;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::health;
use crate::identity::{HostContext, ServiceIdentity};
use crate::service::{shutdown_signal, RegistrationGuard};
use crate::service_register_center::{
    register_once, service_register_center, HealthCheckSpec, RegistrationError, ServiceRegister,
    ServiceRegistration,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Init,
    DependencyReady,
    ListenerReady,
    Registered,
    RegistrationDegraded,
    Serving,
}

impl fmt::Display for BootstrapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 注册结果，注册失败不会中断启动
#[derive(Debug)]
pub enum RegistrationOutcome {
    Registered { service_id: String },
    Degraded { reason: RegistrationError },
}

impl RegistrationOutcome {
    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationOutcome::Registered { .. })
    }
}

/// 启动阶段的致命错误，进程应以非零状态退出
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("启动配置无效: {0}")]
    InvalidConfig(String),

    #[error("依赖初始化失败: {0:#}")]
    Dependency(anyhow::Error),

    #[error("监听地址 {addr} 绑定失败: {source}")]
    Listener { addr: String, source: io::Error },
}

impl From<crate::Error> for BootstrapError {
    fn from(err: crate::Error) -> Self {
        BootstrapError::InvalidConfig(err.to_string())
    }
}

/// 启动编排器
pub struct Bootstrap {
    config: ServiceConfig,
    host: HostContext,
    registry: Arc<dyn ServiceRegister>,
    state: BootstrapState,
}

impl Bootstrap {
    /// 使用配置中的注册中心地址创建 Consul 注册器
    pub fn new(config: ServiceConfig) -> Self {
        let registry = service_register_center(&config.registry);
        Self {
            config,
            host: HostContext::current(),
            registry,
            state: BootstrapState::Init,
        }
    }

    pub fn with_registry(mut self, registry: Arc<dyn ServiceRegister>) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_host(mut self, host: HostContext) -> Self {
        self.host = host;
        self
    }

    pub fn state(&self) -> BootstrapState {
        self.state
    }

    fn advance(&mut self, next: BootstrapState) {
        info!(service = %self.config.name, "启动阶段: {} -> {}", self.state, next);
        self.state = next;
    }

    /// 执行启动流程
    ///
    /// * `connect` - 获取存储依赖，失败即终止启动
    /// * `routes` - 基于依赖构建业务路由，健康检查路由由编排器统一挂载
    pub async fn start<D, C, Fut, R>(
        mut self,
        connect: C,
        routes: R,
    ) -> Result<RunningService, BootstrapError>
    where
        C: FnOnce(ServiceConfig) -> Fut,
        Fut: Future<Output = anyhow::Result<D>>,
        R: FnOnce(D) -> Router,
    {
        // Init: 身份和健康检查参数在接触任何外部资源之前校验
        let identity = ServiceIdentity::build(&self.config.name, &self.host)?;
        let registry_config = self.config.registry.clone();
        registry_config.validate()?;
        info!("服务实例ID: {}", identity);

        let dependency = connect(self.config.clone()).await.map_err(|e| {
            error!("依赖初始化失败: {:#}", e);
            BootstrapError::Dependency(e)
        })?;
        self.advance(BootstrapState::DependencyReady);

        let app = health::routes()
            .merge(routes(dependency))
            .layer(TraceLayer::new_for_http());

        let addr = self.config.server.server_url();
        let listener = TcpListener::bind(&addr).await.map_err(|source| {
            error!("监听地址 {} 绑定失败: {}", addr, source);
            BootstrapError::Listener {
                addr: addr.clone(),
                source,
            }
        })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| BootstrapError::Listener {
                addr: addr.clone(),
                source,
            })?;
        self.advance(BootstrapState::ListenerReady);

        // 先开始处理请求再注册，注册中心确认后可能立即发起健康检查
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                    info!("接收到关闭信号，HTTP服务准备关闭");
                })
                .await
        });
        info!("{} 监听地址: {}", self.config.name, local_addr);

        let advertise_address = self
            .config
            .server
            .advertise_address
            .clone()
            .unwrap_or_else(|| self.host.hostname.clone());
        let check = HealthCheckSpec::for_instance(
            &advertise_address,
            local_addr.port(),
            registry_config.check_interval(),
            registry_config.check_timeout(),
        )?
        .with_deregister_after(registry_config.deregister_critical_after.clone());
        let mut registration =
            ServiceRegistration::new(identity, advertise_address, local_addr.port(), check)
                .with_tags(registry_config.tags.clone());

        let result = register_once(self.registry.as_ref(), &mut registration).await;
        let (outcome, guard) = match result {
            Ok(()) => {
                let service_id = registration.id();
                self.advance(BootstrapState::Registered);
                let guard = RegistrationGuard::new(self.registry.clone(), service_id.clone());
                (RegistrationOutcome::Registered { service_id }, Some(guard))
            }
            Err(reason) => {
                warn!(
                    "服务 {} 注册失败，继续提供服务但无法被发现: {}",
                    registration.id(),
                    reason
                );
                self.advance(BootstrapState::RegistrationDegraded);
                (RegistrationOutcome::Degraded { reason }, None)
            }
        };

        self.advance(BootstrapState::Serving);

        Ok(RunningService {
            state: self.state,
            outcome,
            local_addr,
            registration,
            guard,
            shutdown_tx: Some(shutdown_tx),
            server,
        })
    }
}

/// 启动完成、正在对外服务的实例
#[derive(Debug)]
pub struct RunningService {
    state: BootstrapState,
    outcome: RegistrationOutcome,
    local_addr: SocketAddr,
    registration: ServiceRegistration,
    guard: Option<RegistrationGuard>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    server: JoinHandle<io::Result<()>>,
}

impl RunningService {
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    pub fn outcome(&self) -> &RegistrationOutcome {
        &self.outcome
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registration(&self) -> &ServiceRegistration {
        &self.registration
    }

    /// 等待关闭信号，随后注销并优雅停止 HTTP 服务
    pub async fn run_until_signal(mut self) -> io::Result<()> {
        let exited = tokio::select! {
            _ = shutdown_signal() => None,
            result = &mut self.server => Some(result),
        };

        match exited {
            None => self.shutdown().await,
            Some(result) => {
                error!("HTTP服务意外退出");
                if let Some(guard) = self.guard.take() {
                    guard.release().await;
                }
                flatten(result)
            }
        }
    }

    /// 尽力注销后停止 HTTP 服务
    pub async fn shutdown(self) -> io::Result<()> {
        let RunningService {
            guard,
            shutdown_tx,
            server,
            ..
        } = self;

        if let Some(guard) = guard {
            guard.release().await;
        }
        if let Some(tx) = shutdown_tx {
            let _ = tx.send(());
        }

        let result = flatten(server.await);
        info!("HTTP服务已关闭");
        result
    }
}

fn flatten(result: Result<io::Result<()>, tokio::task::JoinError>) -> io::Result<()> {
    result.map_err(io::Error::other)?
}
