//! 健康检查端点
//!
//! 只要进程在监听就返回健康，不探测数据库等下游依赖，
//! 服务能否被发现与存储层是否可用互不影响。

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

pub const HEALTH_PATH: &str = "/health";

pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// 挂载健康检查路由
pub fn routes() -> Router {
    Router::new().route(HEALTH_PATH, get(health_check))
}

/// 注册中心轮询本实例所用的探测地址
pub fn probe_url(address: &str, port: u16) -> String {
    format!("http://{}:{}{}", address, port, HEALTH_PATH)
}
