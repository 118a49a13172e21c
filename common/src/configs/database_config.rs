use serde::Deserialize;

/// 存储依赖配置
///
/// `url` 由 `DATABASE_URL` 覆盖，未设置时使用各服务自己的默认库
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// 建立连接的超时时间（秒）
    pub connect_timeout: u64,
}
