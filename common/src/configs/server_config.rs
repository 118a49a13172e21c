use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    pub port: u16,
    /// 注册到服务中心的地址，未配置时使用主机名
    pub advertise_address: Option<String>,
}

impl ServerConfig {
    pub fn server_url(&self) -> String {
        format!("{}:{}", &self.host, self.port)
    }
}
