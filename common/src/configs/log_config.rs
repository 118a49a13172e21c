use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub sqlx_level: Option<String>, // SQL查询日志级别
    pub format: Option<String>,     // 日志输出格式: plain或json
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            sqlx_level: None,
            format: None,
        }
    }
}

impl LogConfig {
    // 获取sqlx日志级别
    pub fn sqlx_level(&self) -> &str {
        match &self.sqlx_level {
            Some(level) => level.as_str(),
            None => "warn", // 默认值
        }
    }

    /// 组合成 EnvFilter 可解析的过滤串
    pub fn filter_directives(&self) -> String {
        format!("{},sqlx={}", self.level, self.sqlx_level())
    }
}
