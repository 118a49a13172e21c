use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use crate::configs::LogConfig;

// 日志输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    // 普通文本格式
    Plain,
    // JSON格式，适合ELK等日志聚合系统
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Plain,
        }
    }
}

/// 使用默认配置初始化日志系统
pub fn init() -> Result<()> {
    init_from_config(&LogConfig::default())
}

/// 从配置初始化日志系统
///
/// `RUST_LOG` 环境变量优先于配置文件中的日志级别
pub fn init_from_config(config: &LogConfig) -> Result<()> {
    let from_env = std::env::var("RUST_LOG").is_ok();
    let env_filter = if from_env {
        EnvFilter::try_from_default_env()?
    } else {
        EnvFilter::try_new(config.filter_directives())?
    };

    let log_format = config
        .format
        .as_deref()
        .map(LogFormat::parse)
        .unwrap_or(LogFormat::Plain);

    // 根据配置的输出格式选择日志输出方式
    let installed = match log_format {
        LogFormat::Plain => fmt()
            .with_env_filter(env_filter)
            .with_ansi(true)
            .with_thread_names(true)
            .try_init(),
        LogFormat::Json => fmt()
            .with_env_filter(env_filter)
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_thread_names(true)
            .try_init(),
    };
    installed.map_err(|e| anyhow::anyhow!("日志订阅器初始化失败: {}", e))?;

    if from_env {
        info!("使用环境变量 RUST_LOG 覆盖配置文件的日志级别");
    } else {
        info!(
            "日志系统初始化成功，全局级别: {}，SQLx日志级别: {}",
            config.level,
            config.sqlx_level()
        );
    }
    info!("日志格式: {:?}", log_format);

    Ok(())
}
