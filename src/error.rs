//! 统一错误处理模型
//!
//! 提供主应用 pledge 的顶层错误类型，聚合子模块和依赖 crate 的错误

use thiserror::Error;

/// 主应用的统一错误枚举
#[derive(Debug, Error)]
pub enum Error {
    // ========== 配置相关错误 ==========
    /// 配置加载或校验失败
    #[error("Configuration error: {0}")]
    Config(#[from] pledge_common::ConfigError),

    // ========== 系统级错误 ==========
    /// I/O 操作错误
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// 序列化/反序列化错误
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// 异步任务错误
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),

    // ========== 业务逻辑错误 ==========
    /// 服务启动失败
    #[error("Service startup failed: {message}")]
    ServiceStartup { message: String },
}

impl Error {
    /// 构造服务启动错误
    pub fn startup(message: impl Into<String>) -> Self {
        Self::ServiceStartup {
            message: message.into(),
        }
    }
}

/// 主应用的结果类型别名
pub type Result<T> = std::result::Result<T, Error>;
