//! 配置错误类型

use std::path::PathBuf;
use thiserror::Error;

/// 配置加载与校验错误
///
/// 配置缺失或非法时服务必须快速失败，而不是带病启动后静默降级
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// 必需的环境变量缺失
    #[error("Missing required environment variable {0}")]
    MissingEnv(&'static str),

    /// 环境变量内容非法
    #[error("Invalid value in environment variable {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    /// 配置字段校验失败
    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    /// 构造字段校验错误
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
