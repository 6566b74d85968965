//! 统一配置管理系统
//!
//! 本模块是 Pledge 服务配置的"单一真理之源"。
//! 所有配置项的定义、文档、默认值都在这里统一管理。
//!
//! 配置文件使用 TOML 格式；密钥类配置一律来自环境变量，
//! 并在启动时统一校验（fail fast），绝不带病运行。

pub mod avs;
pub mod ledger;

pub use crate::config::avs::{AvsConfig, CourierConfig};
pub use crate::config::ledger::LedgerConfig;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Pledge 服务套件的主配置结构体
///
/// 系统的核心配置，启动时构造一次，以引用传入各组件，
/// 避免进程级全局常量带来的隐藏状态。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PledgeConfig {
    /// 服务器实例名称
    ///
    /// 用于标识不同的服务实例，建议使用有意义的命名规则，
    /// 如：pledge-01, pledge-prod-east-1 等。
    pub name: String,

    /// 运行环境标识
    ///
    /// - "dev": 开发环境
    /// - "prod": 生产环境
    /// - "test": 测试环境，用于自动化测试
    pub env: String,

    /// HTTP 服务绑定配置
    pub bind: BindConfig,

    /// 部署绑定
    ///
    /// 链标识与合约地址。签发的凭证与注册表都绑定到同一部署，
    /// 防止凭证被挪用到其他链或合约。
    pub deployment: DeploymentConfig,

    /// 服务配置集合
    ///
    /// 每个服务可以独立配置自己的参数与开关。
    #[serde(default)]
    pub services: ServicesConfig,

    /// 可观测性配置（日志过滤与输出）
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP 服务绑定配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BindConfig {
    /// 绑定 IP 地址
    pub ip: String,

    /// 绑定端口
    pub port: u16,
}

/// 部署绑定配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DeploymentConfig {
    /// 目标链标识
    #[serde(default)]
    pub chain_id: String,

    /// 纪念代币合约地址
    #[serde(default)]
    pub token_contract: String,

    /// 承诺账本合约地址（真实链部署时使用，进程内替身不消费）
    #[serde(default)]
    pub ledger_contract: String,
}

/// 服务配置集合
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ServicesConfig {
    /// 承诺账本服务（链上合约的进程内替身）
    #[serde(default)]
    pub ledger: Option<LedgerConfig>,

    /// 审计与凭证签发服务（AVS）
    #[serde(default)]
    pub avs: Option<AvsConfig>,
}

/// 可观测性配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ObservabilityConfig {
    /// 过滤级别
    ///
    /// 支持 EnvFilter 语法（如 "info,hyper=warn"）。默认值 "info"。
    /// 环境变量 RUST_LOG 优先于此配置。
    #[serde(default = "default_filter_level")]
    pub filter_level: String,

    /// 日志输出目标："console" 或 "file"
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 文件输出时的日志目录
    #[serde(default = "default_log_path")]
    pub path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            filter_level: default_filter_level(),
            output: default_log_output(),
            path: default_log_path(),
        }
    }
}

fn default_filter_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "console".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

impl PledgeConfig {
    /// 从 TOML 文件加载配置并校验
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置的完整性
    ///
    /// 启用的服务缺少必需字段时立即失败
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::invalid("name", "must not be empty"));
        }
        if self.bind.port == 0 {
            return Err(ConfigError::invalid("bind.port", "must not be 0"));
        }
        if self.ledger_config().is_some() || self.avs_config().is_some() {
            if self.deployment.chain_id.is_empty() {
                return Err(ConfigError::invalid("deployment.chain_id", "must not be empty"));
            }
            if self.deployment.token_contract.is_empty() {
                return Err(ConfigError::invalid(
                    "deployment.token_contract",
                    "must not be empty",
                ));
            }
        }
        if let Some(avs) = self.avs_config() {
            avs.validate()?;
        }
        Ok(())
    }

    /// 账本服务配置（启用时）
    pub fn ledger_config(&self) -> Option<&LedgerConfig> {
        self.services.ledger.as_ref().filter(|c| c.enabled)
    }

    /// AVS 服务配置（启用时）
    pub fn avs_config(&self) -> Option<&AvsConfig> {
        self.services.avs.as_ref().filter(|c| c.enabled)
    }
}

// ========== 环境变量密钥 ==========

/// 签发凭证的 Ed25519 种子（64 位十六进制）
pub const ENV_SIGNING_KEY: &str = "PLEDGE_SIGNING_KEY";

/// 消息平台机器人凭证
pub const ENV_BOT_TOKEN: &str = "PLEDGE_BOT_TOKEN";

/// 会话令牌 HMAC 密钥
pub const ENV_SESSION_KEY: &str = "PLEDGE_SESSION_KEY";

/// 会话密钥的最小长度（字节）
const MIN_SESSION_KEY_LEN: usize = 16;

/// 进程密钥集合
///
/// 所有密钥来自环境变量，启动时加载一次并统一校验。
/// 密钥内容绝不写入日志。
#[derive(Clone)]
pub struct Secrets {
    /// 凭证签发私钥种子
    pub signing_seed: [u8; 32],

    /// 消息平台机器人凭证
    pub bot_token: String,

    /// 会话令牌 HMAC 密钥
    pub session_key: Vec<u8>,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("signing_seed", &"<redacted>")
            .field("bot_token", &"<redacted>")
            .field("session_key", &"<redacted>")
            .finish()
    }
}

impl Secrets {
    /// 从环境变量加载全部密钥
    pub fn from_env() -> Result<Self, ConfigError> {
        let signing_hex = require_env(ENV_SIGNING_KEY)?;
        let seed_bytes = hex::decode(signing_hex.trim()).map_err(|e| ConfigError::InvalidEnv {
            var: ENV_SIGNING_KEY,
            reason: format!("not valid hex: {e}"),
        })?;
        let signing_seed: [u8; 32] =
            seed_bytes
                .try_into()
                .map_err(|v: Vec<u8>| ConfigError::InvalidEnv {
                    var: ENV_SIGNING_KEY,
                    reason: format!("expected 32 bytes, got {}", v.len()),
                })?;

        let bot_token = require_env(ENV_BOT_TOKEN)?;

        let session_key = require_env(ENV_SESSION_KEY)?.into_bytes();
        if session_key.len() < MIN_SESSION_KEY_LEN {
            return Err(ConfigError::InvalidEnv {
                var: ENV_SESSION_KEY,
                reason: format!("must be at least {MIN_SESSION_KEY_LEN} bytes"),
            });
        }

        Ok(Self {
            signing_seed,
            bot_token,
            session_key,
        })
    }
}

fn require_env(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(var)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_toml() -> String {
        r#"
name = "pledge-test"
env = "test"

[bind]
ip = "127.0.0.1"
port = 8080

[deployment]
chain_id = "goerli"
token_contract = "0xA9b89BE286062A7aa2a6AD0f67DA07A6B573d682"
ledger_contract = "0x5774864cee825c350C54E20f03d2ABb3708c471A"

[services.ledger]
enabled = true

[services.avs]
enabled = true
verification_domain = "example.com"
community_id = "1036528281287131186"
channel_id = "1036528281735934052"

[observability]
filter_level = "debug"
"#
        .to_string()
    }

    #[test]
    fn test_load_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(valid_toml().as_bytes()).unwrap();

        let config = PledgeConfig::load(file.path()).unwrap();
        assert_eq!(config.name, "pledge-test");
        assert!(config.ledger_config().is_some());
        let avs = config.avs_config().unwrap();
        assert_eq!(avs.verification_domain, "example.com");
        // 未显式配置的 courier 端点使用默认值
        assert!(avs.courier.endpoint.starts_with("https://discord.com"));
    }

    #[test]
    fn test_rejects_missing_channel() {
        let toml = valid_toml().replace("channel_id = \"1036528281735934052\"\n", "");
        let config: PledgeConfig = toml::from_str(&toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_port() {
        let toml = valid_toml().replace("port = 8080", "port = 0");
        let config: PledgeConfig = toml::from_str(&toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_deployment_binding() {
        let toml = valid_toml().replace("chain_id = \"goerli\"\n", "");
        let config: PledgeConfig = toml::from_str(&toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_avs_skips_validation() {
        let toml = r#"
name = "pledge-test"
env = "test"

[bind]
ip = "127.0.0.1"
port = 8080

[deployment]
"#;
        let config: PledgeConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.avs_config().is_none());
    }

    // 环境变量是进程级状态，相关测试串行执行

    fn set_valid_secret_env() {
        // SAFETY 同进程无并发读写（serial_test 保证）
        unsafe {
            std::env::set_var(ENV_SIGNING_KEY, "11".repeat(32));
            std::env::set_var(ENV_BOT_TOKEN, "bot-token");
            std::env::set_var(ENV_SESSION_KEY, "0123456789abcdef0123456789abcdef");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_secrets_from_env() {
        set_valid_secret_env();
        let secrets = Secrets::from_env().unwrap();
        assert_eq!(secrets.signing_seed, [0x11u8; 32]);
        assert_eq!(secrets.bot_token, "bot-token");
        assert_eq!(secrets.session_key.len(), 32);
        // Debug 输出不泄露密钥内容
        assert!(!format!("{secrets:?}").contains("bot-token"));
    }

    #[test]
    #[serial_test::serial]
    fn test_secrets_missing_env_fails_fast() {
        set_valid_secret_env();
        unsafe {
            std::env::remove_var(ENV_BOT_TOKEN);
        }
        assert!(matches!(
            Secrets::from_env(),
            Err(ConfigError::MissingEnv(ENV_BOT_TOKEN))
        ));
    }

    #[test]
    #[serial_test::serial]
    fn test_secrets_reject_short_seed() {
        set_valid_secret_env();
        unsafe {
            std::env::set_var(ENV_SIGNING_KEY, "1122");
        }
        assert!(matches!(
            Secrets::from_env(),
            Err(ConfigError::InvalidEnv { .. })
        ));
    }
}
