//! AVS（审计与凭证签发服务）配置

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// AVS 服务配置
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AvsConfig {
    /// 是否启用 AVS 服务
    #[serde(default)]
    pub enabled: bool,

    /// 登录断言的校验域
    ///
    /// 断言载荷中的 domain 字段必须与此值完全一致，
    /// 防止其他站点签发的断言被重放到本服务。
    #[serde(default)]
    pub verification_domain: String,

    /// 消息平台社区（guild）标识
    #[serde(default)]
    pub community_id: String,

    /// 审计频道标识
    ///
    /// 打卡消息必须发送到该频道才会被计入审计。
    #[serde(default)]
    pub channel_id: String,

    /// 凭证元数据中的固定艺术品引用
    #[serde(default = "default_artwork_uri")]
    pub artwork_uri: String,

    /// 消息平台客户端配置
    #[serde(default)]
    pub courier: CourierConfig,
}

/// 消息平台 REST 客户端配置
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CourierConfig {
    /// 平台 API 基础地址
    ///
    /// 完整 URL，包括协议与版本路径。
    /// 测试环境可指向本地替身服务。
    #[serde(default = "default_courier_endpoint")]
    pub endpoint: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_courier_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_courier_endpoint(),
            timeout_seconds: default_courier_timeout_seconds(),
        }
    }
}

fn default_courier_endpoint() -> String {
    "https://discord.com/api/v9".to_string()
}

/// 默认请求超时：30 秒
fn default_courier_timeout_seconds() -> u64 {
    30
}

fn default_artwork_uri() -> String {
    "ipfs://QmYcmckp7GGXN1A2iTc32VPsT1WdFQ4m7tYzKghBAomE81".to_string()
}

impl AvsConfig {
    /// 校验启用状态下的必填字段
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("services.avs.verification_domain", &self.verification_domain),
            ("services.avs.community_id", &self.community_id),
            ("services.avs.channel_id", &self.channel_id),
        ] {
            if value.is_empty() {
                return Err(ConfigError::invalid(field, "must not be empty"));
            }
        }
        if self.courier.endpoint.is_empty() {
            return Err(ConfigError::invalid(
                "services.avs.courier.endpoint",
                "must not be empty",
            ));
        }
        if self.courier.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "services.avs.courier.timeout_seconds",
                "must not be 0",
            ));
        }
        Ok(())
    }
}
