//! 消息平台客户端 - 简单的 HTTP 客户端
//!
//! 审计只消费平台的两个只读端点：社区频道列表与频道消息历史。
//! 机器人凭证通过 `Authorization: Bot ...` 头携带。

use crate::error::AvsError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pledge_common::CourierConfig;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// 社区频道
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    /// 频道标识
    pub id: String,

    /// 频道名（平台可能省略）
    #[serde(default)]
    pub name: Option<String>,
}

/// 消息作者
#[derive(Debug, Clone, Deserialize)]
pub struct MessageAuthor {
    /// 平台用户标识
    pub id: String,

    /// 用户名（平台可能省略）
    #[serde(default)]
    pub username: Option<String>,
}

/// 频道消息
///
/// 平台返回 RFC 3339 时间戳（如 2022-10-31T06:34:14.130000+00:00）
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRecord {
    /// 消息标识
    pub id: String,

    /// 消息作者
    pub author: MessageAuthor,

    /// 发送时间（UTC）
    pub timestamp: DateTime<Utc>,
}

/// 平台只读接口
///
/// 审计器通过本 trait 消费平台，测试可注入替身实现
#[async_trait]
pub trait CourierApi: Send + Sync {
    /// 列出社区的全部频道
    async fn list_channels(&self, community_id: &str) -> Result<Vec<Channel>, AvsError>;

    /// 拉取频道消息历史
    async fn list_messages(&self, channel_id: &str) -> Result<Vec<MessageRecord>, AvsError>;
}

/// 消息平台客户端
#[derive(Debug, Clone)]
pub struct Courier {
    client: reqwest::Client,
    endpoint: String,
    bot_token: String,
}

impl Courier {
    /// 创建新的平台客户端
    pub fn new(config: &CourierConfig, bot_token: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, AvsError> {
        let url = format!("{}{}", self.endpoint, path);
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(&url)
            .header("authorization", format!("Bot {}", self.bot_token))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AvsError::MalformedResponse(format!(
                "{path} returned status {status}: {error_text}"
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CourierApi for Courier {
    async fn list_channels(&self, community_id: &str) -> Result<Vec<Channel>, AvsError> {
        self.get_json(&format!("/guilds/{community_id}/channels"))
            .await
    }

    async fn list_messages(&self, channel_id: &str) -> Result<Vec<MessageRecord>, AvsError> {
        self.get_json(&format!("/channels/{channel_id}/messages"))
            .await
    }
}
