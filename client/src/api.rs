//! Pledge 服务端 API 客户端
//!
//! 账本端点在 `/ledger` 前缀下，AVS 端点在 `/avs` 前缀下。
//! 非 2xx 响应统一解析 `{ "error": ... }` 形态并转为可读错误。

use anyhow::{Result, bail};
use pledge_common::{Address, LoginAssertion, MintingVoucher};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// 服务端返回的锁定记录
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LockedFundsView {
    pub amount: u128,
    pub duration_secs: u64,
    pub locked_at: u64,
}

/// Pledge API 客户端
pub struct PledgeApi {
    http: reqwest::Client,
    base_url: String,
}

impl PledgeApi {
    /// 创建新的 API 客户端
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// 查询锁定资金
    pub async fn locked_funds(&self, address: Address) -> Result<LockedFundsView> {
        let response = self
            .http
            .get(format!("{}/ledger/funds/{}", self.base_url, address))
            .send()
            .await?;
        Ok(Self::parse(response).await?)
    }

    /// 锁定资金，返回锁定时刻
    pub async fn lock(&self, address: Address, amount: u128, duration_secs: u64) -> Result<u64> {
        #[derive(Deserialize)]
        struct LockResponse {
            locked_at: u64,
        }

        let response = self
            .http
            .post(format!("{}/ledger/lock", self.base_url))
            .json(&json!({
                "address": address,
                "amount": amount,
                "duration_secs": duration_secs,
            }))
            .send()
            .await?;
        let body: LockResponse = Self::parse(response).await?;
        Ok(body.locked_at)
    }

    /// 请求铸造凭证
    pub async fn request_voucher(
        &self,
        assertion: &LoginAssertion,
        session_token: &str,
    ) -> Result<MintingVoucher> {
        #[derive(Deserialize)]
        struct WithdrawResponse {
            signature: MintingVoucher,
        }

        let response = self
            .http
            .post(format!("{}/avs/withdraw", self.base_url))
            .header("x-pledge-session", session_token)
            .json(&json!({ "login_payload": assertion }))
            .send()
            .await?;
        let body: WithdrawResponse = Self::parse(response).await?;
        Ok(body.signature)
    }

    /// 消费凭证铸造代币，返回代币序号
    pub async fn mint(&self, voucher: &MintingVoucher) -> Result<u64> {
        #[derive(Deserialize)]
        struct MintResponse {
            token_id: u64,
        }

        let response = self
            .http
            .post(format!("{}/ledger/mint", self.base_url))
            .json(&json!({ "voucher": voucher }))
            .send()
            .await?;
        let body: MintResponse = Self::parse(response).await?;
        Ok(body.token_id)
    }

    /// 取回资金，返回取回金额
    pub async fn withdraw(&self, address: Address) -> Result<u128> {
        #[derive(Deserialize)]
        struct WithdrawResponse {
            amount: u128,
        }

        let response = self
            .http
            .post(format!("{}/ledger/withdraw", self.base_url))
            .json(&json!({ "address": address }))
            .send()
            .await?;
        let body: WithdrawResponse = Self::parse(response).await?;
        Ok(body.amount)
    }

    /// 解析响应：2xx 反序列化，其余取出错误文案
    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: String,
        }

        if response.status().is_success() {
            return Ok(response.json().await?);
        }

        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => bail!("{} ({})", body.error, status),
            Err(_) => bail!("server returned status {}", status),
        }
    }
}
