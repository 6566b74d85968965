//! 会话令牌校验
//!
//! 消息平台侧的 OAuth 登录由外部系统完成，登录成功后外部系统
//! 用共享的 HMAC 密钥签出会话令牌。本模块只负责校验令牌并取出
//! 平台身份声明，让"会话身份"成为审计的显式输入。
//!
//! 令牌格式：`base64url(claims_json) . base64url(hmac_sha256_tag)`

use crate::error::AvsError;
use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 会话身份声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// 消息平台用户标识
    pub user_id: String,

    /// 显示名，进入凭证元数据
    pub display_name: String,

    /// 过期时间（Unix 秒）
    pub expires_at: u64,
}

/// 会话令牌校验器
#[derive(Clone)]
pub struct SessionValidator {
    key: Vec<u8>,
}

impl SessionValidator {
    /// 创建新的校验器
    pub fn new(key: Vec<u8>) -> Self {
        Self { key }
    }

    /// 签发会话令牌
    ///
    /// 正式环境由平台登录回调侧签发，这里保留签发能力
    /// 供测试与运维工具使用。
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, serde_json::Error> {
        let payload = serde_json::to_vec(claims)?;
        let tag = self.mac(&payload).finalize().into_bytes();

        Ok(format!(
            "{}.{}",
            BASE64_URL_SAFE_NO_PAD.encode(&payload),
            BASE64_URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// 校验令牌并取出声明
    ///
    /// 所有失败都归入 `NotLoggedIn`，原因只进日志
    pub fn verify(&self, token: &str, now: u64) -> Result<SessionClaims, AvsError> {
        let (payload_part, tag_part) = token
            .split_once('.')
            .ok_or_else(|| AvsError::NotLoggedIn("token is not two-part".to_string()))?;

        let payload = BASE64_URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|e| AvsError::NotLoggedIn(format!("payload: {e}")))?;
        let tag = BASE64_URL_SAFE_NO_PAD
            .decode(tag_part)
            .map_err(|e| AvsError::NotLoggedIn(format!("tag: {e}")))?;

        // HMAC 校验是常数时间比较
        self.mac(&payload)
            .verify_slice(&tag)
            .map_err(|_| AvsError::NotLoggedIn("tag mismatch".to_string()))?;

        let claims: SessionClaims = serde_json::from_slice(&payload)
            .map_err(|e| AvsError::NotLoggedIn(format!("claims: {e}")))?;

        if now >= claims.expires_at {
            return Err(AvsError::NotLoggedIn("session expired".to_string()));
        }

        Ok(claims)
    }

    fn mac(&self, payload: &[u8]) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .expect("HMAC accepts keys of any length");
        mac.update(payload);
        mac
    }
}
