//! 登录断言
//!
//! 登录断言是一段由钱包私钥签名的载荷，证明签名者在某个校验域内
//! 控制着对应的钱包地址。签名覆盖载荷的规范 JSON 字节（按结构体
//! 字段声明顺序序列化），验证方从嵌入的公钥重建地址。
//!
//! 断言自带有效窗口（issued_at / expires_at），窗口之外一律拒绝，
//! 重放防护完全由窗口本身承担。

use crate::types::Address;
use base64::prelude::*;
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 登录断言错误
#[derive(Debug, Error)]
pub enum AssertionError {
    /// 载荷或编码字段无法解析
    #[error("Malformed assertion: {0}")]
    Malformed(String),

    /// 签名校验失败
    #[error("Signature verification failed")]
    BadSignature,

    /// 校验域不匹配
    #[error("Domain mismatch: expected {expected}, got {actual}")]
    DomainMismatch { expected: String, actual: String },

    /// 断言尚未生效
    #[error("Assertion not yet valid")]
    NotYetValid,

    /// 断言已过期
    #[error("Assertion expired")]
    Expired,

    /// 载荷地址与公钥派生地址不一致
    #[error("Payload address does not match the signing key")]
    AddressMismatch,
}

/// 断言载荷
///
/// 签名覆盖本结构体的 JSON 序列化字节
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionPayload {
    /// 校验域（签发断言的站点标识）
    pub domain: String,

    /// 声称控制的钱包地址
    pub address: Address,

    /// 签发时间（Unix 秒）
    pub issued_at: u64,

    /// 过期时间（Unix 秒）
    pub expires_at: u64,

    /// 随机数，使同一窗口内的断言互不相同
    pub nonce: String,
}

/// 签名后的登录断言
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAssertion {
    /// 断言载荷
    pub payload: AssertionPayload,

    /// 签名公钥（32 字节，十六进制）
    pub public_key: String,

    /// Ed25519 签名（base64）
    pub signature: String,
}

impl LoginAssertion {
    /// 用钱包私钥签名载荷
    pub fn sign(payload: AssertionPayload, key: &SigningKey) -> Result<Self, AssertionError> {
        let bytes =
            serde_json::to_vec(&payload).map_err(|e| AssertionError::Malformed(e.to_string()))?;
        let signature = key.sign(&bytes);

        Ok(Self {
            payload,
            public_key: hex::encode(key.verifying_key().as_bytes()),
            signature: BASE64_STANDARD.encode(signature.to_bytes()),
        })
    }

    /// 校验断言并恢复钱包地址
    ///
    /// 依次检查：签名、校验域、有效窗口、地址与公钥的一致性。
    /// 任何一项失败都返回错误，绝不降级。
    pub fn verify(&self, expected_domain: &str, now: u64) -> Result<Address, AssertionError> {
        let key_bytes: [u8; 32] = hex::decode(&self.public_key)
            .map_err(|e| AssertionError::Malformed(format!("public key: {e}")))?
            .try_into()
            .map_err(|_| AssertionError::Malformed("public key must be 32 bytes".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| AssertionError::Malformed(format!("public key: {e}")))?;

        let sig_bytes: [u8; 64] = BASE64_STANDARD
            .decode(&self.signature)
            .map_err(|e| AssertionError::Malformed(format!("signature: {e}")))?
            .try_into()
            .map_err(|_| AssertionError::Malformed("signature must be 64 bytes".to_string()))?;
        let signature = Signature::from_bytes(&sig_bytes);

        let payload_bytes = serde_json::to_vec(&self.payload)
            .map_err(|e| AssertionError::Malformed(e.to_string()))?;
        verifying_key
            .verify(&payload_bytes, &signature)
            .map_err(|_| AssertionError::BadSignature)?;

        if self.payload.domain != expected_domain {
            return Err(AssertionError::DomainMismatch {
                expected: expected_domain.to_string(),
                actual: self.payload.domain.clone(),
            });
        }

        if now < self.payload.issued_at {
            return Err(AssertionError::NotYetValid);
        }
        if now > self.payload.expires_at {
            return Err(AssertionError::Expired);
        }

        let derived = Address::from_public_key(&verifying_key);
        if derived != self.payload.address {
            return Err(AssertionError::AddressMismatch);
        }

        Ok(derived)
    }
}
